//! Content-to-theory synthesis.
//!
//! Each stage is a pure function over the previous stage's output;
//! [`Synthesizer`] sequences them and assembles the final
//! [`TheorySynthesis`](theoria_core::TheorySynthesis).

pub mod concepts;
pub mod experiments;
pub mod formulas;
pub mod metrics;
pub mod models;
pub mod narrative;
pub mod normalizer;
pub mod parameters;
pub mod phenomena;
pub mod pipeline;

pub use concepts::extract_concepts;
pub use metrics::{compute_metrics, TextMetrics};
pub use normalizer::{normalize, NormalizedText};
pub use pipeline::{synthesize, Synthesizer};
