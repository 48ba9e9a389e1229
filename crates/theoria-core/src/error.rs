use thiserror::Error;

/// The only failure `synthesize` can report. Every other input resolves to a
/// fully populated synthesis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SynthesisError>;
