use rustc_hash::FxHashSet;
use serde::Serialize;
use theoria_core::{Concept, ScoringConfig};
use tracing::debug;

/// Text statistics and the two bounded scores derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMetrics {
    pub total_tokens: usize,
    pub unique_tokens: usize,
    pub vocabulary_richness: f64,
    pub average_sentence_length: f64,
    pub concept_density: f64,
    /// Variance of concept weights after scaling them by the maximum weight.
    pub weight_variance: f64,
    pub complexity_score: f64,
    pub coherence: f64,
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Saturating map of `[0, ∞)` onto `[0, 1)`; equals 0.5 at `reference`.
pub fn saturate(value: f64, reference: f64) -> f64 {
    let value = value.max(0.0);
    value / (value + reference)
}

/// Population variance of weights scaled into `[0, 1]`; bounded by 0.25.
pub fn scaled_weight_variance(concepts: &[Concept]) -> f64 {
    let max = concepts.iter().map(|c| c.weight).fold(0.0_f64, f64::max);
    if concepts.len() < 2 || max <= 0.0 {
        return 0.0;
    }
    let scaled: Vec<f64> = concepts.iter().map(|c| c.weight / max).collect();
    let mean = scaled.iter().sum::<f64>() / scaled.len() as f64;
    scaled.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / scaled.len() as f64
}

pub fn complexity_score(
    vocabulary_richness: f64,
    average_sentence_length: f64,
    concept_density: f64,
    scoring: &ScoringConfig,
) -> f64 {
    let raw = scoring.vocabulary_weight * vocabulary_richness
        + scoring.sentence_length_weight
            * saturate(average_sentence_length, scoring.sentence_length_reference)
        + scoring.concept_density_weight * concept_density;
    clamp_unit(raw, scoring.baseline_complexity)
}

/// `1 − variance / 0.25`, so identical weights give 1 and a maximal spread 0.
pub fn coherence_score(weight_variance: f64, scoring: &ScoringConfig) -> f64 {
    clamp_unit(1.0 - weight_variance / 0.25, scoring.baseline_coherence)
}

pub fn compute_metrics(
    tokens: &[String],
    sentence_count: usize,
    concepts: &[Concept],
    scoring: &ScoringConfig,
) -> TextMetrics {
    let total_tokens = tokens.len();
    let unique_tokens = tokens.iter().map(String::as_str).collect::<FxHashSet<_>>().len();

    if total_tokens <= 1 {
        debug!(total_tokens, "too few tokens, using baseline scores");
        return TextMetrics {
            total_tokens,
            unique_tokens,
            vocabulary_richness: 1.0,
            average_sentence_length: total_tokens as f64,
            concept_density: 1.0,
            weight_variance: 0.0,
            complexity_score: scoring.baseline_complexity,
            coherence: scoring.baseline_coherence,
        };
    }

    let total = total_tokens as f64;
    let vocabulary_richness = unique_tokens as f64 / total;
    let average_sentence_length = total / sentence_count.max(1) as f64;
    let concept_density = (concepts.len() as f64 / total).min(1.0);
    let weight_variance = scaled_weight_variance(concepts);

    let metrics = TextMetrics {
        total_tokens,
        unique_tokens,
        vocabulary_richness,
        average_sentence_length,
        concept_density,
        weight_variance,
        complexity_score: complexity_score(
            vocabulary_richness,
            average_sentence_length,
            concept_density,
            scoring,
        ),
        coherence: coherence_score(weight_variance, scoring),
    };
    debug!(
        complexity = metrics.complexity_score,
        coherence = metrics.coherence,
        "computed metrics"
    );
    metrics
}
