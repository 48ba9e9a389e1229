use crate::metrics::TextMetrics;
use theoria_core::{Concept, Formula, SystemModel};

/// Number of steps every narrative contains.
pub const STEP_COUNT: usize = 5;

/// Already-computed pipeline state the narrator cites.
#[derive(Debug, Clone, Copy)]
pub struct PipelineTrace<'a> {
    pub sentence_count: usize,
    pub truncated: bool,
    pub concepts: &'a [Concept],
    pub metrics: &'a TextMetrics,
    pub models: &'a [SystemModel],
    pub formulas: &'a [Formula],
    pub parameter_count: usize,
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|s| format!("«{}»", s))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn narrate(trace: &PipelineTrace<'_>) -> Vec<String> {
    let truncation = if trace.truncated {
        " tras recortar el contenido al límite de análisis"
    } else {
        ""
    };

    vec![
        format!(
            "Normalización: se segmentaron {} tokens en {} oraciones{}.",
            trace.metrics.total_tokens, trace.sentence_count, truncation
        ),
        format!(
            "Extracción de conceptos: se identificaron {} conceptos dominantes ({}).",
            trace.concepts.len(),
            quoted_list(trace.concepts.iter().map(|c| c.term.as_str()))
        ),
        format!(
            "Métricas: complejidad {} (riqueza léxica {}) y coherencia {}.",
            percent(trace.metrics.complexity_score),
            percent(trace.metrics.vocabulary_richness),
            percent(trace.metrics.coherence)
        ),
        format!(
            "Selección de modelos: {} elegido(s) por solapamiento de conceptos: {}.",
            trace.models.len(),
            quoted_list(trace.models.iter().map(|m| m.name.as_str()))
        ),
        format!(
            "Síntesis formal: {} fórmula(s) derivada(s) y {} parámetro(s) catalogado(s).",
            trace.formulas.len(),
            trace.parameter_count
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_metrics;
    use theoria_core::ScoringConfig;

    #[test]
    fn cites_intermediate_results() {
        let concepts = vec![Concept {
            term: "onda".into(),
            weight: 2.0,
            occurrences: 2,
            first_position: 0,
        }];
        let tokens: Vec<String> = ["onda", "viaja", "onda"].iter().map(|s| s.to_string()).collect();
        let metrics = compute_metrics(&tokens, 1, &concepts, &ScoringConfig::default());
        let models = vec![SystemModel {
            name: "Osciladores acoplados".into(),
            governing_equation: "ẍ + ω²·x = κ·(onda − x)".into(),
            focus: "intercambio".into(),
        }];
        let formulas = vec![Formula {
            title: "Ecuación de onda: onda".into(),
            expression: "∇²onda = −ρ".into(),
            explanation: String::new(),
        }];

        let steps = narrate(&PipelineTrace {
            sentence_count: 1,
            truncated: true,
            concepts: &concepts,
            metrics: &metrics,
            models: &models,
            formulas: &formulas,
            parameter_count: 3,
        });

        assert_eq!(steps.len(), STEP_COUNT);
        assert!(steps[0].contains("3 tokens en 1 oraciones"));
        assert!(steps[0].contains("recortar"));
        assert!(steps[1].contains("1 conceptos dominantes («onda»)"));
        assert!(steps[2].contains(&percent(metrics.complexity_score)));
        assert!(steps[3].contains("«Osciladores acoplados»"));
        assert!(steps[4].contains("1 fórmula(s)"));
        assert!(steps[4].contains("3 parámetro(s)"));
    }
}
