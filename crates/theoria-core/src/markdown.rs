//! Markdown export of a [`TheorySynthesis`].

use crate::TheorySynthesis;
use std::fmt::Write;

fn percent(score: f64) -> String {
    format!("{:.0}%", (score * 100.0).round())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn to_markdown(synthesis: &TheorySynthesis) -> String {
    let mut out = String::with_capacity(2048);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Síntesis teórica\n");
    let _ = writeln!(out, "> {}\n", synthesis.core_thesis);
    let _ = writeln!(
        out,
        "**Medio:** {} · **Complejidad:** {} · **Coherencia:** {}\n",
        synthesis.signal_profile.medium,
        percent(synthesis.complexity_score),
        percent(synthesis.coherence)
    );
    if let Some(tag) = &synthesis.signal_profile.context_tag {
        let _ = writeln!(out, "**Fuente:** {}\n", tag);
    }

    let _ = writeln!(out, "## Fenómenos\n");
    for phenomenon in &synthesis.phenomena {
        let _ = writeln!(out, "- {}", phenomenon);
    }

    let _ = writeln!(out, "\n## Fórmulas derivadas\n");
    for formula in &synthesis.derived_formulas {
        let _ = writeln!(out, "### {}\n", formula.title);
        let _ = writeln!(out, "```\n{}\n```\n", formula.expression);
        let _ = writeln!(out, "{}\n", formula.explanation);
    }

    let _ = writeln!(out, "## Modelos de sistema\n");
    for model in &synthesis.system_models {
        let _ = writeln!(out, "### {}\n", model.name);
        let _ = writeln!(out, "```\n{}\n```\n", model.governing_equation);
        let _ = writeln!(out, "Enfoque: {}\n", model.focus);
    }

    let _ = writeln!(out, "## Parámetros\n");
    let _ = writeln!(out, "| Símbolo | Descripción |");
    let _ = writeln!(out, "|---------|-------------|");
    for entry in &synthesis.parameter_table {
        let _ = writeln!(
            out,
            "| `{}` | {} |",
            escape_cell(&entry.label),
            escape_cell(&entry.description)
        );
    }

    let _ = writeln!(out, "\n## Inferencia\n");
    for (i, step) in synthesis.inference_steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, step);
    }

    let _ = writeln!(out, "\n## Experimentos recomendados\n");
    for experiment in &synthesis.recommended_experiments {
        let _ = writeln!(out, "- {}", experiment);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Formula, Medium, ParameterEntry, SignalProfile, SystemModel};

    fn sample() -> TheorySynthesis {
        TheorySynthesis {
            core_thesis: "La energia organiza el sistema.".into(),
            phenomena: vec!["Dinámica intrínseca de energia".into()],
            derived_formulas: vec![Formula {
                title: "Balance energético".into(),
                expression: "E(energia) = ½·κ·energia² + Φ".into(),
                explanation: "Pozo cuadrático.".into(),
            }],
            system_models: vec![SystemModel {
                name: "Red adaptativa".into(),
                governing_equation: "dw/dt = η·energia − λ·w".into(),
                focus: "la reorganización de conexiones".into(),
            }],
            parameter_table: vec![ParameterEntry {
                label: "energia".into(),
                description: "a|b".into(),
            }],
            complexity_score: 0.424,
            coherence: 1.0,
            signal_profile: SignalProfile {
                medium: Medium::Pdf,
                context_tag: Some("paper.pdf".into()),
                analyzed_chars: 7,
                truncated: false,
            },
            inference_steps: vec!["uno".into(), "dos".into()],
            recommended_experiments: vec!["medir".into(), "comparar".into()],
        }
    }

    #[test]
    fn renders_every_section() {
        let md = to_markdown(&sample());
        assert!(md.starts_with("# Síntesis teórica"));
        assert!(md.contains("**Medio:** pdf"));
        assert!(md.contains("**Complejidad:** 42%"));
        assert!(md.contains("**Coherencia:** 100%"));
        assert!(md.contains("**Fuente:** paper.pdf"));
        assert!(md.contains("### Balance energético"));
        assert!(md.contains("### Red adaptativa"));
        assert!(md.contains("| `energia` | a\\|b |"));
        assert!(md.contains("2. dos"));
        assert!(md.contains("- comparar"));
    }
}
