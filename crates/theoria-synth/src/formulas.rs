use theoria_core::{Concept, Formula};
use tracing::debug;

/// Placeholder substituted with the concept symbol.
pub const SYMBOL_SLOT: &str = "{s}";

/// A `(symbol, description)` pair of a fixed catalog symbol.
pub type SymbolGloss = (&'static str, &'static str);

#[derive(Debug)]
pub struct FormulaTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub keywords: &'static [&'static str],
    pub expression: &'static str,
    pub explanation: &'static str,
    pub symbols: &'static [SymbolGloss],
}

pub static FORMULA_CATALOG: &[FormulaTemplate] = &[
    FormulaTemplate {
        key: "energy",
        title: "Balance energético",
        keywords: &[
            "energ", "potenc", "cinet", "kinetic", "calor", "heat", "trabajo", "work", "fuerza",
            "force", "masa", "mass", "termo", "thermo",
        ],
        expression: "E({s}) = ½·κ·{s}² + Φ·{s}",
        explanation: "Describe la energía asociada a «{s}» como un pozo cuadrático de rigidez κ desplazado por un potencial externo Φ.",
        symbols: &[
            ("E", "energía total del sistema"),
            ("κ", "rigidez o constante de restitución"),
            ("Φ", "potencial externo aplicado"),
        ],
    },
    FormulaTemplate {
        key: "rate",
        title: "Ley de crecimiento acotado",
        keywords: &[
            "tasa", "rate", "veloc", "speed", "crecim", "growth", "cambio", "change", "tiempo",
            "time", "evolu", "dinam", "dynam", "aceler",
        ],
        expression: "∂{s}/∂t = r·{s}·(1 − {s}/K)",
        explanation: "Modela la evolución de «{s}» con una tasa intrínseca r que se satura al aproximarse a la capacidad de carga K.",
        symbols: &[
            ("t", "tiempo"),
            ("r", "tasa intrínseca de cambio"),
            ("K", "capacidad de carga"),
        ],
    },
    FormulaTemplate {
        key: "field",
        title: "Ecuación de onda",
        keywords: &[
            "campo", "field", "onda", "wave", "luz", "light", "electr", "magnet", "gravit",
            "propag", "sonido", "sound", "señal", "signal", "acust", "acoust", "radiac", "radiat",
        ],
        expression: "∇²{s} − (1/c²)·∂²{s}/∂t² = −ρ",
        explanation: "Trata «{s}» como un campo que se propaga con velocidad c, excitado por una densidad de fuente ρ.",
        symbols: &[
            ("c", "velocidad de propagación"),
            ("t", "tiempo"),
            ("ρ", "densidad de fuente"),
        ],
    },
    FormulaTemplate {
        key: "network",
        title: "Dinámica en red",
        keywords: &[
            "red", "network", "nodo", "node", "conex", "connect", "social", "grafo", "graph",
            "vincul", "link", "comunic", "interac", "agent",
        ],
        expression: "∂{s}/∂t = −γ·{s} + β·Σ A·{s}",
        explanation: "Cada nodo pierde «{s}» con tasa γ y la recibe de sus vecinos a través de la matriz de adyacencia A con acoplamiento β.",
        symbols: &[
            ("t", "tiempo"),
            ("γ", "tasa de decaimiento local"),
            ("β", "intensidad de acoplamiento entre nodos"),
            ("A", "matriz de adyacencia"),
        ],
    },
    FormulaTemplate {
        key: "information",
        title: "Entropía informacional",
        keywords: &[
            "inform", "entrop", "dato", "data", "incert", "uncert", "probab", "orden", "order",
            "caos", "chaos", "aleat", "random", "ruido", "noise",
        ],
        expression: "S({s}) = −Σ p·ln p",
        explanation: "Cuantifica la incertidumbre de los estados de «{s}» a partir de su distribución de probabilidad p.",
        symbols: &[
            ("S", "entropía de Shannon"),
            ("p", "probabilidad de cada estado"),
        ],
    },
    FormulaTemplate {
        key: "diffusion",
        title: "Ley de difusión",
        keywords: &[
            "difus", "diffus", "transport", "concentr", "temper", "dispers", "migra", "particul",
            "fluid", "flujo", "flow", "gradient",
        ],
        expression: "∂{s}/∂t = D·∇²{s}",
        explanation: "Describe la dispersión espacial de «{s}» a favor de su gradiente con coeficiente de difusión D.",
        symbols: &[("t", "tiempo"), ("D", "coeficiente de difusión")],
    },
    FormulaTemplate {
        key: "oscillation",
        title: "Oscilador armónico amortiguado",
        keywords: &[
            "oscil", "ritmo", "rhythm", "ciclo", "cycle", "period", "frecuen", "frequen", "reson",
            "pulso", "pulse", "armon", "harmon", "vibra", "fase", "phase",
        ],
        expression: "∂²{s}/∂t² + 2·ζ·ω·∂{s}/∂t + ω²·{s} = 0",
        explanation: "Representa «{s}» como una variable oscilante de frecuencia natural ω y razón de amortiguamiento ζ.",
        symbols: &[
            ("t", "tiempo"),
            ("ζ", "razón de amortiguamiento"),
            ("ω", "frecuencia natural"),
        ],
    },
    FormulaTemplate {
        key: "adaptation",
        title: "Regla de adaptación",
        keywords: &[
            "adapt", "aprend", "learn", "memori", "memory", "cognit", "neuron", "mente", "mind",
            "conduct", "behav", "feedback", "retroal", "decision", "estrateg", "strateg",
        ],
        expression: "∂{s}/∂t = η·(ε − {s})",
        explanation: "Ajusta «{s}» hacia un objetivo ε a una velocidad de aprendizaje η.",
        symbols: &[
            ("t", "tiempo"),
            ("η", "tasa de aprendizaje"),
            ("ε", "valor objetivo"),
        ],
    },
];

/// Used once no catalog entry is left for a concept.
pub static LINEAR_FALLBACK: FormulaTemplate = FormulaTemplate {
    key: "linear",
    title: "Respuesta lineal",
    keywords: &[],
    expression: "y = α·{s} + θ",
    explanation: "Aproxima la respuesta observable y como función lineal de «{s}» con sensibilidad α y desplazamiento θ.",
    symbols: &[
        ("y", "respuesta observable"),
        ("α", "sensibilidad"),
        ("θ", "desplazamiento basal"),
    ],
};

/// Formula together with the catalog symbols it introduced.
#[derive(Debug, Clone)]
pub struct DerivedFormula {
    pub formula: Formula,
    pub template_key: &'static str,
    pub concept: String,
    pub symbols: &'static [SymbolGloss],
}

pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}

/// Keywords of five or more characters match anywhere in the term; shorter
/// ones only as a prefix.
pub fn keyword_matches(folded_term: &str, keyword: &str) -> bool {
    if keyword.chars().count() >= 5 {
        folded_term.contains(keyword)
    } else {
        folded_term.starts_with(keyword)
    }
}

pub fn keyword_score(term: &str, keywords: &[&str]) -> usize {
    let folded = fold_accents(term);
    keywords
        .iter()
        .filter(|k| keyword_matches(&folded, k))
        .count()
}

pub fn instantiate(template: &'static FormulaTemplate, concept: &str) -> DerivedFormula {
    DerivedFormula {
        formula: Formula {
            title: format!("{}: {}", template.title, concept),
            expression: template.expression.replace(SYMBOL_SLOT, concept),
            explanation: template.explanation.replace(SYMBOL_SLOT, concept),
        },
        template_key: template.key,
        concept: concept.to_string(),
        symbols: template.symbols,
    }
}

/// Best-overlapping catalog entry for `term`, ties going to declaration
/// order. `None` when no keyword matches.
pub fn best_template(term: &str) -> Option<&'static FormulaTemplate> {
    FORMULA_CATALOG
        .iter()
        .enumerate()
        .map(|(idx, template)| (idx, keyword_score(term, template.keywords)))
        .filter(|(_, score)| *score > 0)
        // max_by_key keeps the last maximum, so compare on reversed index.
        .max_by_key(|(idx, score)| (*score, std::cmp::Reverse(*idx)))
        .map(|(idx, _)| &FORMULA_CATALOG[idx])
}

/// Maps up to `max_formulas` concepts, in rank order, onto catalog templates.
///
/// Each concept takes its own best-overlapping entry, so two concepts may
/// share a template but never a template+concept pair. Concepts matching no
/// keyword get [`LINEAR_FALLBACK`].
pub fn synthesize_formulas(concepts: &[Concept], max_formulas: usize) -> Vec<DerivedFormula> {
    let derived: Vec<DerivedFormula> = concepts
        .iter()
        .take(max_formulas.max(1))
        .map(|concept| {
            let template = best_template(&concept.term).unwrap_or(&LINEAR_FALLBACK);
            instantiate(template, &concept.term)
        })
        .collect();

    debug!(
        count = derived.len(),
        fallbacks = derived.iter().filter(|d| d.template_key == LINEAR_FALLBACK.key).count(),
        "synthesized formulas"
    );
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concepts(terms: &[&str]) -> Vec<Concept> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| Concept {
                term: t.to_string(),
                weight: 10.0 - i as f64,
                occurrences: 1,
                first_position: i,
            })
            .collect()
    }

    fn keys(derived: &[DerivedFormula]) -> Vec<&str> {
        derived.iter().map(|d| d.template_key).collect()
    }

    #[test]
    fn matches_keywords_accent_insensitively() {
        let derived = synthesize_formulas(&concepts(&["energía", "señal", "difusión"]), 5);
        assert_eq!(keys(&derived), vec!["energy", "field", "diffusion"]);
        assert_eq!(derived[0].formula.expression, "E(energía) = ½·κ·energía² + Φ·energía");
        assert!(derived[0].formula.explanation.contains("«energía»"));
    }

    #[test]
    fn unmatched_concept_does_not_take_a_matching_template() {
        let derived = synthesize_formulas(&concepts(&["zorro", "energia"]), 5);
        assert_eq!(keys(&derived), vec!["linear", "energy"]);
        assert_eq!(derived[0].formula.expression, "y = α·zorro + θ");
        assert_eq!(derived[1].formula.title, "Balance energético: energia");
    }

    #[test]
    fn concepts_may_share_a_template() {
        let derived = synthesize_formulas(&concepts(&["red", "neuronal", "adaptan", "conexion"]), 5);
        assert_eq!(keys(&derived), vec!["network", "adaptation", "adaptation", "network"]);
        let pairs: Vec<(&str, &str)> = derived
            .iter()
            .map(|d| (d.template_key, d.concept.as_str()))
            .collect();
        let mut unique = pairs.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn caps_at_max_formulas_and_keeps_rank_order() {
        let terms = ["alfa", "beta", "gamma", "delta", "epsilon", "zeta", "theta"];
        let derived = synthesize_formulas(&concepts(&terms), 5);
        assert_eq!(derived.len(), 5);
        let cs: Vec<&str> = derived.iter().map(|d| d.concept.as_str()).collect();
        assert_eq!(cs, &terms[..5]);
    }

    #[test]
    fn falls_back_to_linear_without_overlap() {
        let terms: Vec<String> = (0..10).map(|i| format!("termino{}", i)).collect();
        let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
        let derived = synthesize_formulas(&concepts(&refs), 10);
        assert_eq!(derived.len(), 10);
        assert!(derived.iter().all(|d| d.template_key == "linear"));
        assert_eq!(derived[9].formula.expression, "y = α·termino9 + θ");
    }

    #[test]
    fn every_catalog_expression_has_a_slot() {
        for template in FORMULA_CATALOG.iter().chain(std::iter::once(&LINEAR_FALLBACK)) {
            assert!(template.expression.contains(SYMBOL_SLOT), "{}", template.key);
            assert!(!template.symbols.is_empty(), "{}", template.key);
        }
    }
}
