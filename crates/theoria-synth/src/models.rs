use crate::formulas::{fold_accents, keyword_matches, SymbolGloss, SYMBOL_SLOT};
use theoria_core::{Concept, SystemModel};
use tracing::debug;

#[derive(Debug)]
pub struct Archetype {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    /// Governing equation; `{s}` receives the concept that drives it.
    pub equation: &'static str,
    pub focus: &'static str,
    pub symbols: &'static [SymbolGloss],
}

pub static ARCHETYPES: &[Archetype] = &[
    Archetype {
        name: "Osciladores acoplados",
        keywords: &[
            "oscil", "ritmo", "ciclo", "frecuen", "frequen", "reson", "acopl", "coupl", "vibra",
            "onda", "wave", "sincron", "sync", "period", "fase", "phase",
        ],
        equation: "ẍ + ω²·x = κ·({s} − x)",
        focus: "el intercambio periódico de energía entre subsistemas acoplados",
        symbols: &[
            ("x", "desplazamiento del oscilador"),
            ("ω", "frecuencia natural"),
            ("κ", "constante de acoplamiento"),
        ],
    },
    Archetype {
        name: "Sistema difusivo",
        keywords: &[
            "difus", "diffus", "transport", "concentr", "calor", "heat", "temper", "dispers",
            "gradient", "flujo", "flow", "fluid", "particul",
        ],
        equation: "∂u/∂t = D·∇²u + {s}",
        focus: "la propagación espacial y el transporte a favor de gradientes",
        symbols: &[
            ("u", "campo de concentración"),
            ("t", "tiempo"),
            ("D", "coeficiente de difusión"),
        ],
    },
    Archetype {
        name: "Red adaptativa",
        keywords: &[
            "red", "network", "nodo", "node", "adapt", "aprend", "learn", "conex", "connect",
            "social", "neuron", "grafo", "graph", "memori", "memory",
        ],
        equation: "ẇ = η·{s}·y − λ·w",
        focus: "la reorganización de conexiones en respuesta a la actividad",
        symbols: &[
            ("w", "peso de conexión"),
            ("η", "tasa de aprendizaje"),
            ("y", "actividad postsináptica"),
            ("λ", "tasa de olvido"),
        ],
    },
    Archetype {
        name: "Sistema disipativo",
        keywords: &[
            "energ", "entrop", "disip", "dissip", "friccion", "friction", "termo", "thermo",
            "equilibr", "calor", "heat", "potenc",
        ],
        equation: "Ė = P({s}) − Γ·E",
        focus: "el balance entre la energía inyectada y la disipada",
        symbols: &[
            ("E", "energía almacenada"),
            ("P", "potencia de entrada"),
            ("Γ", "tasa de disipación"),
        ],
    },
    Archetype {
        name: "Dinámica poblacional",
        keywords: &[
            "poblac", "popul", "crecim", "growth", "especie", "species", "recurs", "resource",
            "compet", "ecolog", "biolog", "celul", "cell",
        ],
        equation: "Ṅ = r·N·(1 − N/K) − δ·{s}·N",
        focus: "el crecimiento limitado por recursos y la competencia",
        symbols: &[
            ("N", "tamaño de la población"),
            ("r", "tasa intrínseca de crecimiento"),
            ("K", "capacidad de carga"),
            ("δ", "intensidad de la presión externa"),
        ],
    },
    Archetype {
        name: "Lazo de control con retroalimentación",
        keywords: &[
            "control", "feedback", "retroal", "regul", "señal", "signal", "error", "sensor",
            "estabil", "stabil", "respuest", "respons",
        ],
        equation: "u = Kp·e + Ki·∫e dτ, e = {s} − y",
        focus: "la regulación de una variable hacia un valor de referencia",
        symbols: &[
            ("u", "acción de control"),
            ("Kp", "ganancia proporcional"),
            ("Ki", "ganancia integral"),
            ("e", "error de seguimiento"),
            ("y", "salida medida"),
        ],
    },
];

/// Index in [`ARCHETYPES`] returned when nothing overlaps.
pub const DEFAULT_ARCHETYPE: usize = 2;

#[derive(Debug, Clone)]
pub struct SelectedModel {
    pub model: SystemModel,
    pub score: f64,
    pub concept: String,
    pub symbols: &'static [SymbolGloss],
}

/// Jaccard-style overlap: matched keywords over the union of keywords and
/// concept terms.
pub fn archetype_score(archetype: &Archetype, concepts: &[Concept]) -> f64 {
    let folded: Vec<String> = concepts.iter().map(|c| fold_accents(&c.term)).collect();
    let matched = archetype
        .keywords
        .iter()
        .filter(|k| folded.iter().any(|term| keyword_matches(term, k)))
        .count();
    let union = archetype.keywords.len() + folded.len() - matched;
    if union == 0 {
        return 0.0;
    }
    matched as f64 / union as f64
}

/// Highest-ranked concept that overlaps the archetype, else the top concept.
fn driving_concept<'a>(archetype: &Archetype, concepts: &'a [Concept]) -> Option<&'a Concept> {
    concepts
        .iter()
        .find(|c| {
            let folded = fold_accents(&c.term);
            archetype.keywords.iter().any(|k| keyword_matches(&folded, k))
        })
        .or_else(|| concepts.first())
}

fn instantiate(archetype: &'static Archetype, score: f64, concepts: &[Concept]) -> SelectedModel {
    let concept = driving_concept(archetype, concepts)
        .map(|c| c.term.clone())
        .unwrap_or_else(|| crate::concepts::FALLBACK_TERM.to_string());
    SelectedModel {
        model: SystemModel {
            name: archetype.name.to_string(),
            governing_equation: archetype.equation.replace(SYMBOL_SLOT, &concept),
            focus: archetype.focus.to_string(),
        },
        score,
        concept,
        symbols: archetype.symbols,
    }
}

/// Picks up to `max_models` archetypes with positive overlap, best first,
/// ties in declaration order. Falls back to [`DEFAULT_ARCHETYPE`].
pub fn select_models(concepts: &[Concept], max_models: usize) -> Vec<SelectedModel> {
    let mut scored: Vec<(usize, f64)> = ARCHETYPES
        .iter()
        .enumerate()
        .map(|(idx, archetype)| (idx, archetype_score(archetype, concepts)))
        .filter(|(_, score)| *score > 0.0)
        .collect();
    // Stable sort keeps declaration order among equal scores.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(max_models.max(1));

    if scored.is_empty() {
        scored.push((DEFAULT_ARCHETYPE, 0.0));
    }

    let selected: Vec<SelectedModel> = scored
        .into_iter()
        .map(|(idx, score)| instantiate(&ARCHETYPES[idx], score, concepts))
        .collect();
    debug!(
        models = ?selected.iter().map(|m| m.model.name.as_str()).collect::<Vec<_>>(),
        "selected system models"
    );
    selected
}
