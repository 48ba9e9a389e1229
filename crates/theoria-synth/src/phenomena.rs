use theoria_core::Concept;

/// Phrase templates for a pair of adjacent concepts (`{a}`, `{b}`).
const PAIR_TEMPLATES: &[&str] = &[
    "Interacción acoplada entre {a} y {b}",
    "Transferencia de {a} hacia {b} con retroalimentación",
    "Modulación de {b} inducida por variaciones de {a}",
    "Correlación emergente entre {a} y {b}",
];

/// Phrase templates for a concept without a successor.
const SINGLE_TEMPLATES: &[&str] = &[
    "Dinámica intrínseca de {a}",
    "Persistencia y variabilidad de {a}",
];

fn pick<'a>(templates: &[&'a str], index: usize, seed: u64) -> &'a str {
    let offset = (seed % templates.len() as u64) as usize;
    templates[(index + offset) % templates.len()]
}

/// One phenomenon per leading concept, each paired with its successor in
/// rank order. Yields `min(concepts, max_phenomena)` statements.
pub fn identify_phenomena(concepts: &[Concept], max_phenomena: usize, seed: u64) -> Vec<String> {
    let count = concepts.len().min(max_phenomena.max(1));

    (0..count)
        .map(|i| match concepts.get(i + 1) {
            Some(next) => pick(PAIR_TEMPLATES, i, seed)
                .replace("{a}", &concepts[i].term)
                .replace("{b}", &next.term),
            None => pick(SINGLE_TEMPLATES, i, seed).replace("{a}", &concepts[i].term),
        })
        .collect()
}
