use crate::formulas::SymbolGloss;
use crate::normalizer::is_token_char;
use rustc_hash::{FxHashMap, FxHashSet};
use theoria_core::{Concept, ParameterEntry};
use tracing::debug;

/// Identifier runs of token characters plus underscores, so every concept
/// term substituted into an expression comes back out as one symbol.
fn symbol_tokens(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split(|c: char| !(is_token_char(c) || c == '_'))
        .filter(|t| !t.is_empty())
}

fn concept_description(concept: &Concept, rank: usize) -> String {
    format!(
        "Variable que representa el concepto «{}» (rango {}, {} menciones)",
        concept.term,
        rank + 1,
        concept.occurrences
    )
}

/// Builds the glossary of every known symbol found in `expressions`, in
/// first-appearance order. Concept symbols take precedence over catalog
/// symbols with the same label; unknown tokens are skipped.
pub fn build_parameter_table(
    expressions: &[&str],
    concepts: &[Concept],
    catalog_symbols: &[SymbolGloss],
) -> Vec<ParameterEntry> {
    let mut known: FxHashMap<&str, String> = FxHashMap::default();
    for (symbol, description) in catalog_symbols {
        known
            .entry(*symbol)
            .or_insert_with(|| description.to_string());
    }
    for (rank, concept) in concepts.iter().enumerate() {
        known.insert(concept.term.as_str(), concept_description(concept, rank));
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut table = Vec::new();
    for token in expressions.iter().flat_map(|e| symbol_tokens(*e)) {
        if seen.contains(token) {
            continue;
        }
        if let Some(description) = known.get(token) {
            seen.insert(token);
            table.push(ParameterEntry {
                label: token.to_string(),
                description: description.clone(),
            });
        }
    }

    debug!(entries = table.len(), "built parameter table");
    table
}
