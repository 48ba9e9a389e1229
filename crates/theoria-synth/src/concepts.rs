use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use theoria_core::Concept;
use tracing::debug;

/// Concept reported when the input holds no usable term.
pub const FALLBACK_TERM: &str = "sistema";

const STOP_WORDS: &[&str] = &[
    // Spanish
    "a", "al", "algo", "ante", "antes", "aqui", "así", "asi", "aun", "bajo", "bien", "cada",
    "como", "cómo", "con", "contra", "cual", "cuál", "cuando", "cuándo", "de", "del", "desde",
    "donde", "dónde", "durante", "el", "él", "ella", "ellas", "ellos", "en", "entre", "era",
    "eran", "es", "esa", "esas", "ese", "eso", "esos", "esta", "está", "estaba", "estado",
    "están", "estas", "este", "esto", "estos", "fue", "fueron", "ha", "han", "hacia", "hasta",
    "hay", "la", "las", "le", "les", "lo", "los", "mas", "más", "me", "mi", "mis", "mismo",
    "mucho", "muy", "nada", "ni", "no", "nos", "nosotros", "o", "otra", "otro", "otros", "para",
    "pero", "poco", "por", "porque", "que", "qué", "quien", "se", "sea", "según", "segun", "ser",
    "si", "sí", "sido", "sin", "sobre", "son", "su", "sus", "también", "tambien", "tan", "tanto",
    "te", "tiene", "tienen", "todo", "todos", "tras", "tu", "tus", "un", "una", "unas", "uno",
    "unos", "y", "ya", "yo",
    // English
    "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "being", "between", "both", "but", "by", "can", "could", "did", "do", "does",
    "each", "for", "from", "had", "has", "have", "he", "her", "here", "him", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "may", "might", "more", "most", "must", "not", "of",
    "on", "only", "or", "other", "our", "over", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "through",
    "to", "under", "up", "us", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "will", "with", "would", "you", "your",
];

fn stop_words() -> FxHashSet<&'static str> {
    STOP_WORDS.iter().copied().collect()
}

/// Light suffix stripping so plural and singular forms merge.
pub fn stem(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let n = chars.len();
    if n <= 3 {
        return token.to_string();
    }
    let ends_with = |suffix: &str| token.ends_with(suffix);
    let keep = |len: usize| chars[..len].iter().collect::<String>();

    if ends_with("ies") && n > 4 {
        return keep(n - 3) + "y";
    }
    if ends_with("sses") {
        return keep(n - 2);
    }
    if ends_with("ces") && n > 4 {
        return keep(n - 3) + "z";
    }
    if ends_with("es") && n > 4 && matches!(chars[n - 3], 'x' | 'r' | 'l' | 'n' | 'd' | 'j') {
        return keep(n - 2);
    }
    if ends_with("s") && !ends_with("ss") && !ends_with("us") && !ends_with("is") {
        return keep(n - 1);
    }
    token.to_string()
}

fn is_candidate(token: &str, stop_words: &FxHashSet<&'static str>) -> bool {
    !stop_words.contains(token)
}

/// Boost in `(1, 2]` that decreases with the first-occurrence index.
pub fn positional_boost(first_position: usize, position_decay: f64) -> f64 {
    1.0 + 1.0 / (1.0 + first_position as f64 / position_decay)
}

pub fn rank_order(a: &Concept, b: &Concept) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.first_position.cmp(&b.first_position))
        .then_with(|| a.term.cmp(&b.term))
}

/// Ranks the `max_concepts` most salient terms of `tokens`.
///
/// Always returns at least one concept; when no token qualifies the
/// [`FALLBACK_TERM`] stands in.
pub fn extract_concepts(tokens: &[String], max_concepts: usize, position_decay: f64) -> Vec<Concept> {
    let stop_words = stop_words();
    let mut stats: FxHashMap<String, (usize, usize)> = FxHashMap::default();

    for (position, token) in tokens.iter().enumerate() {
        if !is_candidate(token, &stop_words) {
            continue;
        }
        stats
            .entry(stem(token))
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mut concepts: Vec<Concept> = stats
        .into_iter()
        .map(|(term, (occurrences, first_position))| Concept {
            weight: occurrences as f64 * positional_boost(first_position, position_decay),
            term,
            occurrences,
            first_position,
        })
        .collect();

    concepts.sort_by(rank_order);
    concepts.truncate(max_concepts.max(1));

    if concepts.is_empty() {
        debug!("no candidate terms, using fallback concept");
        concepts.push(Concept {
            term: FALLBACK_TERM.to_string(),
            weight: 1.0,
            occurrences: 0,
            first_position: 0,
        });
    }

    debug!(
        count = concepts.len(),
        top = %concepts[0].term,
        "extracted concepts"
    );
    concepts
}
