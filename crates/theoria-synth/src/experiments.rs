use theoria_core::{Formula, SystemModel};

const MODEL_FALLBACKS: [&str; 2] = [
    "Simular numéricamente el modelo «{m}» y comparar su trayectoria con los datos observados.",
    "Perturbar las condiciones iniciales del modelo «{m}» y medir la sensibilidad de su respuesta.",
];

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Model and phenomenon index pairs in round-robin order: each round walks
/// the models, model `i` taking phenomenon `(i + round) % len`. Every model
/// appears in the first round and no pair repeats.
fn interleaved_pairs(model_count: usize, phenomenon_count: usize) -> Vec<(usize, usize)> {
    (0..phenomenon_count)
        .flat_map(|round| {
            (0..model_count).map(move |model| (model, (model + round) % phenomenon_count))
        })
        .collect()
}

/// Experiments combine model focus with phenomena, models taking precedence
/// within each round. Formulas top the list up when there are too few
/// combinations.
pub fn recommend_experiments(
    models: &[SystemModel],
    phenomena: &[String],
    formulas: &[Formula],
    max_experiments: usize,
) -> Vec<String> {
    let limit = max_experiments.clamp(2, 4);
    let mut experiments: Vec<String> = interleaved_pairs(models.len(), phenomena.len())
        .into_iter()
        .take(limit)
        .map(|(m, p)| {
            format!(
                "Investigar experimentalmente {} observando {}.",
                models[m].focus,
                lowercase_first(&phenomena[p])
            )
        })
        .collect();

    for formula in formulas {
        if experiments.len() >= 2 {
            break;
        }
        experiments.push(format!(
            "Ajustar los parámetros de «{}» con mediciones controladas y contrastar la expresión {}.",
            formula.title, formula.expression
        ));
    }
    if !models.is_empty() {
        let missing = 2usize.saturating_sub(experiments.len());
        for i in 0..missing {
            let model = &models[i % models.len()];
            experiments.push(MODEL_FALLBACKS[i].replace("{m}", &model.name));
        }
    }
    experiments
}
