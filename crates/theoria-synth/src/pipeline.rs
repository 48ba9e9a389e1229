use crate::concepts::extract_concepts;
use crate::experiments::recommend_experiments;
use crate::formulas::{synthesize_formulas, SymbolGloss};
use crate::metrics::compute_metrics;
use crate::models::select_models;
use crate::narrative::{narrate, PipelineTrace};
use crate::normalizer::{normalize, NormalizedText};
use crate::parameters::build_parameter_table;
use crate::phenomena::identify_phenomena;
use theoria_core::{
    Concept, ConfigError, Formula, Result, SignalProfile, SourceDescriptor, SynthesisConfig,
    SystemModel, TheorySynthesis,
};
use tracing::{debug, instrument};

const THESIS_TEMPLATES: &[&str] = &[
    "El contenido se organiza en torno a «{a}», cuya interacción con {others} se describe mejor como {model}.",
    "«{a}» actúa como variable central: sus relaciones con {others} sugieren una estructura de {model}.",
    "La evidencia textual apunta a que «{a}» gobierna el sistema y, junto con {others}, admite una lectura como {model}.",
];

const EXCERPT_CHARS: usize = 160;

fn excerpt(normalized: &NormalizedText) -> Option<String> {
    let sentence = normalized.sentences.first()?;
    let mut chars = sentence.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        Some(format!("{}…", head.trim_end()))
    } else {
        Some(head)
    }
}

fn compose_thesis(normalized: &NormalizedText, concepts: &[Concept], models: &[SystemModel]) -> String {
    let lead = concepts
        .first()
        .map(|c| c.term.as_str())
        .unwrap_or(crate::concepts::FALLBACK_TERM);
    let others = if concepts.len() > 1 {
        concepts[1..concepts.len().min(4)]
            .iter()
            .map(|c| format!("«{}»", c.term))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        "su propio entorno".to_string()
    };
    let model = models
        .first()
        .map(|m| m.name.to_lowercase())
        .unwrap_or_else(|| "sistema dinámico".to_string());

    let template = THESIS_TEMPLATES[(normalized.seed % THESIS_TEMPLATES.len() as u64) as usize];
    let mut thesis = template
        .replace("{a}", lead)
        .replace("{others}", &others)
        .replace("{model}", &model);
    if let Some(fragment) = excerpt(normalized) {
        thesis.push_str(&format!(" Fragmento de referencia: \"{}\"", fragment));
    }
    thesis
}

/// Runs the synthesis stages with a fixed configuration.
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    #[instrument(
        skip(self, content, descriptor),
        fields(medium = %descriptor.medium, length = descriptor.length)
    )]
    pub fn synthesize(
        &self,
        content: &str,
        descriptor: &SourceDescriptor,
    ) -> Result<TheorySynthesis> {
        let config = &self.config;

        // Blank content is the only rejected input; normalize reports it.
        let normalized = normalize(content, config.max_input_chars)?;
        let concepts = extract_concepts(
            &normalized.tokens,
            config.max_concepts,
            config.position_decay,
        );
        let metrics = compute_metrics(
            &normalized.tokens,
            normalized.sentences.len(),
            &concepts,
            &config.scoring,
        );
        let phenomena = identify_phenomena(&concepts, config.max_phenomena, normalized.seed);
        let derived = synthesize_formulas(&concepts, config.max_formulas);
        let selected = select_models(&concepts, config.max_models);

        let expressions: Vec<&str> = derived
            .iter()
            .map(|d| d.formula.expression.as_str())
            .chain(selected.iter().map(|m| m.model.governing_equation.as_str()))
            .collect();
        let catalog_symbols: Vec<SymbolGloss> = derived
            .iter()
            .flat_map(|d| d.symbols.iter().copied())
            .chain(selected.iter().flat_map(|m| m.symbols.iter().copied()))
            .collect();
        let parameter_table = build_parameter_table(&expressions, &concepts, &catalog_symbols);

        let derived_formulas: Vec<Formula> = derived.into_iter().map(|d| d.formula).collect();
        let system_models: Vec<SystemModel> = selected.into_iter().map(|m| m.model).collect();

        let inference_steps = narrate(&PipelineTrace {
            sentence_count: normalized.sentences.len(),
            truncated: normalized.truncated,
            concepts: &concepts,
            metrics: &metrics,
            models: &system_models,
            formulas: &derived_formulas,
            parameter_count: parameter_table.len(),
        });
        let recommended_experiments = recommend_experiments(
            &system_models,
            &phenomena,
            &derived_formulas,
            config.max_experiments,
        );
        let core_thesis = compose_thesis(&normalized, &concepts, &system_models);

        debug!(
            concepts = concepts.len(),
            formulas = derived_formulas.len(),
            models = system_models.len(),
            parameters = parameter_table.len(),
            "synthesis complete"
        );

        Ok(TheorySynthesis {
            core_thesis,
            phenomena,
            derived_formulas,
            system_models,
            parameter_table,
            complexity_score: metrics.complexity_score,
            coherence: metrics.coherence,
            signal_profile: SignalProfile {
                medium: descriptor.medium,
                context_tag: descriptor.context_tag.clone(),
                analyzed_chars: normalized.analyzed_chars(),
                truncated: normalized.truncated,
            },
            inference_steps,
            recommended_experiments,
        })
    }
}

/// Synthesizes `content` with the default configuration.
pub fn synthesize(content: &str, descriptor: &SourceDescriptor) -> Result<TheorySynthesis> {
    Synthesizer::default().synthesize(content, descriptor)
}
