use theoria_core::{Medium, SourceDescriptor, SynthesisConfig, SynthesisError, TheorySynthesis};
use theoria_synth::{synthesize, Synthesizer};

const PARAGRAPH: &str = "Las redes neuronales adaptan sus conexiones cuando la energía de \
    la señal cambia. La difusión del calor y las oscilaciones del campo modulan el \
    aprendizaje del sistema, mientras el ruido introduce incertidumbre en la información.";

fn text(content: &str) -> SourceDescriptor {
    SourceDescriptor::for_content(Medium::Text, content)
}

fn assert_well_formed(out: &TheorySynthesis) {
    assert!(!out.core_thesis.is_empty());
    assert!(!out.phenomena.is_empty() && out.phenomena.len() <= 4);
    assert!((1..=5).contains(&out.derived_formulas.len()));
    assert!((1..=2).contains(&out.system_models.len()));
    assert!(!out.parameter_table.is_empty());
    assert!((4..=6).contains(&out.inference_steps.len()));
    assert!((2..=4).contains(&out.recommended_experiments.len()));
    for score in [out.complexity_score, out.coherence] {
        assert!(!score.is_nan());
        assert!((0.0..=1.0).contains(&score), "score out of range: {}", score);
    }

    let mut labels: Vec<&str> = out.parameter_table.iter().map(|p| p.label.as_str()).collect();
    for label in &labels {
        assert!(out.mentions_symbol(label), "dangling parameter {}", label);
    }
    let total = labels.len();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels.len(), total, "duplicate parameter labels");
}

#[test]
fn single_word_produces_complete_synthesis() {
    let out = synthesize("energia", &text("energia")).unwrap();
    assert_well_formed(&out);
    assert_eq!(out.phenomena.len(), 1);
    assert_eq!(out.derived_formulas.len(), 1);
    assert!(out.derived_formulas[0].expression.contains("energia"));
    assert!(out.parameter_table.iter().any(|p| p.label == "energia"));
}

#[test]
fn medium_only_changes_signal_profile() {
    let content = "energia cinética";
    let as_text = synthesize(content, &text(content)).unwrap();
    let as_pdf = synthesize(content, &SourceDescriptor::for_content(Medium::Pdf, content)).unwrap();

    assert_eq!(as_text.signal_profile.medium, Medium::Text);
    assert_eq!(as_pdf.signal_profile.medium, Medium::Pdf);
    assert_eq!(as_text.phenomena, as_pdf.phenomena);
    assert_eq!(as_text.derived_formulas, as_pdf.derived_formulas);
    assert_eq!(as_text.complexity_score, as_pdf.complexity_score);
    assert_eq!(as_text.coherence, as_pdf.coherence);

    let mut normalized_pdf = as_pdf.clone();
    normalized_pdf.signal_profile.medium = Medium::Text;
    assert_eq!(normalized_pdf, as_text);
}

#[test]
fn repeated_paragraph_respects_caps() {
    let content = vec![PARAGRAPH; 1000].join(" ");
    let out = synthesize(&content, &text(&content)).unwrap();
    assert_well_formed(&out);
    assert!(out.derived_formulas.len() <= 5);
    assert!(out.system_models.len() <= 2);
    assert!(out.signal_profile.truncated);
    // Collapsing whitespace can only shrink the analysed window.
    assert!(out.signal_profile.analyzed_chars <= SynthesisConfig::default().max_input_chars);
}

#[test]
fn empty_content_is_rejected() {
    let err = synthesize("", &text("")).unwrap_err();
    assert!(matches!(err, SynthesisError::InvalidInput(_)));
    assert!(synthesize(" \t\n ", &text(" \t\n ")).is_err());
}

#[test]
fn punctuation_only_uses_fallbacks() {
    let config = SynthesisConfig::default();
    let out = synthesize("..???!!", &text("..???!!")).unwrap();
    assert_well_formed(&out);
    assert_eq!(out.complexity_score, config.scoring.baseline_complexity);
    assert_eq!(out.coherence, config.scoring.baseline_coherence);
    assert!(out.phenomena[0].contains("sistema"));
}

#[test]
fn output_is_deterministic() {
    let descriptor = text(PARAGRAPH).with_context_tag("notas.txt");
    let first = synthesize(PARAGRAPH, &descriptor).unwrap();
    for _ in 0..5 {
        assert_eq!(synthesize(PARAGRAPH, &descriptor).unwrap(), first);
    }
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&synthesize(PARAGRAPH, &descriptor).unwrap()).unwrap()
    );
}

#[test]
fn scores_bounded_across_lengths() {
    let base: String = PARAGRAPH.chars().cycle().take(100_000).collect();
    for len in [1usize, 2, 3, 10, 57, 400, 3_000, 25_000, 100_000] {
        let content: String = base.chars().take(len).collect();
        if content.trim().is_empty() {
            continue;
        }
        let out = synthesize(&content, &text(&content)).unwrap();
        assert_well_formed(&out);
    }
}

#[test]
fn non_linguistic_inputs_stay_consistent() {
    for content in ["1234 5678", "a b c d", "∑∫∂", "x", "the and of to", "ñ ñ ñ ñ"] {
        let out = synthesize(content, &text(content)).unwrap();
        assert_well_formed(&out);
    }
}

#[test]
fn rich_paragraph_maps_domain_keywords() {
    let out = synthesize(PARAGRAPH, &text(PARAGRAPH)).unwrap();
    assert_well_formed(&out);
    assert_eq!(out.derived_formulas.len(), 5);
    assert_eq!(out.system_models.len(), 2);
    assert_eq!(out.phenomena.len(), 4);
    assert_eq!(out.recommended_experiments.len(), 4);
}

#[test]
fn formulas_follow_each_concepts_best_template() {
    let out = synthesize("zorro energia", &text("zorro energia")).unwrap();
    let titles: Vec<&str> = out.derived_formulas.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Respuesta lineal: zorro", "Balance energético: energia"]);

    let out = synthesize(PARAGRAPH, &text(PARAGRAPH)).unwrap();
    let titles: Vec<&str> = out.derived_formulas.iter().map(|f| f.title.as_str()).collect();
    assert!(titles.contains(&"Balance energético: energía"));
    assert!(titles.contains(&"Dinámica en red: conexion"));
}

#[test]
fn every_selected_model_shapes_an_experiment() {
    let out = synthesize(PARAGRAPH, &text(PARAGRAPH)).unwrap();
    assert_eq!(out.system_models.len(), 2);
    for model in &out.system_models {
        assert!(
            out.recommended_experiments.iter().any(|e| e.contains(&model.focus)),
            "no experiment for {}",
            model.name
        );
    }
}

#[test]
fn short_non_stopword_tokens_become_concepts() {
    for (content, term) in [("pH UV", "ph"), ("1234 5678", "1234"), ("b c d", "b")] {
        let out = synthesize(content, &text(content)).unwrap();
        assert_well_formed(&out);
        assert!(out.phenomena[0].contains(term), "{:?}", out.phenomena);
        assert!(out.parameter_table.iter().any(|p| p.label == term));
    }
}

#[test]
fn superscripted_concept_gets_a_parameter_entry() {
    let content = "energía² energía² campo";
    let out = synthesize(content, &text(content)).unwrap();
    assert_well_formed(&out);
    assert!(out.derived_formulas[0].expression.contains("energía"));
    assert!(out.parameter_table.iter().any(|p| p.label == "energía"));
    assert!(out.parameter_table.iter().any(|p| p.label == "campo"));
}

#[test]
fn custom_caps_are_honoured() {
    let config = SynthesisConfig {
        max_formulas: 2,
        max_models: 1,
        max_phenomena: 1,
        max_experiments: 2,
        ..SynthesisConfig::default()
    };
    let synthesizer = Synthesizer::new(config).unwrap();
    let out = synthesizer.synthesize(PARAGRAPH, &text(PARAGRAPH)).unwrap();
    assert_eq!(out.derived_formulas.len(), 2);
    assert_eq!(out.system_models.len(), 1);
    assert_eq!(out.phenomena.len(), 1);
    assert_eq!(out.recommended_experiments.len(), 2);
}

#[test]
fn synthesizer_is_shareable_across_threads() {
    let synthesizer = std::sync::Arc::new(Synthesizer::default());
    let expected = synthesizer.synthesize(PARAGRAPH, &text(PARAGRAPH)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let synthesizer = synthesizer.clone();
            std::thread::spawn(move || synthesizer.synthesize(PARAGRAPH, &text(PARAGRAPH)).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
