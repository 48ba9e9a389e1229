use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use std::fmt::Write;
use theoria_core::{to_markdown, TheorySynthesis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
    Markdown,
}

pub fn render(format: OutputFormat, synthesis: &TheorySynthesis) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(synthesis)?),
        OutputFormat::Pretty => Ok(render_pretty(synthesis)),
        OutputFormat::Markdown => Ok(to_markdown(synthesis)),
    }
}

fn score_colored(score: f64) -> colored::ColoredString {
    let text = format!("{:.2}", score);
    if score >= 0.66 {
        text.green()
    } else if score >= 0.33 {
        text.yellow()
    } else {
        text.red()
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.cyan().bold());
}

fn render_pretty(synthesis: &TheorySynthesis) -> String {
    let mut out = String::new();
    let profile = &synthesis.signal_profile;

    let _ = writeln!(out, "{}", synthesis.core_thesis.bold());
    let _ = writeln!(
        out,
        "\n{} {}  {} {}  {} {}",
        "medium:".cyan(),
        profile.medium.as_str().yellow(),
        "complexity:".cyan(),
        score_colored(synthesis.complexity_score),
        "coherence:".cyan(),
        score_colored(synthesis.coherence)
    );
    let _ = write!(
        out,
        "{} {} chars",
        "analyzed:".cyan(),
        profile.analyzed_chars.to_string().yellow()
    );
    if profile.truncated {
        let _ = write!(out, " {}", "(truncated)".red());
    }
    if let Some(tag) = &profile.context_tag {
        let _ = write!(out, "  {} {}", "source:".cyan(), tag.green());
    }
    out.push('\n');

    section(&mut out, "Phenomena");
    for phenomenon in &synthesis.phenomena {
        let _ = writeln!(out, "  • {}", phenomenon);
    }

    section(&mut out, "Derived formulas");
    for formula in &synthesis.derived_formulas {
        let _ = writeln!(out, "  {}", formula.title.bold());
        let _ = writeln!(out, "    {}", formula.expression.green());
        let _ = writeln!(out, "    {}", formula.explanation.dimmed());
    }

    section(&mut out, "System models");
    for model in &synthesis.system_models {
        let _ = writeln!(out, "  {}", model.name.bold());
        let _ = writeln!(out, "    {}", model.governing_equation.green());
        let _ = writeln!(out, "    {}", model.focus.dimmed());
    }

    section(&mut out, "Parameters");
    let width = synthesis
        .parameter_table
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &synthesis.parameter_table {
        let pad = width - entry.label.chars().count();
        let _ = writeln!(
            out,
            "  {}{}  {}",
            entry.label.yellow(),
            " ".repeat(pad),
            entry.description
        );
    }

    section(&mut out, "Inference");
    for (i, step) in synthesis.inference_steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    section(&mut out, "Recommended experiments");
    for experiment in &synthesis.recommended_experiments {
        let _ = writeln!(out, "  • {}", experiment);
    }

    out
}
