mod ingest;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use ingest::{AudioMetadata, IngestedSource};
use render::{render, OutputFormat};
use std::path::PathBuf;
use theoria_core::{ConfigLoader, Medium, TheoriaConfig};
use theoria_synth::Synthesizer;
use tracing::{debug, info};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

#[derive(Parser)]
#[command(name = "theoria")]
#[command(about = "Theoria - deterministic theory synthesis from text", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty, markdown)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Directory holding default.toml / {env}.toml / local.toml
    #[arg(long, global = true, env = "THEORIA_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Configuration environment name
    #[arg(long, global = true)]
    env: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a theory from a text file, or stdin with `-`
    Synthesize {
        /// Input path or `-`
        input: String,

        /// Medium the text was extracted from (text, pdf, audio)
        #[arg(short, long)]
        medium: Option<Medium>,

        /// Context tag recorded in the signal profile
        #[arg(short, long)]
        tag: Option<String>,

        /// Free-form note attached to the source (repeatable)
        #[arg(short, long)]
        note: Vec<String>,
    },

    /// Synthesize a theory from audio recording metadata
    Audio {
        /// Duration in seconds
        #[arg(long)]
        duration: f64,

        /// Bitrate in kbps
        #[arg(long)]
        bitrate: u32,

        /// Sample rate in Hz
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Channel count
        #[arg(long, default_value = "2")]
        channels: u16,

        /// Codec name
        #[arg(long)]
        codec: Option<String>,

        /// Recording name
        #[arg(long)]
        name: Option<String>,

        /// Free-form note attached to the source (repeatable)
        #[arg(short, long)]
        note: Vec<String>,
    },

    /// Print the effective configuration
    Config {
        /// Print the JSON schema instead
        #[arg(long)]
        schema: bool,
    },
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn filter_directives(level: &str) -> String {
    format!(
        "theoria={lvl},theoria_core={lvl},theoria_synth={lvl}",
        lvl = level
    )
}

/// Installs the subscriber before anything else logs. Returns a handle when
/// neither `RUST_LOG` nor `--verbose` fixed the filter, so the configured
/// level can be applied once the configuration is loaded.
fn init_tracing(verbose: bool) -> Option<FilterHandle> {
    let (filter, adjustable) = if verbose {
        (EnvFilter::new(filter_directives("debug")), false)
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, false),
            Err(_) => (EnvFilter::new(filter_directives("info")), true),
        }
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    adjustable.then_some(handle)
}

fn apply_configured_level(handle: Option<FilterHandle>, level: &str) -> Result<()> {
    if let Some(handle) = handle {
        handle
            .reload(EnvFilter::new(filter_directives(level)))
            .context("applying configured log level")?;
        debug!(level, "log level taken from configuration");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<TheoriaConfig> {
    let dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(ConfigLoader::default_config_dir);
    let mut loader = ConfigLoader::new(dir);
    if let Some(env) = &cli.env {
        loader = loader.with_env(env.clone());
    }
    loader
        .load()
        .with_context(|| format!("loading configuration from {}", loader.config_dir().display()))
}

fn emit(cli: &Cli, text: &str) -> Result<()> {
    match &cli.out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "result written");
        }
        None => println!("{}", text.trim_end()),
    }
    Ok(())
}

fn run_synthesis(cli: &Cli, config: TheoriaConfig, source: IngestedSource) -> Result<()> {
    let synthesizer =
        Synthesizer::new(config.synthesis).context("building synthesizer from configuration")?;
    let synthesis = synthesizer
        .synthesize(&source.content, &source.descriptor)
        .context("synthesis failed")?;
    debug!(
        formulas = synthesis.derived_formulas.len(),
        models = synthesis.system_models.len(),
        "rendering result"
    );
    emit(cli, &render(cli.output, &synthesis)?)
}

fn execute(cli: &Cli, config: TheoriaConfig) -> Result<()> {
    match &cli.command {
        Commands::Synthesize {
            input,
            medium,
            tag,
            note,
        } => {
            let mut source = ingest::read_text_source(input, *medium, note)?;
            if let Some(tag) = tag {
                source.descriptor.context_tag = Some(tag.clone());
            }
            run_synthesis(cli, config, source)
        }
        Commands::Audio {
            duration,
            bitrate,
            sample_rate,
            channels,
            codec,
            name,
            note,
        } => {
            let metadata = AudioMetadata {
                duration_secs: *duration,
                bitrate_kbps: *bitrate,
                sample_rate_hz: *sample_rate,
                channels: *channels,
                codec: codec.clone(),
                name: name.clone(),
            };
            let source = metadata.ingest(note)?;
            run_synthesis(cli, config, source)
        }
        Commands::Config { schema } => {
            let text = if *schema {
                serde_json::to_string_pretty(&TheoriaConfig::json_schema())?
            } else {
                config.to_toml()?
            };
            emit(cli, &text)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if cli.out.is_some() {
        colored::control::set_override(false);
    }

    let handle = init_tracing(cli.verbose);
    let result = load_config(&cli).and_then(|config| {
        apply_configured_level(handle, &config.logging.level)?;
        execute(&cli, config)
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let directives = filter_directives("warn");
        for target in ["theoria=warn", "theoria_core=warn", "theoria_synth=warn"] {
            assert!(directives.contains(target));
        }
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn cli_accepts_medium_and_notes() {
        let cli = Cli::try_parse_from([
            "theoria",
            "-o",
            "json",
            "synthesize",
            "notas.txt",
            "--medium",
            "pdf",
            "-n",
            "a",
            "-n",
            "b",
        ])
        .unwrap();
        match cli.command {
            Commands::Synthesize { medium, note, .. } => {
                assert_eq!(medium, Some(Medium::Pdf));
                assert_eq!(note, vec!["a", "b"]);
            }
            _ => panic!("expected synthesize"),
        }
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
