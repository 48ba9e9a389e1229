//! Turns files and audio metadata into the plain text plus descriptor the
//! engine consumes. Binary extraction happens upstream.

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use theoria_core::{Medium, SourceDescriptor};
use tracing::debug;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a", "aac", "opus"];

#[derive(Debug, Clone)]
pub struct IngestedSource {
    pub content: String,
    pub descriptor: SourceDescriptor,
}

/// Medium implied by a file extension, or an error for formats that need an
/// upstream extractor.
pub fn infer_medium(path: &Path) -> Result<Medium> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => bail!(
            "{} is a PDF; extract its text first and pass the text file with --medium pdf",
            path.display()
        ),
        ext if AUDIO_EXTENSIONS.contains(&ext) => bail!(
            "{} is an audio file; describe it with the `audio` subcommand",
            path.display()
        ),
        _ => Ok(Medium::Text),
    }
}

/// Reads `input` (a path, or `-` for stdin) as UTF-8 text.
pub fn read_text_source(
    input: &str,
    medium: Option<Medium>,
    notes: &[String],
) -> Result<IngestedSource> {
    let (content, medium, tag) = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading content from stdin")?;
        (buffer, medium.unwrap_or(Medium::Text), None)
    } else {
        let path = Path::new(input);
        let medium = match medium {
            Some(m) => m,
            None => infer_medium(path)?,
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let tag = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        (content, medium, tag)
    };

    let mut descriptor = SourceDescriptor::for_content(medium, &content);
    descriptor.context_tag = tag;
    descriptor.additional_notes = notes.to_vec();
    debug!(medium = %descriptor.medium, length = descriptor.length, "ingested text source");

    Ok(IngestedSource {
        content,
        descriptor,
    })
}

/// Technical metadata of an audio recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadata {
    pub duration_secs: f64,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
    pub channels: u16,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl AudioMetadata {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.duration_secs.is_finite() && self.duration_secs > 0.0,
            "duration must be a positive number of seconds"
        );
        ensure!(self.bitrate_kbps > 0, "bitrate must be > 0 kbps");
        ensure!(self.sample_rate_hz > 0, "sample rate must be > 0 Hz");
        ensure!(self.channels > 0, "channel count must be > 0");
        Ok(())
    }

    fn channel_layout(&self) -> String {
        match self.channels {
            1 => "un canal mono".to_string(),
            2 => "dos canales estéreo".to_string(),
            n => format!("{} canales", n),
        }
    }

    /// Deterministic technical description of the recording.
    pub fn describe(&self) -> String {
        let title = self
            .name
            .as_deref()
            .map(|n| format!(" «{}»", n))
            .unwrap_or_default();
        let sample_period_ms = 1000.0 / f64::from(self.sample_rate_hz);
        let total_kilobits = self.duration_secs * f64::from(self.bitrate_kbps);
        let nyquist_hz = self.sample_rate_hz / 2;

        let mut text = format!(
            "Registro de audio{} con una duración de {:.1} segundos, tasa de bits de {} kbps \
             y frecuencia de muestreo de {} Hz en {}. ",
            title,
            self.duration_secs,
            self.bitrate_kbps,
            self.sample_rate_hz,
            self.channel_layout()
        );
        text.push_str(&format!(
            "La señal digital tiene una resolución temporal de {:.4} milisegundos por muestra, \
             un ancho de banda útil de hasta {} Hz y un flujo total de información de {:.0} kilobits. ",
            sample_period_ms, nyquist_hz, total_kilobits
        ));
        if let Some(codec) = &self.codec {
            text.push_str(&format!(
                "La codificación {} comprime la señal y condiciona la energía espectral conservada. ",
                codec
            ));
        }
        text.push_str(
            "El contenido sonoro sugiere patrones de frecuencia, ritmo y energía acústica \
             cuya oscilación y propagación pueden analizarse como un sistema dinámico.",
        );
        text
    }

    pub fn notes(&self) -> Vec<String> {
        let mut notes = vec![
            format!("duración: {:.1} s", self.duration_secs),
            format!("tasa de bits: {} kbps", self.bitrate_kbps),
            format!("frecuencia de muestreo: {} Hz", self.sample_rate_hz),
            format!("canales: {}", self.channels),
        ];
        if let Some(codec) = &self.codec {
            notes.push(format!("códec: {}", codec));
        }
        notes
    }

    pub fn ingest(&self, extra_notes: &[String]) -> Result<IngestedSource> {
        self.validate()?;
        let content = self.describe();
        let mut descriptor = SourceDescriptor::for_content(Medium::Audio, &content);
        descriptor.context_tag = self.name.clone();
        descriptor.additional_notes = self.notes();
        descriptor.additional_notes.extend_from_slice(extra_notes);
        debug!(length = descriptor.length, "described audio metadata");
        Ok(IngestedSource {
            content,
            descriptor,
        })
    }
}
