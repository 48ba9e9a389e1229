use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of source the analysed text was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Text,
    Pdf,
    Audio,
}

impl Default for Medium {
    fn default() -> Self {
        Medium::Text
    }
}

impl Medium {
    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::Text => "text",
            Medium::Pdf => "pdf",
            Medium::Audio => "audio",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown medium '{0}' (expected text, pdf or audio)")]
pub struct ParseMediumError(pub String);

impl FromStr for Medium {
    type Err = ParseMediumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Medium::Text),
            "pdf" => Ok(Medium::Pdf),
            "audio" => Ok(Medium::Audio),
            other => Err(ParseMediumError(other.to_string())),
        }
    }
}

/// Describes where the content handed to the engine came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub medium: Medium,
    /// Character count of the extracted content.
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_notes: Vec<String>,
}

impl SourceDescriptor {
    pub fn new(medium: Medium, length: usize) -> Self {
        Self {
            medium,
            length,
            context_tag: None,
            additional_notes: Vec::new(),
        }
    }

    /// Descriptor for `content`, with `length` taken from its character count.
    pub fn for_content(medium: Medium, content: &str) -> Self {
        Self::new(medium, content.chars().count())
    }

    pub fn with_context_tag(mut self, tag: impl Into<String>) -> Self {
        self.context_tag = Some(tag.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.additional_notes.push(note.into());
        self
    }
}

/// A salient term ranked by weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub term: String,
    pub weight: f64,
    pub occurrences: usize,
    /// Token index of the first mention.
    pub first_position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub title: String,
    pub expression: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemModel {
    pub name: String,
    pub governing_equation: String,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterEntry {
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalProfile {
    pub medium: Medium,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_tag: Option<String>,
    /// Characters actually analysed after the length cap.
    pub analyzed_chars: usize,
    pub truncated: bool,
}

/// The structured artifact produced for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheorySynthesis {
    pub core_thesis: String,
    pub phenomena: Vec<String>,
    pub derived_formulas: Vec<Formula>,
    pub system_models: Vec<SystemModel>,
    pub parameter_table: Vec<ParameterEntry>,
    pub complexity_score: f64,
    pub coherence: f64,
    pub signal_profile: SignalProfile,
    pub inference_steps: Vec<String>,
    pub recommended_experiments: Vec<String>,
}

impl TheorySynthesis {
    /// Whether `symbol` appears literally in some formula expression or
    /// governing equation.
    pub fn mentions_symbol(&self, symbol: &str) -> bool {
        self.derived_formulas
            .iter()
            .any(|f| f.expression.contains(symbol))
            || self
                .system_models
                .iter()
                .any(|m| m.governing_equation.contains(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_round_trips_through_strings() {
        for medium in [Medium::Text, Medium::Pdf, Medium::Audio] {
            assert_eq!(medium.to_string().parse::<Medium>(), Ok(medium));
        }
        assert_eq!(" PDF ".parse::<Medium>(), Ok(Medium::Pdf));
        assert!("video".parse::<Medium>().is_err());
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let descriptor = SourceDescriptor::for_content(Medium::Audio, "señal")
            .with_context_tag("clip.wav")
            .with_note("44100 Hz");
        assert_eq!(descriptor.length, 5);

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["medium"], "audio");
        assert_eq!(json["contextTag"], "clip.wav");
        assert_eq!(json["additionalNotes"][0], "44100 Hz");
    }
}
