use crate::scene::Scene;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid fence regex"));
static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").expect("valid fence regex"));

/// Narration language of a generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Te,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Te => "te",
        }
    }

    /// Name used when instructing the model
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Te => "Telugu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured explainer script returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoScript {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: String,
    #[serde(default)]
    pub narration: String,
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl VideoScript {
    /// Minimal single-scene script built from unparseable model output.
    pub fn degraded(question: &str, raw: &str) -> Self {
        Self {
            title: format!("Explaining: {}", question),
            duration: "2-3 minutes".to_string(),
            narration: raw.to_string(),
            scenes: vec![Scene::new(
                1,
                "Introduction",
                "Opening scene with topic introduction",
                take_chars(raw, 200),
                format!("Educational visualization about {}", question),
            )],
            key_points: vec!["Key concept explained".to_string()],
            summary: take_chars(raw, 150),
        }
    }

    pub fn has_scene(&self, scene_number: u32) -> bool {
        self.scenes.iter().any(|s| s.scene_number == scene_number)
    }
}

/// Pull the JSON payload out of model output that may be wrapped in a code fence.
pub fn extract_json(text: &str) -> &str {
    let captured = JSON_FENCE
        .captures(text)
        .or_else(|| BARE_FENCE.captures(text))
        .and_then(|c| c.get(1));

    match captured {
        Some(m) => m.as_str().trim(),
        None => text.trim(),
    }
}

/// Turn raw gateway text into a script.
///
/// Never fails: output that does not parse is replaced by
/// [`VideoScript::degraded`] so the later stages always see a valid script.
pub fn parse_script(question: &str, raw: &str) -> VideoScript {
    match serde_json::from_str::<VideoScript>(extract_json(raw)) {
        Ok(mut script) => {
            normalize_scene_numbers(&mut script);
            info!(
                "Parsed script \"{}\" with {} scenes",
                script.title,
                script.scenes.len()
            );
            script
        }
        Err(e) => {
            warn!("Failed to parse script JSON, using degraded script: {}", e);
            VideoScript::degraded(question, raw)
        }
    }
}

fn normalize_scene_numbers(script: &mut VideoScript) {
    for (idx, scene) in script.scenes.iter_mut().enumerate() {
        let expected = idx as u32 + 1;
        if scene.scene_number != expected {
            warn!(
                "Scene at position {} was numbered {}, renumbering",
                expected, scene.scene_number
            );
            scene.scene_number = expected;
        }
    }
}

/// Accept a string, or a bare number such as `"duration": 3`
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}
