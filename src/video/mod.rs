use crate::scene::SceneImage;
use crate::script::{Language, VideoScript};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Result of one successful run. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVideo {
    pub id: String,
    pub question: String,
    pub language: Language,
    pub title: String,
    pub description: String,
    pub script: VideoScript,
    pub scene_images: Vec<SceneImage>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedVideo {
    pub fn image_for(&self, scene_number: u32) -> Option<&SceneImage> {
        self.scene_images
            .iter()
            .find(|img| img.scene_number == scene_number)
    }

    /// Render the script as a Markdown document
    pub fn to_markdown(&self) -> String {
        let script = &self.script;
        let mut out = String::new();

        let _ = writeln!(out, "# {}\n", script.title);
        let _ = writeln!(out, "## Summary\n{}\n", script.summary);

        out.push_str("## Key Points\n");
        for (i, point) in script.key_points.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, point);
        }

        let _ = writeln!(out, "\n## Full Narration\n{}\n", script.narration);

        out.push_str("## Scene Breakdown\n");
        for scene in &script.scenes {
            let _ = writeln!(out, "\n### Scene {}: {}", scene.scene_number, scene.title);
            let _ = writeln!(out, "**Description:** {}", scene.description);
            let _ = writeln!(out, "**Visual:** {}", scene.visual_prompt);
            let _ = writeln!(out, "**Narration:** {}", scene.narration_segment);
            if let Some(img) = self.image_for(scene.scene_number) {
                let _ = writeln!(out, "![Scene {}]({})", scene.scene_number, img.image_url);
            }
        }

        out
    }

    /// File name for the Markdown export, derived from the title
    pub fn export_file_name(&self) -> String {
        let slug: String = self
            .script
            .title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}.md", slug)
    }
}

/// Human friendly age of a history entry
pub fn format_relative(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let mins = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{} min ago", mins)
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}

/// Shorten a question for progress headers
pub fn preview(question: &str, max_chars: usize) -> String {
    if question.chars().count() > max_chars {
        let head: String = question.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        question.to_string()
    }
}
