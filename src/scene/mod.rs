use serde::{Deserialize, Serialize};

/// One scene of the explainer breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position in the script, rewritten from position when parsed
    #[serde(default)]
    pub scene_number: u32,
    #[serde(default)]
    pub title: String,
    /// What should be on screen
    #[serde(default)]
    pub description: String,
    /// The part of the narration spoken over this scene
    #[serde(default)]
    pub narration_segment: String,
    /// Prompt handed to the image model
    #[serde(default)]
    pub visual_prompt: String,
}

impl Scene {
    pub fn new(
        scene_number: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        narration_segment: impl Into<String>,
        visual_prompt: impl Into<String>,
    ) -> Self {
        Self {
            scene_number,
            title: title.into(),
            description: description.into(),
            narration_segment: narration_segment.into(),
            visual_prompt: visual_prompt.into(),
        }
    }
}

/// Generated illustration for a scene, joined on `scene_number`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneImage {
    pub scene_number: u32,
    pub image_url: String,
}
