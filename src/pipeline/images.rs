use crate::api::{Gateway, SceneImageRequest};
use crate::config::ImagePolicy;
use crate::error::GenerationError;
use crate::scene::{Scene, SceneImage};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{error, info, warn};

/// Generate illustrations for the leading scenes of a script.
///
/// At most `policy.max_images` scenes are attempted, `policy.concurrency`
/// at a time. A failed scene is logged and skipped. The result is in scene
/// order whatever the concurrency.
pub async fn generate_scene_images<G>(
    gateway: &G,
    scenes: &[Scene],
    policy: ImagePolicy,
    call_timeout: Option<Duration>,
) -> Vec<SceneImage>
where
    G: Gateway + ?Sized,
{
    let attempted = scenes.len().min(policy.max_images);
    info!("Generating images for {} of {} scenes", attempted, scenes.len());

    let images: Vec<SceneImage> = stream::iter(scenes.iter().take(attempted))
        .map(|scene| generate_one(gateway, scene, call_timeout))
        .buffered(policy.concurrency.max(1))
        .filter_map(|image| async move { image })
        .collect()
        .await;

    info!("Generated {}/{} scene images", images.len(), attempted);
    images
}

async fn generate_one<G>(
    gateway: &G,
    scene: &Scene,
    call_timeout: Option<Duration>,
) -> Option<SceneImage>
where
    G: Gateway + ?Sized,
{
    let request = SceneImageRequest {
        visual_prompt: scene.visual_prompt.clone(),
        scene_number: scene.scene_number,
        title: scene.title.clone(),
    };

    let call = gateway.generate_scene_image(&request);
    let result = match call_timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(GenerationError::Timeout(limit))),
        None => call.await,
    };

    match result {
        Ok(Some(image_url)) => Some(SceneImage {
            scene_number: scene.scene_number,
            image_url,
        }),
        Ok(None) => {
            warn!("Scene {} returned no image", scene.scene_number);
            None
        }
        Err(e) => {
            error!("Failed to generate image for scene {}: {}", scene.scene_number, e);
            None
        }
    }
}
