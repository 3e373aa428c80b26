use super::images::generate_scene_images;
use super::script::generate_script;
use super::session::Session;
use super::step::StepId;
use crate::api::Gateway;
use crate::config::PipelineConfig;
use crate::error::{GenerationError, Result};
use crate::scene::SceneImage;
use crate::script::{Language, VideoScript};
use crate::video::GeneratedVideo;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Where a run currently is. Each state with a step maps onto one entry of
/// the session's step list.
#[derive(Debug)]
enum RunState {
    Script,
    Scenes {
        script: VideoScript,
    },
    Images {
        script: VideoScript,
    },
    Finalizing {
        script: VideoScript,
        images: Vec<SceneImage>,
    },
    Done(Arc<GeneratedVideo>),
    Failed(GenerationError),
}

impl RunState {
    fn step(&self) -> Option<StepId> {
        match self {
            RunState::Script => Some(StepId::Script),
            RunState::Scenes { .. } => Some(StepId::Scenes),
            RunState::Images { .. } => Some(StepId::Images),
            RunState::Finalizing { .. } => Some(StepId::Complete),
            RunState::Done(_) | RunState::Failed(_) => None,
        }
    }
}

/// Lowers the in-progress flag however the run ends, including when the
/// run future is dropped.
struct RunGuard<'a> {
    session: &'a mut Session,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.session.end_run();
    }
}

/// Drives runs from a question to a [`GeneratedVideo`]
pub struct Orchestrator<G> {
    gateway: G,
    config: PipelineConfig,
}

impl<G: Gateway> Orchestrator<G> {
    pub fn new(gateway: G, config: PipelineConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run all four stages for `question`.
    ///
    /// An empty question is rejected before anything in the session changes.
    /// Only a script failure aborts; image failures just leave scenes
    /// without pictures.
    pub async fn run(
        &self,
        session: &mut Session,
        question: &str,
        language: Language,
    ) -> Result<Arc<GeneratedVideo>> {
        let question = question.trim();
        if question.is_empty() {
            warn!("Rejected empty question");
            return Err(GenerationError::Validation);
        }

        info!("Starting generation run ({}): {}", language, question);
        session.begin_run();
        let mut guard = RunGuard { session };

        let mut state = RunState::Script;
        loop {
            if let Some(step) = state.step() {
                guard.session.steps.enter(step);
            }

            state = match state {
                RunState::Script => {
                    match generate_script(&self.gateway, question, language, self.config.call_timeout)
                        .await
                    {
                        Ok(script) => RunState::Scenes { script },
                        Err(e) => {
                            error!("Script generation failed: {}", e);
                            guard.session.steps.fail(StepId::Script);
                            RunState::Failed(e)
                        }
                    }
                }
                RunState::Scenes { script } => {
                    info!("Scene breakdown has {} scenes", script.scenes.len());
                    self.pause().await;
                    RunState::Images { script }
                }
                RunState::Images { script } => {
                    let images = generate_scene_images(
                        &self.gateway,
                        &script.scenes,
                        self.config.images,
                        self.config.call_timeout,
                    )
                    .await;
                    RunState::Finalizing { script, images }
                }
                RunState::Finalizing { script, images } => {
                    self.pause().await;
                    guard.session.steps.complete(StepId::Complete);

                    let video = GeneratedVideo {
                        id: guard.session.mint_id(),
                        question: question.to_string(),
                        language,
                        title: script.title.clone(),
                        description: script.summary.clone(),
                        scene_images: images,
                        script,
                        created_at: Utc::now(),
                    };
                    RunState::Done(guard.session.record(video))
                }
                RunState::Done(video) => {
                    info!(
                        "Content generated: \"{}\" with {} scene images",
                        video.title,
                        video.scene_images.len()
                    );
                    return Ok(video);
                }
                RunState::Failed(e) => return Err(e),
            };
        }
    }

    async fn pause(&self) {
        if !self.config.pacing.is_zero() {
            tokio::time::sleep(self.config.pacing).await;
        }
    }
}
