use super::step::{GenerationStep, StepTracker};
use crate::video::GeneratedVideo;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// State a front end reads: steps, current result, history.
///
/// Lives for one user session and is never persisted. Runs borrow it
/// mutably, so only one run can drive a session at a time.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) steps: StepTracker,
    history: Vec<Arc<GeneratedVideo>>,
    current: Option<Arc<GeneratedVideo>>,
    generating: bool,
    last_id: i64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[GenerationStep] {
        self.steps.steps()
    }

    pub fn tracker(&self) -> &StepTracker {
        &self.steps
    }

    /// Receive a snapshot of the step list after every change
    pub fn subscribe(&self) -> watch::Receiver<Vec<GenerationStep>> {
        self.steps.subscribe()
    }

    pub fn current(&self) -> Option<&Arc<GeneratedVideo>> {
        self.current.as_ref()
    }

    /// Results of this session, most recent first
    pub fn history(&self) -> &[Arc<GeneratedVideo>] {
        &self.history
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Show a past result. Does not touch history or start a run.
    pub fn select(&mut self, id: &str) -> Option<Arc<GeneratedVideo>> {
        let found = self.history.iter().find(|v| v.id == id).cloned()?;
        info!("Selected \"{}\" from history", found.title);
        self.current = Some(Arc::clone(&found));
        Some(found)
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub(crate) fn begin_run(&mut self) {
        self.generating = true;
        self.current = None;
        self.steps.reset();
    }

    pub(crate) fn end_run(&mut self) {
        self.generating = false;
    }

    pub(crate) fn record(&mut self, video: GeneratedVideo) -> Arc<GeneratedVideo> {
        let video = Arc::new(video);
        self.history.insert(0, Arc::clone(&video));
        self.current = Some(Arc::clone(&video));
        video
    }

    /// Millisecond timestamp id, bumped when two runs land in the same millisecond
    pub(crate) fn mint_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = if now > self.last_id { now } else { self.last_id + 1 };
        self.last_id = id;
        id.to_string()
    }
}
