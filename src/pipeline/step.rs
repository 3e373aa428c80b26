use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
use tracing::debug;

/// The four fixed stages of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    Script,
    Scenes,
    Images,
    Complete,
}

impl StepId {
    pub const ALL: [StepId; 4] = [
        StepId::Script,
        StepId::Scenes,
        StepId::Images,
        StepId::Complete,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Script => "script",
            StepId::Scenes => "scenes",
            StepId::Images => "images",
            StepId::Complete => "complete",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StepId::Script => "Generating AI script",
            StepId::Scenes => "Creating scene breakdown",
            StepId::Images => "Generating scene images",
            StepId::Complete => "Finalizing content",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStep {
    pub id: StepId,
    pub label: &'static str,
    pub status: StepStatus,
}

/// True once a run has nothing left to report: every step complete, or
/// one step failed
pub fn run_finished(steps: &[GenerationStep]) -> bool {
    steps.iter().any(|s| s.status == StepStatus::Error)
        || steps.iter().all(|s| s.status == StepStatus::Complete)
}

/// A single status change, kept for the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub id: StepId,
    pub status: StepStatus,
}

/// Owns the step list of a session and publishes every change.
///
/// Progress only moves left to right: entering a step marks all earlier
/// steps complete. The only way back is [`StepTracker::reset`].
#[derive(Debug)]
pub struct StepTracker {
    steps: Vec<GenerationStep>,
    transitions: Vec<StepTransition>,
    tx: watch::Sender<Vec<GenerationStep>>,
}

impl Default for StepTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTracker {
    pub fn new() -> Self {
        let steps: Vec<GenerationStep> = StepId::ALL
            .iter()
            .map(|&id| GenerationStep {
                id,
                label: id.label(),
                status: StepStatus::Pending,
            })
            .collect();
        let (tx, _rx) = watch::channel(steps.clone());
        Self {
            steps,
            transitions: Vec::new(),
            tx,
        }
    }

    pub fn steps(&self) -> &[GenerationStep] {
        &self.steps
    }

    pub fn status(&self, id: StepId) -> StepStatus {
        self.steps[id.index()].status
    }

    /// Status changes since the last reset, oldest first
    pub fn transitions(&self) -> &[StepTransition] {
        &self.transitions
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<GenerationStep>> {
        self.tx.subscribe()
    }

    pub fn reset(&mut self) {
        for step in &mut self.steps {
            step.status = StepStatus::Pending;
        }
        self.transitions.clear();
        self.publish();
    }

    /// Make `id` the active step
    pub fn enter(&mut self, id: StepId) {
        for step in &mut self.steps[..id.index()] {
            if step.status != StepStatus::Complete {
                step.status = StepStatus::Complete;
                self.transitions.push(StepTransition {
                    id: step.id,
                    status: StepStatus::Complete,
                });
            }
        }
        self.set(id, StepStatus::Active);
    }

    pub fn complete(&mut self, id: StepId) {
        self.set(id, StepStatus::Complete);
    }

    pub fn fail(&mut self, id: StepId) {
        self.set(id, StepStatus::Error);
    }

    fn set(&mut self, id: StepId, status: StepStatus) {
        debug!("Step {} -> {:?}", id, status);
        self.steps[id.index()].status = status;
        self.transitions.push(StepTransition { id, status });
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(self.steps.clone());
    }
}
