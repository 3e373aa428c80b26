//! Turns a question into an explainer script with scene illustrations by
//! driving an external AI gateway through a four stage pipeline.

pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scene;
pub mod script;
pub mod video;

pub use api::{Gateway, GatewayClient, SceneImageRequest, ScriptRequest};
pub use config::{GatewayConfig, ImagePolicy, PipelineConfig};
pub use error::{GenerationError, Result};
pub use pipeline::{GenerationStep, Orchestrator, Session, StepId, StepStatus};
pub use scene::{Scene, SceneImage};
pub use script::{Language, VideoScript};
pub use video::GeneratedVideo;

/// Questions offered to users who don't know what to ask
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "Explain photosynthesis in simple terms",
    "How does a black hole form?",
    "What is quantum computing?",
    "Explain machine learning to a beginner",
];
