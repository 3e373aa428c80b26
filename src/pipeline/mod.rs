mod images;
mod orchestrator;
mod script;
mod session;
mod step;

pub use images::generate_scene_images;
pub use orchestrator::Orchestrator;
pub use script::generate_script;
pub use session::Session;
pub use step::{run_finished, GenerationStep, StepId, StepStatus, StepTracker, StepTransition};
