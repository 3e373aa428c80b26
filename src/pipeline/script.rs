use crate::api::{Gateway, ScriptRequest};
use crate::error::{GenerationError, Result};
use crate::script::{parse_script, Language, VideoScript};
use std::time::Duration;

/// Call the gateway once and turn its answer into a script.
///
/// Gateway failures propagate. Unparseable output does not: it becomes a
/// degraded single-scene script.
pub async fn generate_script<G>(
    gateway: &G,
    question: &str,
    language: Language,
    call_timeout: Option<Duration>,
) -> Result<VideoScript>
where
    G: Gateway + ?Sized,
{
    let request = ScriptRequest {
        question: question.to_string(),
        language,
    };

    let call = gateway.generate_script(&request);
    let raw = match call_timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| GenerationError::Timeout(limit))??,
        None => call.await?,
    };

    Ok(parse_script(question, &raw))
}
