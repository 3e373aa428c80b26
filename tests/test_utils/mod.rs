#![allow(dead_code)]

//! Mock gateway for driving the pipeline without network access.

use async_trait::async_trait;
use auto_explainer::{Gateway, GenerationError, Result, SceneImageRequest, ScriptRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the mock answers to a script call
#[derive(Debug, Clone)]
pub enum ScriptReply {
    Text(String),
    RateLimited,
    QuotaExhausted,
    Upstream(String),
    /// Never answers
    Hang,
}

/// What the mock answers to an image call
#[derive(Debug, Clone)]
pub enum ImageReply {
    Url(String),
    Missing,
    Fail,
    /// Answer with a URL after the given delay
    Slow(Duration),
}

pub struct MockGateway {
    script_replies: Mutex<Vec<ScriptReply>>,
    image_replies: HashMap<u32, ImageReply>,
    script_calls: AtomicUsize,
    image_calls: Mutex<Vec<u32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGateway {
    /// Replies are used in order; the last one repeats forever.
    pub fn new(script_replies: Vec<ScriptReply>) -> Self {
        assert!(!script_replies.is_empty(), "need at least one script reply");
        Self {
            script_replies: Mutex::new(script_replies),
            image_replies: HashMap::new(),
            script_calls: AtomicUsize::new(0),
            image_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_script(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptReply::Text(text.into())])
    }

    pub fn failing(reply: ScriptReply) -> Self {
        Self::new(vec![reply])
    }

    pub fn image_reply(mut self, scene_number: u32, reply: ImageReply) -> Self {
        self.image_replies.insert(scene_number, reply);
        self
    }

    pub fn script_calls(&self) -> usize {
        self.script_calls.load(Ordering::SeqCst)
    }

    /// Scene numbers of image calls, in the order they were issued
    pub fn image_calls(&self) -> Vec<u32> {
        self.image_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_script_reply(&self) -> ScriptReply {
        let mut replies = self.script_replies.lock().unwrap();
        if replies.len() > 1 {
            replies.remove(0)
        } else {
            replies[0].clone()
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn generate_script(&self, _request: &ScriptRequest) -> Result<String> {
        self.script_calls.fetch_add(1, Ordering::SeqCst);
        match self.next_script_reply() {
            ScriptReply::Text(text) => Ok(text),
            ScriptReply::RateLimited => Err(GenerationError::RateLimited),
            ScriptReply::QuotaExhausted => Err(GenerationError::QuotaExhausted),
            ScriptReply::Upstream(msg) => Err(GenerationError::Upstream(msg)),
            ScriptReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GenerationError::Upstream("woke up".into()))
            }
        }
    }

    async fn generate_scene_image(&self, request: &SceneImageRequest) -> Result<Option<String>> {
        self.image_calls.lock().unwrap().push(request.scene_number);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let default_url = format!("https://images.test/scene-{}.png", request.scene_number);
        let reply = self
            .image_replies
            .get(&request.scene_number)
            .cloned()
            .unwrap_or(ImageReply::Url(default_url.clone()));

        let result = match reply {
            ImageReply::Url(url) => Ok(Some(url)),
            ImageReply::Missing => Ok(None),
            ImageReply::Fail => Err(GenerationError::Upstream("image model failed".into())),
            ImageReply::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(Some(default_url))
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Script JSON with `n` scenes, optionally wrapped in a json code fence
pub fn script_json(title: &str, n: u32, fenced: bool) -> String {
    let scenes: Vec<serde_json::Value> = (1..=n)
        .map(|i| {
            serde_json::json!({
                "sceneNumber": i,
                "title": format!("Scene {}", i),
                "description": format!("Description {}", i),
                "narrationSegment": format!("Narration {}", i),
                "visualPrompt": format!("Visual prompt {}", i),
            })
        })
        .collect();

    let body = serde_json::json!({
        "title": title,
        "duration": "2-3 minutes",
        "narration": "Full narration.",
        "scenes": scenes,
        "keyPoints": ["One", "Two", "Three"],
        "summary": format!("Summary of {}", title),
    })
    .to_string();

    if fenced {
        format!("```json\n{}\n```", body)
    } else {
        body
    }
}
