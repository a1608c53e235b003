//! In-process text generator for HTTP tests
//!
//! Replays a queue of canned provider results and records every prompt it
//! receives, so tests can assert both the response and the number of calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use blogsmith::backend::generation::{ProviderError, RetryPolicy, TextGenerator};

pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::transport("script exhausted")))
    }
}

pub fn ok(text: &str) -> Result<String, ProviderError> {
    Ok(text.to_string())
}

pub fn quota() -> Result<String, ProviderError> {
    Err(ProviderError::new(Some(429), "Resource has been exhausted (e.g. check quota)."))
}

/// Millisecond delays so retry tests stay fast
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(20),
        multiplier: 2.0,
        deadline: Duration::from_secs(5),
        max_attempts: 3,
    }
}
