//! In-process `TextGenerator` used by pipeline and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};

/// What the fake returns on every call.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Status(u16),
    Timeout,
}

/// Counts calls and remembers the last prompt it was given.
#[derive(Debug)]
pub struct FakeGenerator {
    reply: FakeReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self::new(FakeReply::Text(text.to_string()))
    }

    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Status(status) => Err(LlmError::Api {
                status: *status,
                message: "simulated upstream failure".to_string(),
            }),
            FakeReply::Timeout => Err(LlmError::Timeout {
                after: Duration::from_secs(30),
            }),
        }
    }
}
