//! Shared test doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use notepost::{PostError, PostId, PostingClient};

/// One `create_post` call as the client saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub text: String,
    pub reply_to: Option<String>,
}

/// Scripted response for the next call.
pub enum Scripted {
    Ok,
    RateLimited { reset_at: i64 },
    Fail { status: u16 },
}

/// Posting client that records calls and plays back scripted responses.
///
/// Once the script runs out every call succeeds. Successful calls are
/// assigned ids `1000`, `1001`, ...
#[derive(Default)]
pub struct MockClient {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_id: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PostingClient for MockClient {
    async fn create_post(
        &self,
        text: &str,
        reply_to: Option<&PostId>,
    ) -> Result<PostId, PostError> {
        self.calls.lock().unwrap().push(RecordedCall {
            text: text.to_string(),
            reply_to: reply_to.map(|id| id.as_str().to_string()),
        });

        let next = self.script.lock().unwrap().pop_front();
        match next.unwrap_or(Scripted::Ok) {
            Scripted::Ok => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                Ok(PostId::new(format!("{}", 1000 + n)))
            }
            Scripted::RateLimited { reset_at } => Err(PostError::RateLimited { reset_at }),
            Scripted::Fail { status } => Err(PostError::Api {
                status,
                detail: "rejected".to_string(),
            }),
        }
    }
}

/// `n` distinct posts.
pub fn queue(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("post number {i}")).collect()
}
