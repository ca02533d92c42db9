use std::time::Duration;

use futures_util::future::BoxFuture;

use keeper_types::error::VaultError;

use super::{Call, CallResult, Next, Stage};

/// Bounds how long the rest of the pipeline may run.
///
/// On timeout the inner future is dropped, which cancels any store I/O it was
/// waiting on. Cipher work is synchronous and is never interrupted halfway.
#[derive(Debug)]
pub struct DeadlineStage {
    limit: Duration,
}

impl DeadlineStage {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl Stage for DeadlineStage {
    fn name(&self) -> &'static str {
        "deadline"
    }

    fn handle<'a>(&'a self, call: Call, next: Next<'a>) -> BoxFuture<'a, CallResult> {
        Box::pin(async move {
            let method = call.method;
            match tokio::time::timeout(self.limit, next.run(call)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(method, limit_ms = self.limit.as_millis() as u64, "deadline exceeded");
                    Err(VaultError::Unavailable("deadline exceeded".to_string()))
                }
            }
        })
    }
}
