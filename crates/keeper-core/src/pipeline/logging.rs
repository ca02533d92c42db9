use std::time::Instant;

use futures_util::future::BoxFuture;

use super::{Call, CallResult, Next, Stage};

/// Records method, duration and outcome of every call it wraps.
///
/// Sits outermost, so it also sees calls that a later stage rejects.
/// Payloads are never logged.
#[derive(Debug, Default)]
pub struct LoggingStage;

impl LoggingStage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for LoggingStage {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn handle<'a>(&'a self, call: Call, next: Next<'a>) -> BoxFuture<'a, CallResult> {
        Box::pin(async move {
            let method = call.method;
            let start = Instant::now();

            let result = next.run(call).await;

            let duration_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => tracing::info!(method, duration_ms, ok = true, "call completed"),
                Err(e) => tracing::warn!(
                    method,
                    duration_ms,
                    ok = false,
                    code = e.code(),
                    "call failed"
                ),
            }
            result
        })
    }
}
