//! Mock bridge for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::{Bridge, BridgeFuture, InvokeBody};

/// A configurable mock response for [`MockBridge`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Resolve with this JSON value.
    Ok(Value),
    /// Reject with this message.
    Error(String),
}

#[derive(Default)]
struct Script {
    /// Popped from the back; the last one is repeated once exhausted.
    queue: Vec<MockResponse>,
    last: Option<MockResponse>,
}

/// A hand-rolled [`Bridge`] for tests.
///
/// Each command gets its own response sequence. Every invocation is recorded
/// with its body so tests can assert which commands ran.
pub struct MockBridge {
    scripts: Mutex<HashMap<String, Script>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, InvokeBody)>>,
}

impl Default for MockBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `command` with `response`. Repeated calls for the same command
    /// queue responses in order.
    pub fn on(self, command: &str, response: MockResponse) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts.entry(command.to_string()).or_default();
            script.queue.insert(0, response);
        }
        self
    }

    /// Set simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// How many times `command` was invoked.
    pub fn calls_to(&self, command: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == command)
            .count()
    }

    /// Commands in invocation order.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _)| c.clone())
            .collect()
    }

    /// Body of the most recent invocation.
    pub fn last_body(&self) -> Option<InvokeBody> {
        self.calls.lock().unwrap().last().map(|(_, b)| b.clone())
    }

    fn next_response(&self, command: &str) -> MockResponse {
        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(command) else {
            return MockResponse::Error(format!("unknown command: {command}"));
        };
        if let Some(resp) = script.queue.pop() {
            script.last = Some(resp.clone());
            resp
        } else {
            script
                .last
                .clone()
                .unwrap_or_else(|| MockResponse::Error(format!("no response for {command}")))
        }
    }
}

impl Bridge for MockBridge {
    fn invoke<'a>(&'a self, command: &'a str, body: InvokeBody) -> BridgeFuture<'a> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), body));
        let response = self.next_response(command);
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            match response {
                MockResponse::Ok(value) => Ok(value),
                MockResponse::Error(msg) => Err(msg),
            }
        })
    }
}
