use gloo_timers::future::TimeoutFuture;
use log::debug;
use serde::Serialize;

use crate::config;
use crate::error::SiteError;

/// Stand-in for a network call. The payload is encoded like a request body
/// and then the future resolves after a fixed delay. Swapping in a real
/// `fetch` only has to change `send`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedRequest {
    delay_ms: u32,
}

impl Default for SimulatedRequest {
    fn default() -> Self {
        Self::new(config::SIMULATED_REQUEST_DELAY)
    }
}

impl SimulatedRequest {
    pub fn new(delay_ms: u32) -> Self {
        Self { delay_ms }
    }

    pub async fn send<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<(), SiteError> {
        let body = encode(payload)?;
        debug!("simulated POST {} ({} ms): {}", endpoint, self.delay_ms, body);
        TimeoutFuture::new(self.delay_ms).await;
        Ok(())
    }
}

fn encode<T: Serialize>(payload: &T) -> Result<String, SiteError> {
    Ok(serde_json::to_string(payload)?)
}
