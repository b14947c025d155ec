use std::time::Duration;

use spx_client::health::{self, Health};

/// Probes `url` without blocking the async runtime.
pub async fn probe(url: &str, timeout: Duration) -> Health {
    let target = url.to_owned();
    match tokio::task::spawn_blocking(move || health::probe(&target, timeout)).await {
        Ok(health) => health,
        Err(err) => Health::Unhealthy {
            attempts: 0,
            last_error: format!("health probe panicked: {err}"),
        },
    }
}
