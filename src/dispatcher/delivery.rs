//! The delivery port (spec §4.8): a single async call per consumer per
//! iteration, mapping every non-2xx response, timeout, or connect error
//! onto `success = false`. The dispatcher never retries here — eviction
//! is the caller's job.

use serde::Serialize;
use uuid::Uuid;

use crate::consumers::{Consumer, ConsumerEndpoint};
use crate::store::Event;

pub struct DeliveryOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize)]
struct DeliveryBody<'a> {
    #[serde(rename = "consumerId")]
    consumer_id: Uuid,
    events: &'a [Event],
}

pub async fn deliver(client: &reqwest::Client, consumer: &Consumer, events: &[Event]) -> DeliveryOutcome {
    match &consumer.endpoint {
        ConsumerEndpoint::Http(url) => deliver_http(client, url.as_str(), None, consumer.id, events).await,
        ConsumerEndpoint::ExternalPush { endpoint, access_key } => {
            deliver_http(client, endpoint, Some(access_key.as_str()), consumer.id, events).await
        }
        ConsumerEndpoint::InProcess(handler) => match handler.deliver(consumer.id, events) {
            Ok(()) => DeliveryOutcome::ok(),
            Err(e) => DeliveryOutcome::fail(e),
        },
    }
}

async fn deliver_http(
    client: &reqwest::Client,
    url: &str,
    access_key: Option<&str>,
    consumer_id: Uuid,
    events: &[Event],
) -> DeliveryOutcome {
    let body = DeliveryBody { consumer_id, events };
    let mut request = client.post(url).json(&body);
    if let Some(key) = access_key {
        request = request.header("X-Access-Key", key);
    }
    match request.send().await {
        Ok(response) if response.status().is_success() => DeliveryOutcome::ok(),
        Ok(response) => DeliveryOutcome::fail(format!("callback returned {}", response.status())),
        Err(e) if e.is_timeout() => DeliveryOutcome::fail("callback timed out"),
        Err(e) => DeliveryOutcome::fail(format!("callback request failed: {e}")),
    }
}
