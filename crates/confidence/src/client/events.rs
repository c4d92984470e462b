use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::{Confidence, outside_runtime};
use super::transport::{Event, PublishRequest, PublishResponse, Sdk};
use crate::value::{FieldValue, Object};

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Confidence {
    /// Publishes `event_name` with `data` and the handle's context.
    ///
    /// Blocks until the publish request finishes. Failures are logged and
    /// never returned.
    #[instrument(skip(self, data), fields(event = %event_name))]
    pub fn track(&self, event_name: &str, data: Object) {
        let request = self.publish_request(event_name, data);
        if let Err(e) = outside_runtime(|| self.publish_blocking(&request)) {
            warn!(error = %e, "Failed to publish event");
        }
    }

    /// Publishes `event_name` on a spawned tokio task.
    ///
    /// Dropping the returned handle does not cancel the publish.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn track_async(&self, event_name: &str, data: Object) -> JoinHandle<()> {
        let this = self.clone();
        let event_name = event_name.to_string();
        tokio::spawn(async move { this.publish(&event_name, data).await })
    }

    fn publish_blocking(&self, request: &PublishRequest<'_>) {
        let http = match self.inner.blocking_http() {
            Ok(http) => http,
            Err(e) => {
                warn!(error = %e, "Failed to publish event");
                return;
            }
        };

        match http
            .post(&self.inner.events_url)
            .timeout(self.inner.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
        {
            Ok(response) => {
                let status = response.status();
                match response.bytes() {
                    Ok(body) => log_publish_response(status, &body),
                    Err(e) => warn!(error = %e, "Failed to read publish response"),
                }
            }
            Err(e) => warn!(error = %e, "Failed to publish event"),
        }
    }

    #[instrument(skip(self, data), fields(event = %event_name))]
    async fn publish(&self, event_name: &str, data: Object) {
        let request = self.publish_request(event_name, data);

        let response = self
            .inner
            .http
            .post(&self.inner.events_url)
            .timeout(self.inner.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(body) => log_publish_response(status, &body),
                    Err(e) => warn!(error = %e, "Failed to read publish response"),
                }
            }
            Err(e) => warn!(error = %e, "Failed to publish event"),
        }
    }

    fn publish_request(&self, event_name: &str, data: Object) -> PublishRequest<'_> {
        let context: Object = self
            .context
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut payload = Object::from([("context".to_string(), FieldValue::Map(context))]);
        payload.extend(data);

        let timestamp = now();
        PublishRequest {
            client_secret: &self.inner.client_secret,
            send_time: timestamp.clone(),
            events: vec![Event {
                event_definition: format!("eventDefinitions/{}", event_name),
                payload,
                event_time: timestamp,
            }],
            sdk: Sdk::current(),
        }
    }
}

fn log_publish_response(status: StatusCode, body: &[u8]) {
    if status != StatusCode::OK {
        warn!(status = status.as_u16(), "Event publish was rejected");
        return;
    }
    match serde_json::from_slice::<PublishResponse>(body) {
        Ok(response) if response.errors.is_empty() => debug!("Event published"),
        Ok(response) => {
            for error in &response.errors {
                warn!(error = %error, "Event publish reported an error");
            }
        }
        Err(e) => debug!(error = %e, "Event published with unreadable response"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfidenceOptions;
    use crate::telemetry::Telemetry;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_publish_request_shape() {
        let confidence = Confidence::new(
            "secret",
            ConfidenceOptions::default().with_telemetry(Arc::new(Telemetry::new("1", true))),
        )
        .unwrap()
        .with_context([("targeting_key", "user-1")]);

        let data = Object::from([("amount".to_string(), FieldValue::Int(3))]);
        let request = serde_json::to_value(confidence.publish_request("purchase", data)).unwrap();

        assert_eq!(request["clientSecret"], "secret");
        assert_eq!(request["sdk"]["id"], "SDK_ID_RUST_CONFIDENCE");
        let event = &request["events"][0];
        assert_eq!(event["eventDefinition"], "eventDefinitions/purchase");
        assert_eq!(
            event["payload"],
            json!({"context": {"targeting_key": "user-1"}, "amount": 3})
        );
        let event_time = event["eventTime"].as_str().unwrap();
        assert!(event_time.ends_with('Z'));
        assert_eq!(request["sendTime"].as_str(), Some(event_time));
    }
}
