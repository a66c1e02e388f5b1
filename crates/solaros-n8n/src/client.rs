use crate::error::{N8nError, N8nResult};
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{error, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook paths of the business workflows on the n8n side
pub const CUSTOMER_UPDATE_WEBHOOK: &str = "customer-update";
pub const JOB_SCHEDULED_WEBHOOK: &str = "job-scheduled";
pub const LEAD_RECEIVED_WEBHOOK: &str = "lead-received";
pub const INVENTORY_ALERT_WEBHOOK: &str = "inventory-alert";
pub const PAYMENT_RECEIVED_WEBHOOK: &str = "payment-received";

/// How soon a low stock item needs reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
}

impl Urgency {
    /// `High` once stock is at or below half the reorder level
    pub fn for_stock(current_level: i64, reorder_level: i64) -> Self {
        if (current_level as f64) <= reorder_level as f64 * 0.5 {
            Urgency::High
        } else {
            Urgency::Medium
        }
    }
}

/// Result of probing the n8n instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum N8nHealth {
    Healthy,
    Unhealthy,
    Unreachable,
}

impl N8nHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            N8nHealth::Healthy => "healthy",
            N8nHealth::Unhealthy => "unhealthy",
            N8nHealth::Unreachable => "unreachable",
        }
    }
}

/// Minimal n8n API client
#[derive(Debug, Clone)]
pub struct N8nClient {
    client: Client,
    api_url: String,
}

impl N8nClient {
    /// Create a client for the n8n instance at `api_url`
    pub fn new(api_url: String) -> N8nResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Check `GET {api_url}/healthz`
    pub async fn health_check(&self) -> N8nHealth {
        let url = format!("{}/healthz", self.api_url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => N8nHealth::Healthy,
            Ok(response) => {
                warn!("n8n health check returned HTTP {}", response.status());
                N8nHealth::Unhealthy
            }
            Err(e) => {
                warn!("n8n health check failed: {}", e);
                N8nHealth::Unreachable
            }
        }
    }

    /// POST `data` to the workflow webhook at `{api_url}/webhook/{workflow_id}`
    ///
    /// Returns the JSON body n8n answers with. Any non-2xx status is an
    /// error.
    pub async fn trigger_webhook<T: Serialize + ?Sized>(
        &self,
        workflow_id: &str,
        data: &T,
    ) -> N8nResult<Value> {
        let url = format!("{}/webhook/{}", self.api_url, workflow_id);

        let response = self.client.post(&url).json(data).send().await.map_err(|e| {
            error!("Webhook trigger failed for {}: {}", workflow_id, e);
            N8nError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Webhook trigger for {} returned HTTP {}", workflow_id, status);
            return Err(N8nError::TriggerFailed {
                workflow_id: workflow_id.to_string(),
                status: status.as_u16(),
            });
        }

        info!("Triggered n8n workflow {}", workflow_id);
        Ok(response.json().await?)
    }

    pub async fn trigger_customer_update(&self, customer_id: &str, data: Value) -> N8nResult<Value> {
        self.trigger_webhook(
            CUSTOMER_UPDATE_WEBHOOK,
            &json!({
                "event": "customer.updated",
                "customerId": customer_id,
                "data": data,
                "timestamp": timestamp(),
            }),
        )
        .await
    }

    pub async fn trigger_job_scheduled(&self, job_id: &str, data: Value) -> N8nResult<Value> {
        self.trigger_webhook(
            JOB_SCHEDULED_WEBHOOK,
            &json!({
                "event": "job.scheduled",
                "jobId": job_id,
                "data": data,
                "timestamp": timestamp(),
            }),
        )
        .await
    }

    pub async fn trigger_lead_received(&self, lead_id: &str, data: Value) -> N8nResult<Value> {
        self.trigger_webhook(
            LEAD_RECEIVED_WEBHOOK,
            &json!({
                "event": "lead.received",
                "leadId": lead_id,
                "data": data,
                "timestamp": timestamp(),
            }),
        )
        .await
    }

    /// Notify n8n that an item dropped to its reorder level
    pub async fn trigger_inventory_alert(
        &self,
        item_id: &str,
        current_level: i64,
        reorder_level: i64,
    ) -> N8nResult<Value> {
        self.trigger_webhook(
            INVENTORY_ALERT_WEBHOOK,
            &json!({
                "event": "inventory.low",
                "itemId": item_id,
                "data": {
                    "currentLevel": current_level,
                    "reorderLevel": reorder_level,
                    "urgency": Urgency::for_stock(current_level, reorder_level),
                },
                "timestamp": timestamp(),
            }),
        )
        .await
    }

    pub async fn trigger_payment_received(&self, invoice_id: &str, data: Value) -> N8nResult<Value> {
        self.trigger_webhook(
            PAYMENT_RECEIVED_WEBHOOK,
            &json!({
                "event": "payment.received",
                "invoiceId": invoice_id,
                "data": data,
                "timestamp": timestamp(),
            }),
        )
        .await
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = N8nClient::new("http://n8n.local:5678/".to_string()).unwrap();
        assert_eq!(client.api_url(), "http://n8n.local:5678");
    }

    #[test]
    fn test_urgency_threshold() {
        assert_eq!(Urgency::for_stock(5, 10), Urgency::High);
        assert_eq!(Urgency::for_stock(0, 10), Urgency::High);
        assert_eq!(Urgency::for_stock(6, 10), Urgency::Medium);
        assert_eq!(Urgency::for_stock(2, 5), Urgency::High);
        assert_eq!(Urgency::for_stock(3, 5), Urgency::Medium);
        assert_eq!(serde_json::to_string(&Urgency::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_health_labels() {
        assert_eq!(N8nHealth::Healthy.as_str(), "healthy");
        assert_eq!(N8nHealth::Unreachable.as_str(), "unreachable");
        assert_eq!(
            serde_json::to_string(&N8nHealth::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }
}
