use crate::error::{CoreError, CoreResult};
use crate::validation::sanitize_string;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const LEAD_PROCESSED: &str = "lead.processed";
pub const JOB_COMPLETED: &str = "job.completed";
pub const CUSTOMER_FOLLOWUP: &str = "customer.followup";
pub const INVENTORY_REORDERED: &str = "inventory.reordered";

/// Raw webhook envelope as posted by n8n
///
/// `data` is left untyped until the event tag has been matched. Extra
/// envelope fields such as `timestamp` or `source` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl WebhookPayload {
    /// Parse a request body into the envelope
    pub fn from_slice(body: &[u8]) -> CoreResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| CoreError::InvalidPayload(format!("JSON parsing error: {}", e)))
    }
}

/// `lead.processed` data
///
/// Outer `None` means the key was absent and the column is left alone;
/// `Some(None)` means an explicit `null` that clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadProcessed {
    #[serde(deserialize_with = "record_id")]
    pub lead_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub next_action: Option<Option<String>>,
}

/// `job.completed` data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCompleted {
    #[serde(deserialize_with = "record_id")]
    pub job_id: String,
    pub completion_data: CompletionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionData {
    #[serde(default, deserialize_with = "nullable")]
    pub actual_cost: Option<Option<f64>>,
}

/// `customer.followup` data
///
/// Every field is only logged, so any JSON type is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFollowup {
    #[serde(default)]
    pub customer_id: Option<Value>,
    #[serde(default)]
    pub followup_type: Option<Value>,
    #[serde(default)]
    pub scheduled_date: Option<Value>,
}

/// `inventory.reordered` data
///
/// Only `itemId` is written; quantity and supplier are logged as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReordered {
    #[serde(deserialize_with = "record_id")]
    pub item_id: String,
    #[serde(default)]
    pub quantity_ordered: Option<Value>,
    #[serde(default)]
    pub supplier: Option<Value>,
}

/// Render a loosely typed field for a log line
///
/// Strings are sanitized and printed bare, other values as compact JSON,
/// and missing or `null` values as `fallback`.
pub fn display_field(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(text)) => sanitize_string(text),
        Some(other) => sanitize_string(&other.to_string()),
    }
}

/// A webhook event resolved against the closed set of known tags
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    LeadProcessed(LeadProcessed),
    JobCompleted(JobCompleted),
    CustomerFollowup(CustomerFollowup),
    InventoryReordered(InventoryReordered),
    /// Tag outside the known set; acknowledged without side effects
    Unknown(String),
}

impl WebhookEvent {
    /// Match the envelope's tag and decode its data
    pub fn from_payload(payload: WebhookPayload) -> CoreResult<Self> {
        let WebhookPayload { event, data } = payload;

        match event.as_str() {
            LEAD_PROCESSED => decode(&event, data).map(WebhookEvent::LeadProcessed),
            JOB_COMPLETED => decode(&event, data).map(WebhookEvent::JobCompleted),
            CUSTOMER_FOLLOWUP => decode(&event, data).map(WebhookEvent::CustomerFollowup),
            INVENTORY_REORDERED => decode(&event, data).map(WebhookEvent::InventoryReordered),
            _ => Ok(WebhookEvent::Unknown(event)),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            WebhookEvent::LeadProcessed(_) => LEAD_PROCESSED,
            WebhookEvent::JobCompleted(_) => JOB_COMPLETED,
            WebhookEvent::CustomerFollowup(_) => CUSTOMER_FOLLOWUP,
            WebhookEvent::InventoryReordered(_) => INVENTORY_REORDERED,
            WebhookEvent::Unknown(tag) => tag,
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(event: &str, data: Value) -> CoreResult<T> {
    serde_json::from_value(data).map_err(|e| CoreError::InvalidEventData {
        event: event.to_string(),
        reason: e.to_string(),
    })
}

/// Record ids arrive as strings, but numeric ids are accepted too
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lead_processed() {
        let event = WebhookEvent::from_payload(payload(json!({
            "event": "lead.processed",
            "data": {"leadId": "L1", "status": "won", "nextAction": "schedule"}
        })))
        .unwrap();

        assert_eq!(
            event,
            WebhookEvent::LeadProcessed(LeadProcessed {
                lead_id: "L1".to_string(),
                status: Some(Some("won".to_string())),
                next_action: Some(Some("schedule".to_string())),
            })
        );
        assert_eq!(event.tag(), "lead.processed");
    }

    #[test]
    fn test_job_completed_requires_completion_data() {
        let ok = WebhookEvent::from_payload(payload(json!({
            "event": "job.completed",
            "data": {"jobId": "J9", "completionData": {"actualCost": 18250.5}}
        })))
        .unwrap();
        match ok {
            WebhookEvent::JobCompleted(job) => {
                assert_eq!(job.job_id, "J9");
                assert_eq!(job.completion_data.actual_cost, Some(Some(18250.5)));
            }
            other => panic!("Expected JobCompleted, got {:?}", other),
        }

        let missing = WebhookEvent::from_payload(payload(json!({
            "event": "job.completed",
            "data": {"jobId": "J9"}
        })));
        assert!(matches!(
            missing,
            Err(CoreError::InvalidEventData { ref event, .. }) if event == "job.completed"
        ));
    }

    #[test]
    fn test_absent_and_null_fields_differ() {
        let event = WebhookEvent::from_payload(payload(json!({
            "event": "lead.processed",
            "data": {"leadId": "L2", "nextAction": null}
        })))
        .unwrap();

        match event {
            WebhookEvent::LeadProcessed(lead) => {
                assert_eq!(lead.status, None);
                assert_eq!(lead.next_action, Some(None));
            }
            other => panic!("Expected LeadProcessed, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let event = WebhookEvent::from_payload(payload(json!({
            "event": "inventory.reordered",
            "data": {"itemId": 42, "quantityOrdered": 12, "supplier": "SunParts"}
        })))
        .unwrap();

        match event {
            WebhookEvent::InventoryReordered(item) => {
                assert_eq!(item.item_id, "42");
                assert_eq!(item.quantity_ordered, Some(json!(12)));
                assert_eq!(item.supplier, Some(json!("SunParts")));
            }
            other => panic!("Expected InventoryReordered, got {:?}", other),
        }
    }

    #[test]
    fn test_customer_followup_fields_are_optional() {
        let event = WebhookEvent::from_payload(payload(json!({
            "event": "customer.followup",
            "data": {}
        })))
        .unwrap();
        assert!(matches!(event, WebhookEvent::CustomerFollowup(_)));
    }

    #[test]
    fn test_logged_fields_accept_any_json_type() {
        let followup = WebhookEvent::from_payload(payload(json!({
            "event": "customer.followup",
            "data": {"customerId": 7, "followupType": ["call"], "scheduledDate": 1735689600000u64}
        })))
        .unwrap();
        match followup {
            WebhookEvent::CustomerFollowup(f) => {
                assert_eq!(f.scheduled_date, Some(json!(1735689600000u64)));
                assert_eq!(display_field(f.customer_id.as_ref(), "unknown"), "7");
            }
            other => panic!("Expected CustomerFollowup, got {:?}", other),
        }

        let reorder = WebhookEvent::from_payload(payload(json!({
            "event": "inventory.reordered",
            "data": {"itemId": "INV-1", "quantityOrdered": "12", "supplier": {"name": "SunParts"}}
        })))
        .unwrap();
        match reorder {
            WebhookEvent::InventoryReordered(item) => {
                assert_eq!(display_field(item.quantity_ordered.as_ref(), "unknown"), "12");
                assert_eq!(
                    display_field(item.supplier.as_ref(), "unknown supplier"),
                    r#"{"name":"SunParts"}"#
                );
            }
            other => panic!("Expected InventoryReordered, got {:?}", other),
        }
    }

    #[test]
    fn test_display_field() {
        assert_eq!(display_field(None, "n/a"), "n/a");
        assert_eq!(display_field(Some(&Value::Null), "n/a"), "n/a");
        assert_eq!(display_field(Some(&json!("  <b>call</b> ")), "n/a"), "bcall/b");
        assert_eq!(display_field(Some(&json!(40.5)), "n/a"), "40.5");
    }

    #[test]
    fn test_unknown_tag_is_not_an_error() {
        let event = WebhookEvent::from_payload(payload(json!({
            "event": "unknown.tag",
            "data": {"anything": true}
        })))
        .unwrap();

        assert_eq!(event, WebhookEvent::Unknown("unknown.tag".to_string()));
        assert_eq!(event.tag(), "unknown.tag");
    }

    #[test]
    fn test_known_tag_without_data_is_rejected() {
        let result = WebhookEvent::from_payload(payload(json!({"event": "lead.processed"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_parsing() {
        let parsed = WebhookPayload::from_slice(
            br#"{"event":"job.completed","data":{},"timestamp":"2025-01-01T00:00:00Z","source":"n8n"}"#,
        )
        .unwrap();
        assert_eq!(parsed.event, "job.completed");

        assert!(matches!(
            WebhookPayload::from_slice(b"{invalid json}"),
            Err(CoreError::InvalidPayload(_))
        ));
        assert!(WebhookPayload::from_slice(br#"{"data":{}}"#).is_err());
    }
}
