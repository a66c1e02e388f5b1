use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Tables the webhook handlers are allowed to mutate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Leads,
    Jobs,
    Inventory,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Leads => "leads",
            Table::Jobs => "jobs",
            Table::Inventory => "inventory",
        }
    }

    /// PostgreSQL type of the primary key
    pub fn key_type(&self) -> &'static str {
        "uuid"
    }

    /// PostgreSQL type of a column the handlers write, when a bound text or
    /// null parameter would not be assigned to it implicitly
    pub fn column_type(&self, column: &str) -> Option<&'static str> {
        match (self, column) {
            (Table::Leads, "status") => Some("lead_status"),
            (Table::Jobs, "status") => Some("job_status"),
            (Table::Jobs, "actual_cost") => Some("numeric"),
            (_, "created_at" | "updated_at") => Some("timestamptz"),
            _ => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter selecting the rows to update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFilter {
    pub column: &'static str,
    pub value: String,
}

impl RecordFilter {
    /// Match on the primary key
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            column: "id",
            value: value.into(),
        }
    }
}

/// Value written to a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Null,
}

/// One `column = value` assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldUpdate {
    pub column: &'static str,
    pub value: FieldValue,
}

impl FieldUpdate {
    pub fn text(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn number(column: &'static str, value: f64) -> Self {
        Self {
            column,
            value: FieldValue::Number(value),
        }
    }

    pub fn timestamp(column: &'static str, value: DateTime<Utc>) -> Self {
        Self {
            column,
            value: FieldValue::Timestamp(value),
        }
    }

    pub fn null(column: &'static str) -> Self {
        Self {
            column,
            value: FieldValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Leads.as_str(), "leads");
        assert_eq!(Table::Jobs.to_string(), "jobs");
        assert_eq!(Table::Inventory.as_str(), "inventory");
    }

    #[test]
    fn test_column_types() {
        assert_eq!(Table::Leads.column_type("status"), Some("lead_status"));
        assert_eq!(Table::Jobs.column_type("status"), Some("job_status"));
        assert_eq!(Table::Jobs.column_type("actual_cost"), Some("numeric"));
        assert_eq!(Table::Inventory.column_type("updated_at"), Some("timestamptz"));
        assert_eq!(Table::Leads.column_type("next_action"), None);
        assert_eq!(Table::Jobs.key_type(), "uuid");
    }

    #[test]
    fn test_field_update_constructors() {
        assert_eq!(
            FieldUpdate::text("status", "won").value,
            FieldValue::Text("won".to_string())
        );
        assert_eq!(FieldUpdate::number("actual_cost", 10.5).value, FieldValue::Number(10.5));
        assert_eq!(FieldUpdate::null("next_action").value, FieldValue::Null);
        assert_eq!(RecordFilter::id("L1").column, "id");
    }
}
