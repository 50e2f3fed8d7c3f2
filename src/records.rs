//! Clinic records offered by the pickers
//!
//! Each record type knows how to present itself as an option and which of
//! its fields take part in client-side matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as sent by the collaborator: numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Number(i64::from(value))
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// A record that can back a searchable select
pub trait PickRecord: Clone + Send + Sync + 'static {
    /// Human name of the record kind, used in prompts and logs
    const KIND: &'static str;

    fn id(&self) -> RecordId;

    /// Primary display text
    fn label(&self) -> String;

    /// Secondary display text, empty when there is nothing to show
    fn subtitle(&self) -> String;

    /// Fields matched by the client-side filter
    fn search_fields(&self) -> Vec<&str>;
}

fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" \u{00B7} ")
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Single-field name used by older records instead of first/last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Client {
    pub fn new(id: impl Into<RecordId>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            name: None,
            email: None,
            phone: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    pub fn full_name(&self) -> String {
        let composed = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let composed = composed.trim();
        if !composed.is_empty() {
            return composed.to_string();
        }
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Client {}", self.id),
        }
    }
}

impl PickRecord for Client {
    const KIND: &'static str = "client";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn label(&self) -> String {
        self.full_name()
    }

    fn subtitle(&self) -> String {
        join_present([self.email.as_deref(), self.phone.as_deref()])
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.first_name.as_str(), self.last_name.as_str()];
        fields.extend(self.name.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.phone.as_deref());
        fields
    }
}

// ============================================================================
// Order
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: RecordId,
    pub order_number: String,
    pub client_name: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Format an amount in cents as `12.34`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

impl PickRecord for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn label(&self) -> String {
        format!("{} ({})", self.order_number, format_cents(self.total_cents))
    }

    fn subtitle(&self) -> String {
        let date = self.created_at.format("%Y-%m-%d").to_string();
        join_present([
            Some(self.client_name.as_str()),
            Some(self.status.as_str()),
            Some(date.as_str()),
        ])
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.order_number.as_str(), self.client_name.as_str()]
    }
}

// ============================================================================
// Resource
// ============================================================================

/// A bookable clinic resource: a room, a device, a practitioner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: RecordId,
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl PickRecord for Resource {
    const KIND: &'static str = "resource";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn subtitle(&self) -> String {
        join_present([Some(self.kind.as_str()), self.location.as_deref()])
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.kind.as_str()];
        fields.extend(self.location.as_deref());
        fields
    }
}
