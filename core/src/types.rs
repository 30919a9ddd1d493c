//! Request payloads and response envelopes of the Aircall API.
//!
//! # Design
//! These mirror the JSON shapes Aircall documents. Fields the API may omit or
//! send as `null` are `Option` or `#[serde(default)]`; optional request fields
//! are skipped when unset so the API applies its own defaults.

use serde::{Deserialize, Serialize};

use crate::client::Params;

/// Pagination block attached to every list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub count: u64,
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    #[serde(default)]
    pub next_page_link: Option<String>,
    #[serde(default)]
    pub previous_page_link: Option<String>,
}

/// Sort order for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Paging and time-window filters for list endpoints. Unset fields are not
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paginate {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub order: Option<Order>,
    /// Unix timestamp, inclusive lower bound on creation time.
    pub from: Option<i64>,
    /// Unix timestamp, inclusive upper bound on creation time.
    pub to: Option<i64>,
}

impl Paginate {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(page) = self.page {
            params.insert("page".to_string(), page.to_string());
        }
        if let Some(per_page) = self.per_page {
            params.insert("per_page".to_string(), per_page.to_string());
        }
        if let Some(order) = self.order {
            params.insert("order".to_string(), order.as_str().to_string());
        }
        if let Some(from) = self.from {
            params.insert("from".to_string(), from.to_string());
        }
        if let Some(to) = self.to {
            params.insert("to".to_string(), to.to_string());
        }
        params
    }
}

/// Contact search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl Search {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(phone_number) = &self.phone_number {
            params.insert("phone_number".to_string(), phone_number.clone());
        }
        if let Some(email) = &self.email {
            params.insert("email".to_string(), email.clone());
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub users_count: u64,
    #[serde(default)]
    pub numbers_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub direct_link: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Only populated when fetching a single user.
    #[serde(default)]
    pub numbers: Vec<Number>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Number {
    pub id: u64,
    #[serde(default)]
    pub direct_link: Option<String>,
    pub name: String,
    pub digits: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub is_ivr: bool,
    #[serde(default)]
    pub live_recording_activated: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Only populated when fetching a single number.
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Call {
    pub id: u64,
    #[serde(default)]
    pub direct_link: Option<String>,
    /// `inbound` or `outbound`.
    pub direction: String,
    /// `initial`, `answered` or `done`.
    pub status: String,
    #[serde(default)]
    pub missed_call_reason: Option<String>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub answered_at: Option<i64>,
    #[serde(default)]
    pub ended_at: Option<i64>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub voicemail: Option<String>,
    #[serde(default)]
    pub recording: Option<String>,
    #[serde(default)]
    pub raw_digits: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub assigned_to: Option<User>,
    #[serde(default)]
    pub number: Option<Number>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub posted_at: Option<i64>,
    #[serde(default)]
    pub posted_by: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: u64,
    #[serde(default)]
    pub direct_link: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub information: Option<String>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub emails: Vec<ContactInfo>,
    #[serde(default)]
    pub phone_numbers: Vec<ContactInfo>,
}

/// A labelled email address or phone number of a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Webhook {
    pub webhook_id: String,
    #[serde(default)]
    pub direct_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub active: bool,
    /// Shared secret Aircall sends with each event.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferCallRequest {
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkCallRequest {
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallInsightCardContent {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallInsightCardRequest {
    pub contents: Vec<CallInsightCardContent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<ContactInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<ContactInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingResponse {
    pub ping: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyResponse {
    pub company: Company,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsersResponse {
    pub meta: Meta,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumbersResponse {
    pub meta: Meta,
    pub numbers: Vec<Number>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumberResponse {
    pub number: Number,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallsResponse {
    pub meta: Meta,
    pub calls: Vec<Call>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallResponse {
    pub call: Call,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactsResponse {
    pub meta: Meta,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub contact: Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhooksResponse {
    pub meta: Meta,
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookResponse {
    pub webhook: Webhook,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paginate_sends_no_params() {
        assert!(Paginate::default().to_params().is_empty());
    }

    #[test]
    fn paginate_sends_only_set_fields() {
        let params = Paginate {
            page: Some(2),
            per_page: Some(10),
            order: Some(Order::Desc),
            from: None,
            to: Some(1_700_000_000),
        }
        .to_params();
        assert_eq!(params.len(), 4);
        assert_eq!(params["page"], "2");
        assert_eq!(params["per_page"], "10");
        assert_eq!(params["order"], "desc");
        assert_eq!(params["to"], "1700000000");
        assert!(!params.contains_key("from"));
    }

    #[test]
    fn search_sends_only_set_fields() {
        let params = Search {
            phone_number: None,
            email: Some("ada@example.com".to_string()),
        }
        .to_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["email"], "ada@example.com");
    }

    #[test]
    fn meta_tolerates_null_links() {
        let meta: Meta = serde_json::from_str(
            r#"{"count":1,"total":1,"current_page":1,"per_page":20,"next_page_link":null,"previous_page_link":null}"#,
        )
        .unwrap();
        assert_eq!(meta.next_page_link, None);
        assert_eq!(meta.per_page, 20);
    }

    #[test]
    fn call_decodes_with_nested_records() {
        let call: Call = serde_json::from_str(
            r#"{
                "id": 812,
                "direction": "inbound",
                "status": "done",
                "started_at": 1700000000,
                "duration": 42,
                "archived": false,
                "user": {"id": 1, "name": "Ada"},
                "number": {"id": 5, "name": "Support", "digits": "+33 1 00 00 00 00"},
                "contact": null,
                "tags": [{"id": 3, "name": "vip"}]
            }"#,
        )
        .unwrap();
        assert_eq!(call.id, 812);
        assert_eq!(call.user.as_ref().map(|u| u.name.as_str()), Some("Ada"));
        assert_eq!(call.number.as_ref().map(|n| n.id), Some(5));
        assert!(call.contact.is_none());
        assert!(call.comments.is_empty());
        assert_eq!(call.tags[0].name, "vip");
    }

    #[test]
    fn empty_contact_request_serializes_to_empty_object() {
        let json = serde_json::to_value(ContactRequest::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn contact_request_omits_unset_fields() {
        let request = ContactRequest {
            first_name: Some("Grace".to_string()),
            phone_numbers: vec![ContactInfo {
                id: None,
                label: "Work".to_string(),
                value: "+15550100".to_string(),
            }],
            ..ContactRequest::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "first_name": "Grace",
                "phone_numbers": [{"label": "Work", "value": "+15550100"}]
            })
        );
    }

    #[test]
    fn insight_card_content_uses_type_key() {
        let content = CallInsightCardContent {
            kind: Some("title".to_string()),
            text: Some("VIP customer".to_string()),
            ..CallInsightCardContent::default()
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json, serde_json::json!({"type": "title", "text": "VIP customer"}));
    }
}
