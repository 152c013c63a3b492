//! Customer inquiry record and its CRM (Notion page) mapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::i18n::{self, Language};

/// Notion rejects rich-text segments longer than this.
const RICH_TEXT_LIMIT: usize = 2000;

/// Status given to every new CRM entry.
pub const NEW_INQUIRY_STATUS: &str = "New";

/// A contact-form submission. Fields are not validated beyond their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub nationality: String,
    pub service_interest: String,
    pub travel_date: String,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_contact")]
    pub preferred_contact: String,
    #[serde(default, deserialize_with = "i18n::deserialize_lenient")]
    pub language: Language,
}

fn default_contact() -> String {
    "email".to_string()
}

impl Inquiry {
    /// Travel date when it is a calendar date (`YYYY-MM-DD`).
    pub fn parsed_travel_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.travel_date.trim(), "%Y-%m-%d").ok()
    }

    /// Optional fields with blank values treated as absent.
    pub fn budget(&self) -> Option<&str> {
        non_blank(self.budget.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
    }

    /// Body for `POST /pages` creating this inquiry in `database_id`.
    pub fn to_crm_page(&self, database_id: &str) -> Value {
        let mut props = Map::new();
        props.insert("Name".into(), json!({"title": rich_text(&self.name)}));
        props.insert("Email".into(), json!({"email": self.email.trim()}));
        props.insert("Phone".into(), json!({"phone_number": self.phone.trim()}));
        props.insert("Nationality".into(), json!({"rich_text": rich_text(&self.nationality)}));
        props.insert(
            "Service Interest".into(),
            json!({"select": select(&self.service_interest)}),
        );
        props.insert(
            "Preferred Contact".into(),
            json!({"select": select(&self.preferred_contact)}),
        );
        props.insert("Language".into(), json!({"select": {"name": self.language.code()}}));
        props.insert("Status".into(), json!({"select": {"name": NEW_INQUIRY_STATUS}}));

        if let Some(budget) = self.budget() {
            props.insert("Budget".into(), json!({"rich_text": rich_text(budget)}));
        }

        // Free-form travel dates ("flexible", "spring") go into the message.
        let mut message = self.message().map(str::to_string);
        match self.parsed_travel_date() {
            Some(date) => {
                props.insert(
                    "Travel Date".into(),
                    json!({"date": {"start": date.format("%Y-%m-%d").to_string()}}),
                );
            }
            None if !self.travel_date.trim().is_empty() => {
                let note = format!("Travel date: {}", self.travel_date.trim());
                message = Some(match message {
                    Some(m) => format!("{note}\n\n{m}"),
                    None => note,
                });
            }
            None => {}
        }
        if let Some(message) = message {
            props.insert("Message".into(), json!({"rich_text": rich_text(&message)}));
        }

        json!({
            "parent": {"database_id": database_id},
            "properties": props,
        })
    }

    /// Localized acknowledgement returned to the submitter.
    pub fn acknowledgement(&self) -> &'static str {
        i18n::messages(self.language).inquiry_received
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn truncate(text: &str) -> String {
    text.chars().take(RICH_TEXT_LIMIT).collect()
}

fn rich_text(text: &str) -> Value {
    json!([{"type": "text", "text": {"content": truncate(text.trim())}}])
}

/// Select option; commas are not allowed in option names.
fn select(name: &str) -> Value {
    let name = name.trim().replace(',', " ");
    if name.is_empty() {
        Value::Null
    } else {
        json!({"name": truncate(&name)})
    }
}
