// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use validator::{Validate, ValidationError};

use super::{Entity, decode, timestamp, validate_not_blank};
use crate::store::{Document, Fields, StoreError, collections, fields};

/// A public event ('events' collection).
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_link: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    title: String,
    description: String,
    category_id: String,
    registration_link: String,
}

impl Entity for Event {
    const COLLECTION: &'static str = collections::EVENTS;

    /// Older documents carry `showAt`/`hideAt` instead of `startDate`/`endDate`.
    fn from_document(doc: &Document, read_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let stored: StoredEvent = decode(Self::COLLECTION, doc)?;
        Ok(Self {
            id: doc.id.clone(),
            title: stored.title,
            description: stored.description,
            category_id: stored.category_id,
            start_date: timestamp::read_or(&doc.data, "startDate", Some("showAt"), read_at),
            end_date: timestamp::read_or(&doc.data, "endDate", Some("hideAt"), read_at),
            registration_link: stored.registration_link,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), ValidationError> {
    if Url::parse(url).is_err() {
        return Err(ValidationError::new("invalid_url").with_message("Invalid URL".into()));
    }
    Ok(())
}

/// An event may not end before it starts. Equal dates are allowed.
pub fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::new("end_before_start")
            .with_message("End date must be after or equal to start date".into()));
    }
    Ok(())
}

/// DTO for creating an event.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_not_blank))]
    pub title: String,
    #[validate(length(min = 1, max = 5000), custom(function = validate_not_blank))]
    pub description: String,
    #[validate(length(min = 1, message = "Category must be selected"))]
    pub category_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 500), custom(function = validate_url_string))]
    pub registration_link: String,
}

impl CreateEventRequest {
    pub fn check_window(&self) -> Result<(), ValidationError> {
        validate_window(self.start_date, self.end_date)
    }

    pub fn into_fields(self) -> Fields {
        fields(json!({
            "title": self.title.trim(),
            "description": self.description.trim(),
            "categoryId": self.category_id,
            "startDate": timestamp::to_stored(self.start_date),
            "endDate": timestamp::to_stored(self.end_date),
            "registrationLink": self.registration_link,
        }))
    }
}

/// DTO for updating an event. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_not_blank))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000), custom(function = validate_not_blank))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category must be selected"))]
    pub category_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 500), custom(function = validate_url_string))]
    pub registration_link: Option<String>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.registration_link.is_none()
    }

    /// Checks the date window the event would have after this update.
    pub fn check_window(&self, current: &Event) -> Result<(), ValidationError> {
        validate_window(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }

    pub fn into_fields(self) -> Fields {
        let mut partial = Fields::new();
        if let Some(title) = self.title {
            partial.insert("title".into(), json!(title.trim()));
        }
        if let Some(description) = self.description {
            partial.insert("description".into(), json!(description.trim()));
        }
        if let Some(category_id) = self.category_id {
            partial.insert("categoryId".into(), json!(category_id));
        }
        if let Some(start) = self.start_date {
            partial.insert("startDate".into(), timestamp::to_stored(start));
        }
        if let Some(end) = self.end_date {
            partial.insert("endDate".into(), timestamp::to_stored(end));
        }
        if let Some(link) = self.registration_link {
            partial.insert("registrationLink".into(), json!(link));
        }
        partial
    }
}
