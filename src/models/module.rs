// src/models/module.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::{Entity, decode, timestamp, validate_not_blank};
use crate::{
    store::{Document, Fields, StoreError, collections, fields},
    utils::html::clean_html,
};

/// A learning module, stored in the 'modules' collection.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Rich-text lesson body (sanitized HTML).
    pub content: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct StoredModule {
    title: String,
    description: String,
    content: String,
}

impl Entity for Module {
    const COLLECTION: &'static str = collections::MODULES;

    fn from_document(doc: &Document, read_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let stored: StoredModule = decode(Self::COLLECTION, doc)?;
        Ok(Self {
            id: doc.id.clone(),
            title: stored.title,
            description: stored.description,
            content: stored.content,
            created_at: timestamp::read_or(&doc.data, "createdAt", None, read_at),
            updated_at: timestamp::read(&doc.data, "updatedAt", None),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Module identity shown above its exam report.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub id: String,
    pub title: String,
}

impl From<&Module> for ModuleSummary {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id.clone(),
            title: module.title.clone(),
        }
    }
}

/// DTO for creating a module.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_not_blank))]
    pub title: String,
    #[validate(length(min = 1, max = 2000), custom(function = validate_not_blank))]
    pub description: String,
    #[validate(length(min = 1, max = 100000), custom(function = validate_not_blank))]
    pub content: String,
}

impl CreateModuleRequest {
    pub fn into_fields(self, now: DateTime<Utc>) -> Fields {
        fields(json!({
            "title": self.title.trim(),
            "description": self.description.trim(),
            "content": clean_html(&self.content),
            "createdAt": timestamp::to_stored(now),
        }))
    }
}

/// DTO for updating a module. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_not_blank))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000), custom(function = validate_not_blank))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100000), custom(function = validate_not_blank))]
    pub content: Option<String>,
}

impl UpdateModuleRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.content.is_none()
    }

    pub fn into_fields(self, now: DateTime<Utc>) -> Fields {
        let mut partial = Fields::new();
        if let Some(title) = self.title {
            partial.insert("title".into(), json!(title.trim()));
        }
        if let Some(description) = self.description {
            partial.insert("description".into(), json!(description.trim()));
        }
        if let Some(content) = self.content {
            partial.insert("content".into(), json!(clean_html(&content)));
        }
        partial.insert("updatedAt".into(), timestamp::to_stored(now));
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_created_at_falls_back_to_read_time() {
        let doc = Document {
            id: "m1".into(),
            data: fields(json!({"title": "Budgeting", "description": "d", "content": "<p>c</p>"})),
        };
        let read_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let module = Module::from_document(&doc, read_at).unwrap();
        assert_eq!(module.created_at, read_at);
        assert!(module.updated_at.is_none());
    }

    #[test]
    fn create_sanitizes_content() {
        let req = CreateModuleRequest {
            title: "Saving".into(),
            description: "Why save".into(),
            content: "<p>ok</p><script>alert(1)</script>".into(),
        };
        let data = req.into_fields(Utc::now());
        assert_eq!(data["content"], "<p>ok</p>");
    }

    #[test]
    fn blank_title_is_rejected() {
        let req = CreateModuleRequest {
            title: "   ".into(),
            description: "d".into(),
            content: "c".into(),
        };
        assert!(req.validate().is_err());
    }
}
