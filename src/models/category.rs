// src/models/category.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::{Entity, decode, validate_not_blank};
use crate::store::{Document, Fields, StoreError, collections, fields};

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());
static NON_SLUG_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Event category ('eventCategories' collection).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Deserialize)]
struct StoredCategory {
    name: String,
    slug: String,
}

impl Entity for EventCategory {
    const COLLECTION: &'static str = collections::EVENT_CATEGORIES;

    fn from_document(doc: &Document, _read_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let stored: StoredCategory = decode(Self::COLLECTION, doc)?;
        Ok(Self {
            id: doc.id.clone(),
            name: stored.name,
            slug: stored.slug,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Derives a URL slug from a display name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen and trims hyphens at both ends.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_SLUG_RUN
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(validator::ValidationError::new("invalid_slug").with_message(
            "Slug can only contain lowercase letters, numbers, and hyphens".into(),
        ));
    }
    Ok(())
}

/// DTO for creating a category. A missing or blank slug is derived from the name.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100), custom(function = validate_not_blank))]
    pub name: String,
    #[validate(length(max = 100))]
    pub slug: Option<String>,
}

impl CreateCategoryRequest {
    /// Validates the request and resolves the final slug.
    pub fn resolve(self) -> Result<NewCategory, validator::ValidationErrors> {
        self.validate()?;

        let slug = match self.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slugify(&self.name),
        };

        let category = NewCategory {
            name: self.name.trim().to_string(),
            slug,
        };
        category.validate()?;
        Ok(category)
    }
}

/// A category ready to be written.
#[derive(Debug, Validate)]
pub struct NewCategory {
    pub name: String,
    #[validate(length(min = 1), custom(function = validate_slug))]
    pub slug: String,
}

impl NewCategory {
    pub fn into_fields(self) -> Fields {
        fields(json!({
            "name": self.name,
            "slug": self.slug,
        }))
    }
}

/// DTO for updating a category. Fields are optional; the slug is never re-derived.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100), custom(function = validate_not_blank))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = validate_slug))]
    pub slug: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }

    pub fn into_fields(self) -> Fields {
        let mut partial = Fields::new();
        if let Some(name) = self.name {
            partial.insert("name".into(), json!(name.trim()));
        }
        if let Some(slug) = self.slug {
            partial.insert("slug".into(), json!(slug));
        }
        partial
    }
}
