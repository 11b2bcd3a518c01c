// src/models/exam.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::{Entity, decode, validate_not_blank};
use crate::store::{Document, Fields, StoreError, collections, fields};

/// An essay-style exam question attached to a module ('exams' collection).
#[derive(Debug, Clone, Serialize)]
pub struct Exam {
    pub id: String,
    pub module_id: String,
    pub question: String,

    /// Reference answer the grader compares submissions against.
    pub key_answer: String,

    pub max_score: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExam {
    module_id: String,
    question: String,
    key_answer: String,
    max_score: f64,
}

impl Entity for Exam {
    const COLLECTION: &'static str = collections::EXAMS;

    fn from_document(doc: &Document, _read_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let stored: StoredExam = decode(Self::COLLECTION, doc)?;
        Ok(Self {
            id: doc.id.clone(),
            module_id: stored.module_id,
            question: stored.question,
            key_answer: stored.key_answer,
            max_score: stored.max_score,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for creating an exam question. The module comes from the path.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 2000), custom(function = validate_not_blank))]
    pub question: String,
    #[validate(length(min = 1, max = 5000), custom(function = validate_not_blank))]
    pub key_answer: String,
    #[validate(range(min = 1.0, message = "Maximum score must be greater than 0"))]
    pub max_score: f64,
}

impl CreateExamRequest {
    pub fn into_fields(self, module_id: &str) -> Fields {
        fields(json!({
            "moduleId": module_id,
            "question": self.question.trim(),
            "keyAnswer": self.key_answer.trim(),
            "maxScore": self.max_score,
        }))
    }
}

/// DTO for updating an exam question. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateExamRequest {
    #[validate(length(min = 1, max = 2000), custom(function = validate_not_blank))]
    pub question: Option<String>,
    #[validate(length(min = 1, max = 5000), custom(function = validate_not_blank))]
    pub key_answer: Option<String>,
    #[validate(range(min = 1.0, message = "Maximum score must be greater than 0"))]
    pub max_score: Option<f64>,
}

impl UpdateExamRequest {
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.key_answer.is_none() && self.max_score.is_none()
    }

    pub fn into_fields(self) -> Fields {
        let mut partial = Fields::new();
        if let Some(question) = self.question {
            partial.insert("question".into(), json!(question.trim()));
        }
        if let Some(key_answer) = self.key_answer {
            partial.insert("keyAnswer".into(), json!(key_answer.trim()));
        }
        if let Some(max_score) = self.max_score {
            partial.insert("maxScore".into(), json!(max_score));
        }
        partial
    }
}
