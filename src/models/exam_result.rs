// src/models/exam_result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, decode, timestamp};
use crate::store::{Document, StoreError, collections};

/// One user's graded submission for one module ('exam_results' collection).
///
/// Created by the external submission and grading process. Read-only here
/// apart from deletion.
#[derive(Debug, Clone, Serialize)]
pub struct ExamResult {
    pub id: String,
    pub user_id: Option<String>,
    pub user_display_name: String,
    pub user_email: String,
    pub user_avatar: Option<String>,
    pub module_id: String,
    pub submitted_at: DateTime<Utc>,

    /// Sum of the answers' final scores, as recorded by the grader.
    pub total_score: f64,

    pub answers: Vec<ExamResultAnswer>,
}

/// The graded answer to one question within a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ExamResultAnswer {
    pub question_id: String,
    pub question: String,
    pub user_answer: String,
    pub key_answer: String,
    pub max_score: f64,

    /// Grader similarity between the user's answer and the key, in [0, 1].
    pub similarity_score: f64,

    pub final_score: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExamResult {
    user_id: Option<String>,
    user_display_name: String,
    user_email: String,
    user_avatar: Option<String>,
    module_id: String,
    total_score: f64,
    #[serde(default)]
    answers: Vec<ExamResultAnswer>,
}

impl Entity for ExamResult {
    const COLLECTION: &'static str = collections::EXAM_RESULTS;

    fn from_document(doc: &Document, read_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let stored: StoredExamResult = decode(Self::COLLECTION, doc)?;
        Ok(Self {
            id: doc.id.clone(),
            user_id: stored.user_id,
            user_display_name: stored.user_display_name,
            user_email: stored.user_email,
            user_avatar: stored.user_avatar.filter(|a| !a.is_empty()),
            module_id: stored.module_id,
            submitted_at: timestamp::read_or(&doc.data, "submittedAt", None, read_at),
            total_score: stored.total_score,
            answers: stored.answers,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fields;
    use serde_json::json;

    #[test]
    fn decodes_graded_submission() {
        let doc = Document {
            id: "r1".into(),
            data: fields(json!({
                "userId": "u1",
                "userDisplayName": "Sari",
                "userEmail": "sari@example.org",
                "moduleId": "m1",
                "submittedAt": {"_seconds": 1_700_000_000, "_nanoseconds": 0},
                "totalScore": 17.5,
                "answers": [{
                    "questionId": "q1",
                    "question": "Define inflation",
                    "userAnswer": "Prices go up",
                    "keyAnswer": "General rise in price level",
                    "maxScore": 10,
                    "similarityScore": 0.75,
                    "finalScore": 7.5,
                }],
            })),
        };

        let result = ExamResult::from_document(&doc, Utc::now()).unwrap();
        assert_eq!(result.total_score, 17.5);
        assert_eq!(result.submitted_at.timestamp(), 1_700_000_000);
        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.answers[0].final_score, 7.5);
    }

    #[test]
    fn missing_answers_read_as_empty() {
        let doc = Document {
            id: "r2".into(),
            data: fields(json!({
                "userDisplayName": "Budi",
                "userEmail": "budi@example.org",
                "moduleId": "m1",
                "totalScore": 0,
            })),
        };
        let result = ExamResult::from_document(&doc, Utc::now()).unwrap();
        assert!(result.answers.is_empty());
    }

    #[test]
    fn missing_total_score_is_a_decode_error() {
        let doc = Document {
            id: "r3".into(),
            data: fields(json!({
                "userDisplayName": "Budi",
                "userEmail": "budi@example.org",
                "moduleId": "m1",
            })),
        };
        let err = ExamResult::from_document(&doc, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }
}
