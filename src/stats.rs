// src/stats.rs

//! Exam results aggregation.
//!
//! Everything here is a pure function over results already loaded from the
//! store. Scores are produced by the external grader and are never
//! recomputed, only summarized and classified.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{exam_result::ExamResult, module::ModuleSummary},
    utils::avatar::avatar_url,
};

/// Tolerance when comparing a recorded total against the answers' sum.
const TOTAL_EPSILON: f64 = 1e-6;

/// Summary statistics over the total scores of one module's submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExamStatistics {
    /// Mean total score rounded to one decimal.
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub total_participants: usize,
}

/// Rounds half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes summary statistics. An empty slice yields all zeros.
/// The result does not depend on the order of `results`.
pub fn summarize(results: &[ExamResult]) -> ExamStatistics {
    if results.is_empty() {
        return ExamStatistics::default();
    }

    let (sum, highest, lowest) = results.iter().map(|r| r.total_score).fold(
        (0.0, f64::NEG_INFINITY, f64::INFINITY),
        |(sum, hi, lo), score| (sum + score, hi.max(score), lo.min(score)),
    );

    ExamStatistics {
        average: round_one_decimal(sum / results.len() as f64),
        highest,
        lowest,
        total_participants: results.len(),
    }
}

/// Qualitative tier of one answer's score, used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub const GOOD_THRESHOLD: f64 = 80.0;
    pub const FAIR_THRESHOLD: f64 = 60.0;

    /// Lower bounds are inclusive. A zero `max_score` classifies as `Poor`.
    pub fn classify(final_score: f64, max_score: f64) -> Self {
        match score_percentage(final_score, max_score) {
            Some(p) if p >= Self::GOOD_THRESHOLD => ScoreBand::Good,
            Some(p) if p >= Self::FAIR_THRESHOLD => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

/// `final / max * 100`, or `None` when that is not a finite number.
pub fn score_percentage(final_score: f64, max_score: f64) -> Option<f64> {
    if max_score == 0.0 {
        return None;
    }
    let percentage = final_score / max_score * 100.0;
    percentage.is_finite().then_some(percentage)
}

/// Orders results most recent first. The sort is stable, so submissions
/// with equal timestamps keep their relative order.
pub fn sort_by_submission_desc(results: &mut [ExamResult]) {
    results.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

/// One row of the module results table.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub id: String,
    pub user_display_name: String,
    pub user_email: String,
    pub avatar_url: String,
    pub submitted_at: DateTime<Utc>,
    pub total_score: f64,
}

impl From<&ExamResult> for ResultRow {
    fn from(result: &ExamResult) -> Self {
        Self {
            id: result.id.clone(),
            user_display_name: result.user_display_name.clone(),
            user_email: result.user_email.clone(),
            avatar_url: avatar_url(result.user_avatar.as_deref(), &result.user_display_name),
            submitted_at: result.submitted_at,
            total_score: result.total_score,
        }
    }
}

/// Statistics page for one module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    /// `None` when the module document no longer exists.
    pub module: Option<ModuleSummary>,
    pub statistics: ExamStatistics,
    pub results: Vec<ResultRow>,
}

impl ModuleReport {
    /// Sorts `results` and builds the report from them.
    pub fn build(module: Option<ModuleSummary>, mut results: Vec<ExamResult>) -> Self {
        sort_by_submission_desc(&mut results);
        Self {
            module,
            statistics: summarize(&results),
            results: results.iter().map(ResultRow::from).collect(),
        }
    }
}

/// One answer in the drill-down view.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerDetail {
    /// 1-based position within the submission.
    pub number: usize,
    pub question_id: String,
    pub question: String,
    pub user_answer: String,
    pub key_answer: String,
    pub final_score: f64,
    pub max_score: f64,
    pub similarity_percent: f64,
    pub score_percent: Option<f64>,
    pub band: ScoreBand,
}

/// Drill-down into a single submission.
#[derive(Debug, Clone, Serialize)]
pub struct ResultDetail {
    pub id: String,
    pub module_id: String,
    pub user_display_name: String,
    pub user_email: String,
    pub avatar_url: String,
    pub submitted_at: DateTime<Utc>,
    pub total_score: f64,

    /// Sum of the answers' final scores.
    pub answers_total: f64,

    /// False when `total_score` disagrees with `answers_total`.
    pub totals_consistent: bool,

    pub answers: Vec<AnswerDetail>,
}

impl ResultDetail {
    pub fn build(result: &ExamResult) -> Self {
        let answers: Vec<AnswerDetail> = result
            .answers
            .iter()
            .enumerate()
            .map(|(i, a)| AnswerDetail {
                number: i + 1,
                question_id: a.question_id.clone(),
                question: a.question.clone(),
                user_answer: a.user_answer.clone(),
                key_answer: a.key_answer.clone(),
                final_score: a.final_score,
                max_score: a.max_score,
                similarity_percent: round_one_decimal(a.similarity_score * 100.0),
                score_percent: score_percentage(a.final_score, a.max_score).map(round_one_decimal),
                band: ScoreBand::classify(a.final_score, a.max_score),
            })
            .collect();

        let answers_total: f64 = result.answers.iter().map(|a| a.final_score).sum();
        let totals_consistent = (answers_total - result.total_score).abs() <= TOTAL_EPSILON;
        if !totals_consistent {
            tracing::warn!(
                "Exam result {} records total {} but its answers sum to {}",
                result.id,
                result.total_score,
                answers_total
            );
        }

        Self {
            id: result.id.clone(),
            module_id: result.module_id.clone(),
            user_display_name: result.user_display_name.clone(),
            user_email: result.user_email.clone(),
            avatar_url: avatar_url(result.user_avatar.as_deref(), &result.user_display_name),
            submitted_at: result.submitted_at,
            total_score: result.total_score,
            answers_total,
            totals_consistent,
            answers,
        }
    }
}
