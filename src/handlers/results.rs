// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        Entity, load_all, load_one,
        exam_result::ExamResult,
        module::{Module, ModuleSummary},
    },
    state::SharedStore,
    stats::{ModuleReport, ResultDetail, ResultRow, sort_by_submission_desc},
    store::{DocumentStore, Filter},
};

async fn results_of_module(
    store: &dyn DocumentStore,
    module_id: &str,
) -> Result<Vec<ExamResult>, AppError> {
    load_all::<ExamResult>(store, Some(&Filter::eq("moduleId", module_id)))
        .await
        .map_err(|e| {
            tracing::error!("Error fetching results of module {}: {:?}", module_id, e);
            AppError::from(e)
        })
}

/// Lists the submissions of one module, most recent first.
pub async fn list_module_results(
    State(store): State<SharedStore>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut results = results_of_module(store.as_ref(), &module_id).await?;
    sort_by_submission_desc(&mut results);

    let rows: Vec<ResultRow> = results.iter().map(ResultRow::from).collect();
    Ok(Json(rows))
}

/// Exam statistics page of one module.
///
/// The report is still produced when the module document is gone, since
/// deleting a module leaves its results behind.
pub async fn module_stats(
    State(store): State<SharedStore>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let module = load_one::<Module>(store.as_ref(), &module_id).await?;
    let results = results_of_module(store.as_ref(), &module_id).await?;

    let report = ModuleReport::build(module.as_ref().map(ModuleSummary::from), results);
    Ok(Json(report))
}

/// Drill-down into one submission.
pub async fn get_result(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = load_one::<ExamResult>(store.as_ref(), &id)
        .await?
        .ok_or(AppError::NotFound("Exam result not found".to_string()))?;

    Ok(Json(ResultDetail::build(&result)))
}

/// Permanently deletes a submission.
pub async fn delete_result(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existed = store.delete(ExamResult::COLLECTION, &id).await.map_err(|e| {
        tracing::error!("Failed to delete exam result {}: {:?}", id, e);
        AppError::from(e)
    })?;

    if !existed {
        return Err(AppError::NotFound("Exam result not found".to_string()));
    }

    tracing::info!("Exam result {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
