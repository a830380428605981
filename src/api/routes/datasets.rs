//! Dataset Routes
//!
//! - GET /api/v1/datasets/:state - Shape, columns and leading rows of a state's dataset

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DatasetParams, DatasetPreviewResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 1000;

/// GET /api/v1/datasets/:state?limit=
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(params): Query<DatasetParams>,
) -> ApiResult<Json<DatasetPreviewResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let dataset = state.loader().load(&code).await?;

    Ok(Json(DatasetPreviewResponse {
        state: dataset.state.clone(),
        shape: dataset.shape(),
        columns: dataset.columns().iter().map(|c| c.to_string()).collect(),
        rows: dataset.head(limit).to_vec(),
    }))
}
