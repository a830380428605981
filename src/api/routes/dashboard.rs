//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Render the full view for a selection
//! - GET /api/v1/options - Option sets for the choosers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DashboardParams, OptionsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::selection::{Selection, SelectionOptions};
use crate::session::DashboardView;

/// GET /api/v1/dashboard?state=&age_group=&elective=
///
/// Re-runs the whole render for the given triple. A missing or malformed
/// dataset is an error response; a pair plot that cannot be drawn is
/// reported inside the view.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardView>> {
    let selection = params.into_selection();

    if !selection.is_offered() {
        tracing::debug!(?selection, "Selection outside the offered option sets");
    }

    let view = state.session.render(&selection).await?;

    tracing::info!(
        state = %selection.state,
        age_group = %selection.age_group,
        elective = %selection.elective,
        elective_rows = view.elective_rows,
        comparative_rows = view.comparative_rows,
        plot_error = view.correlation.is_error(),
        "Rendered dashboard"
    );

    Ok(Json(view))
}

/// GET /api/v1/options
pub async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        options: SelectionOptions::standard(),
        default: Selection::default(),
    })
}
