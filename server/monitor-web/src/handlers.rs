//! HTTP handlers for the monitor web UI.

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use funnel_engine::stats::{AggregatorStatistic, AttritionReport, PipelineStatistic};
use funnel_engine::Transition;

use crate::state::AppState;
use crate::types::ApiError;

pub async fn health() -> &'static str {
  "ok"
}

pub async fn aggregator_statistic(
  State(state): State<Arc<AppState>>,
) -> Result<Json<AggregatorStatistic>, ApiError> {
  Ok(Json(state.snapshot.aggregator_statistic()?))
}

pub async fn attrition(
  State(state): State<Arc<AppState>>,
  Path(step): Path<String>,
) -> Result<Json<AttritionReport>, ApiError> {
  let transition = Transition::parse(&step)?;
  Ok(Json(state.snapshot.attrition(transition, state.correlation)?))
}

pub async fn pipeline_statistic(
  State(state): State<Arc<AppState>>,
) -> Result<Json<PipelineStatistic>, ApiError> {
  Ok(Json(state.snapshot.pipeline_statistic()?))
}
