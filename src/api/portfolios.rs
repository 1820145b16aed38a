use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::session::SessionToken;
use super::{ApiError, ApiResponse, AppState, CreatePortfolioRequest, PortfolioDto};

/// GET /portfolios
/// List the caller's portfolios, newest first
pub async fn list_portfolios(
    State(state): State<Arc<AppState>>,
    token: SessionToken,
) -> Result<Json<ApiResponse<Vec<PortfolioDto>>>, ApiError> {
    let portfolios = state.portfolios.list(token.as_deref()).await?;

    Ok(Json(ApiResponse::success(
        portfolios.into_iter().map(PortfolioDto::from).collect(),
    )))
}

/// POST /portfolios
pub async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    token: SessionToken,
    Json(payload): Json<CreatePortfolioRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PortfolioDto>>), ApiError> {
    let portfolio = state
        .portfolios
        .create(token.as_deref(), &payload.role_name, payload.jobs_count)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PortfolioDto::from(portfolio))),
    ))
}
