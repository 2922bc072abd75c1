use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use relay_app::domain::RawCompletionRequest;
use relay_app::AppContext;
use relay_errors::RelayError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct ModelsQuery {
    #[serde(alias = "SLlpProvider")]
    pub provider: Option<String>,
}

/// `POST /my-llp-endpoint/completions`
pub async fn handle_completions(
    State(ctx): State<AppContext>,
    payload: Result<Json<RawCompletionRequest>, JsonRejection>,
) -> Result<Json<Value>, RelayError> {
    let Json(raw) = payload.map_err(|e| RelayError::MalformedBody(e.body_text()))?;
    let body = ctx.relay_completion.execute(raw).await?;
    Ok(Json(body))
}

/// `GET /my-llp-endpoint/available-models`
pub async fn handle_available_models(
    State(ctx): State<AppContext>,
    query: Result<Query<ModelsQuery>, QueryRejection>,
) -> Result<Json<Value>, RelayError> {
    let Query(query) = query.map_err(|e| RelayError::MalformedBody(e.body_text()))?;
    let body = ctx.list_models.execute(query.provider.as_deref()).await?;
    Ok(Json(body))
}
