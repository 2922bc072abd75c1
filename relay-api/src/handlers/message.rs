use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use relay_app::domain::RawMessageRequest;
use relay_app::AppContext;
use relay_errors::RelayError;

/// `POST /my-gpt-endpoint`: single message in, plain reply text out.
pub async fn handle_message(
    State(ctx): State<AppContext>,
    payload: Result<Json<RawMessageRequest>, JsonRejection>,
) -> Result<String, RelayError> {
    let Json(raw) = payload.map_err(|e| RelayError::MalformedBody(e.body_text()))?;
    ctx.relay_message.execute(raw).await
}

/// `GET /my-gpt-endpoint/{message}`
pub async fn handle_message_path(
    State(ctx): State<AppContext>,
    path: Result<Path<String>, PathRejection>,
) -> Result<String, RelayError> {
    let Path(message) = path.map_err(|e| RelayError::MalformedBody(e.body_text()))?;
    ctx.relay_message
        .execute(RawMessageRequest::from_text(message))
        .await
}
