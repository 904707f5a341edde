//! `POST /api/v1/migration`: one request document in, one response or error
//! document out.

use cm_session::{AppState, ErrorDocument, RequestDocument, SessionError, dispatch};

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::debug;

pub async fn migration_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let doc: RequestDocument = match serde_json::from_slice(&body) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Rejected request body: {}", e);
            let error = SessionError::malformed(format!("Invalid request document: {e}"), None);
            return error_response(ErrorDocument::from(&error));
        }
    };

    match dispatch(doc, &state).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ErrorDocument) -> Response {
    let status = StatusCode::from_u16(error.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error)).into_response()
}
