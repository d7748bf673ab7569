use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

const MAX_WORD_CHARS: usize = 64;

#[derive(Debug, Deserialize)]
struct HintRequest {
    /// Absent or null for a player without a word.
    #[serde(default)]
    word: Option<String>,
    role: Role,
}

#[derive(Debug, Serialize)]
struct HintResponse {
    hint: String,
}

async fn request_hint(
    body: web::Json<HintRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let HintRequest { word, role } = body.into_inner();
    let word = word.map(|w| w.trim().to_string());
    if let Some(word) = &word {
        if word.is_empty() || word.chars().count() > MAX_WORD_CHARS {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("word must be 1 to {MAX_WORD_CHARS} characters"),
            ));
        }
    }

    let hint = app_state.hints.hint_for(word.as_deref(), role).await;
    Ok(HttpResponse::Ok().json(HintResponse { hint }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("Invalid hint request: {err}")).into()
    }))
    .route("", web::post().to(request_hint));
}
