//! HTTP handlers
//!
//! Handlers are infallible: the pipeline resolves every failure to a plain
//! string answer, so there are no error branches here.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::speech;
use crate::types::{AskRequest, AskResponse};

use super::state::AppState;

/// `GET /` — liveness probe, required by the hosting platform.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /ask` — answer a question, kicking off detached speech synthesis.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Json<AskResponse> {
    tracing::info!(question = %request.question, "Question received");

    let answer = state.pipeline().answer_question(&request.question).await;

    // The answer is returned immediately; the MP3 appears under /audio
    // whenever the detached task finishes.
    let audio_url = state.synthesizer().map(|synthesizer| {
        let filename = format!("{}.mp3", Uuid::new_v4());
        speech::spawn_detached(synthesizer, answer.clone(), filename.clone());
        format!("/audio/{}", filename)
    });

    Json(AskResponse {
        question: request.question,
        answer,
        audio_url,
    })
}
