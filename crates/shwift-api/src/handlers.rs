use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shwift_core::config::API_KEY_ENV;
use shwift_core::content::{
    CallToAction, BEFORE_YOU_BEGIN, CALL_TO_ACTION, EARLY_VERSION_NOTE, EMPTY_SNAPSHOT_MESSAGE,
    NEXT_STEPS, SNAPSHOT_DISCLAIMER,
};
use shwift_core::{
    build_prompt, collect_answers, questions_for, resolve_tier, AnswerRecord, DiagnosticSession,
    Question, SessionError, SessionState, SnapshotOutcome, Tier,
};
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

static INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub model: String,
    pub configured: bool,
}

#[derive(Deserialize)]
pub struct TierQuery {
    pub tier: Option<String>,
}

#[derive(Serialize)]
pub struct TierDto {
    pub code: &'static str,
    pub label: &'static str,
    pub explanation: &'static str,
}

impl From<Tier> for TierDto {
    fn from(tier: Tier) -> Self {
        Self {
            code: tier.code(),
            label: tier.label(),
            explanation: tier.explanation(),
        }
    }
}

#[derive(Serialize)]
pub struct TiersResponse {
    pub default: Tier,
    pub tiers: Vec<TierDto>,
    pub before_you_begin: &'static str,
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub tier: Tier,
    pub questions: &'static [Question],
}

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    /// Raw `?tier=` value from the page URL
    pub url_tier: Option<String>,
    /// Tier picked in the selector, if the user changed it
    pub tier: Option<String>,
}

#[derive(Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub tier: Tier,
    pub tier_label: &'static str,
    pub explanation: &'static str,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SnapshotOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DiagnosticSession> for SessionView {
    fn from(session: &DiagnosticSession) -> Self {
        let tier = session.tier();
        Self {
            id: session.id(),
            tier,
            tier_label: tier.label(),
            explanation: tier.explanation(),
            state: session.state(),
            outcome: session.outcome().cloned(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

#[derive(Serialize)]
pub struct BeginResponse {
    pub session: SessionView,
    pub before_you_begin: &'static str,
    pub questions: &'static [Question],
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: HashMap<String, Value>,
}

/// Framing shown under a snapshot that has content.
#[derive(Serialize)]
pub struct Closing {
    pub disclaimer: &'static str,
    pub next_steps: [&'static str; 3],
    pub call_to_action: CallToAction,
    pub early_version_note: &'static str,
}

#[derive(Serialize)]
pub struct SnapshotResponse {
    pub session: SessionView,
    pub snapshot: String,
    pub has_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<Closing>,
}

impl SnapshotResponse {
    fn new(session: SessionView, snapshot: String) -> Self {
        let has_content = !snapshot.trim().is_empty();
        Self {
            session,
            snapshot,
            has_content,
            notice: (!has_content).then_some(EMPTY_SNAPSHOT_MESSAGE),
            closing: has_content.then_some(Closing {
                disclaimer: SNAPSHOT_DISCLAIMER,
                next_steps: NEXT_STEPS,
                call_to_action: CALL_TO_ACTION,
                early_version_note: EARLY_VERSION_NOTE,
            }),
        }
    }
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session {} not found", id))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.provider.provider_name().to_string(),
        model: state.provider.model_name().to_string(),
        configured: state.provider.is_configured(),
    })
}

pub async fn list_tiers(Query(query): Query<TierQuery>) -> Json<TiersResponse> {
    Json(TiersResponse {
        default: resolve_tier(query.tier.as_deref(), None),
        tiers: Tier::ALL.into_iter().map(TierDto::from).collect(),
        before_you_begin: BEFORE_YOU_BEGIN,
    })
}

pub async fn tier_questions(Path(code): Path<String>) -> ApiResult<Json<QuestionsResponse>> {
    let tier: Tier = code
        .parse()
        .map_err(|e: shwift_core::tier::UnknownTier| ApiError::NotFound(e.to_string()))?;
    Ok(Json(QuestionsResponse {
        tier,
        questions: questions_for(tier),
    }))
}

pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let Json(request) = payload?;
    let tier = resolve_tier(request.url_tier.as_deref(), request.tier.as_deref());
    let session = state.sessions.create(tier);
    info!(session_id = %session.id(), tier = %tier, "Diagnostic session started");
    Ok((StatusCode::CREATED, Json(SessionView::from(&session))))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let session = state.sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(SessionView::from(&session)))
}

pub async fn begin_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BeginResponse>> {
    let view = state
        .sessions
        .update(&id, |session| -> Result<SessionView, SessionError> {
            session.begin()?;
            Ok(SessionView::from(&*session))
        })
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(BeginResponse {
        questions: questions_for(view.tier),
        before_you_begin: BEFORE_YOU_BEGIN,
        session: view,
    }))
}

/// Collect the answers, request a snapshot and record it.
///
/// The session's state check, collection and the move to `Requesting` happen
/// under one entry lock, so a second submit for the same session is rejected
/// while the first is outstanding. The request itself runs on its own task:
/// if the caller disconnects, the session still reaches `SnapshotReady` or
/// `RequestFailed` and a successful snapshot is still logged.
pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<Json<SnapshotResponse>> {
    let Json(request) = payload?;
    let configured = state.provider.is_configured();

    let record = state
        .sessions
        .update(&id, |session| -> ApiResult<AnswerRecord> {
            match session.state() {
                SessionState::Initial => return Err(SessionError::NotBegun.into()),
                SessionState::Requesting => return Err(SessionError::RequestInFlight.into()),
                _ => {}
            }
            let record = collect_answers(session.tier(), &request.answers)?;
            if !configured {
                return Err(ApiError::Configuration(format!(
                    "{} not found. Please set it as an environment variable or in the \
                     configuration secrets.",
                    API_KEY_ENV
                )));
            }
            session.submit(record.clone())?;
            Ok(record)
        })
        .ok_or_else(|| session_not_found(id))??;

    tokio::spawn(run_snapshot(state, id, record))
        .await
        .map_err(|e| ApiError::Internal(format!("snapshot task failed: {}", e)))?
        .map(Json)
}

/// Drive one `Requesting` session to its outcome.
async fn run_snapshot(state: AppState, id: Uuid, record: AnswerRecord) -> ApiResult<SnapshotResponse> {
    let prompt = build_prompt(record.tier(), &record);

    match state.provider.request_snapshot(&prompt).await {
        Ok(snapshot) => {
            let view = state
                .sessions
                .update(&id, |session| -> Result<SessionView, SessionError> {
                    session.complete(snapshot.clone())?;
                    Ok(SessionView::from(&*session))
                })
                .ok_or_else(|| session_not_found(id))??;

            record_snapshot(&state, record, snapshot.clone()).await;
            Ok(SnapshotResponse::new(view, snapshot))
        }
        Err(e) => {
            warn!(session_id = %id, error = %e, "Snapshot request failed");
            let message = e.to_string();
            let _ = state.sessions.update(&id, |session| session.fail(message));
            Err(e.into())
        }
    }
}

/// Append the submission to the CSV log. Failures are reported, never returned.
async fn record_snapshot(state: &AppState, answers: AnswerRecord, snapshot: String) {
    let log = state.snapshot_log.clone();
    let path = log.path().to_path_buf();

    match tokio::task::spawn_blocking(move || log.append(&answers, &snapshot)).await {
        Ok(Ok(entry)) => {
            info!(tier = %entry.tier, path = %path.display(), "Snapshot logged");
        }
        Ok(Err(e)) => {
            error!(error = %e, path = %path.display(), "Failed to append snapshot log row");
        }
        Err(e) => {
            error!(error = %e, "Snapshot log task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SessionView {
        SessionView::from(&DiagnosticSession::new(Tier::Community))
    }

    #[test]
    fn content_gets_closing_framing() {
        let response = SnapshotResponse::new(view(), "1. Profile Name\nSteady".into());
        assert!(response.has_content);
        assert!(response.notice.is_none());
        let closing = response.closing.unwrap();
        assert_eq!(closing.call_to_action.url, "https://shwift.uk#section02");
        assert_eq!(closing.next_steps.len(), 3);
    }

    #[test]
    fn empty_snapshot_gets_neutral_notice() {
        let response = SnapshotResponse::new(view(), String::new());
        assert!(!response.has_content);
        assert_eq!(response.notice, Some(EMPTY_SNAPSHOT_MESSAGE));
        assert!(response.closing.is_none());
    }
}
