//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use daytalk_domain::{FlagEntry, GameState, NpcId, NpcMemory, PlaceId};
use daytalk_shared::{
    ApiErrorBody, ClosePlaceRequest, ErrorCode, FlagKv, GameStateResponse, NpcMemoryData,
    NpcSummaryData, PlaceResponse, TalkRequest, TalkResponse, TimeActionResponse, TurnData,
};

use crate::app::App;
use crate::infrastructure::ports::SaveError;
use crate::use_cases::conversation::{ConversationError, TalkError};
use crate::use_cases::time::Transition;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/state", get(get_state))
        .route("/api/game/new", post(new_game))
        .route("/api/game/load", post(load_game))
        .route("/api/game/save", post(save_game))
        .route("/api/time/advance", post(advance_time_block))
        .route("/api/time/finish-night", post(finish_night))
        .route("/api/time/major-action", post(consume_major_action))
        .route("/api/event/begin", post(begin_event))
        .route("/api/event/end", post(end_event))
        .route("/api/places/close", post(close_place))
        .route("/api/places/{place}/enter", post(enter_place))
        .route("/api/npcs/{id}", get(get_npc))
        .route("/api/npcs/{id}/talk", post(talk_to_npc))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Game session
// =============================================================================

async fn get_state(State(app): State<Arc<App>>) -> Json<GameStateResponse> {
    Json(state_response(&app).await)
}

async fn new_game(State(app): State<Arc<App>>) -> Result<Json<GameStateResponse>, ApiError> {
    app.use_cases.session.new_game().await?;
    Ok(Json(state_response(&app).await))
}

async fn load_game(State(app): State<Arc<App>>) -> Result<Json<GameStateResponse>, ApiError> {
    app.use_cases.session.load_game().await?;
    Ok(Json(state_response(&app).await))
}

async fn save_game(State(app): State<Arc<App>>) -> Result<StatusCode, ApiError> {
    app.use_cases.session.save_game().await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Time loop
// =============================================================================

async fn advance_time_block(State(app): State<Arc<App>>) -> Json<TimeActionResponse> {
    let transition = app.use_cases.session.advance_time_block().await;
    time_action(&app, transition)
}

async fn finish_night(State(app): State<Arc<App>>) -> Json<TimeActionResponse> {
    let transition = app.use_cases.session.finish_night().await;
    time_action(&app, transition)
}

async fn consume_major_action(State(app): State<Arc<App>>) -> Json<TimeActionResponse> {
    let transition = app.use_cases.time.consume_major_action();
    time_action(&app, transition)
}

async fn begin_event(State(app): State<Arc<App>>) -> Json<TimeActionResponse> {
    let transition = app.use_cases.time.begin_event();
    time_action(&app, transition)
}

async fn end_event(State(app): State<Arc<App>>) -> Json<TimeActionResponse> {
    let transition = app.use_cases.time.end_event();
    time_action(&app, transition)
}

fn time_action(app: &App, transition: Transition) -> Json<TimeActionResponse> {
    Json(TimeActionResponse {
        accepted: transition.accepted,
        events: transition.events,
        time: app.use_cases.time.snapshot(),
    })
}

// =============================================================================
// Places
// =============================================================================

async fn enter_place(
    State(app): State<Arc<App>>,
    Path(place): Path<String>,
) -> Result<Json<PlaceResponse>, ApiError> {
    let place: PlaceId = place
        .parse()
        .map_err(|e: daytalk_domain::DomainError| ApiError::BadRequest(e.to_string()))?;

    let entry = app.use_cases.place.enter_place(place);
    Ok(Json(PlaceResponse {
        place: Some(place.to_string()),
        returned_home: entry.returned_home,
        major_action_consumed: None,
        events: entry.events,
        time: app.use_cases.time.snapshot(),
    }))
}

async fn close_place(
    State(app): State<Arc<App>>,
    Json(req): Json<ClosePlaceRequest>,
) -> Json<PlaceResponse> {
    let closed = app.use_cases.place.close_place_event(req.as_major_action);
    Json(PlaceResponse {
        place: None,
        returned_home: false,
        major_action_consumed: closed.major_action_consumed,
        events: closed.events,
        time: app.use_cases.time.snapshot(),
    })
}

// =============================================================================
// NPCs
// =============================================================================

async fn get_npc(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<NpcMemoryData>, ApiError> {
    let npc_id = NpcId::new(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let game = app.use_cases.session.lock_game().await;

    match game.npc(&npc_id) {
        Some(memory) => Ok(Json(memory_data(memory))),
        // Known but not yet talked to
        None if app.catalog.get(&npc_id).is_some() => {
            Ok(Json(memory_data(&NpcMemory::new(npc_id))))
        }
        None => Err(ApiError::NotFound(format!("NPC not found: {}", id))),
    }
}

async fn talk_to_npc(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(req): Json<TalkRequest>,
) -> Result<Json<TalkResponse>, ApiError> {
    let result = app
        .talk(&id, &req.input, req.consume_major_action)
        .await?;

    let outcome = result.outcome;
    Ok(Json(TalkResponse {
        reply: outcome.reply,
        source: outcome.source,
        affinity_delta: outcome.affinity_delta,
        affinity: outcome.affinity,
        flag_updates: outcome.flag_updates.iter().map(flag_kv).collect(),
        note: outcome.note,
        major_action_consumed: result.major_action_consumed,
        events: result.events,
        time: app.use_cases.time.snapshot(),
    }))
}

// =============================================================================
// Conversions
// =============================================================================

async fn state_response(app: &App) -> GameStateResponse {
    let game = app.use_cases.session.lock_game().await;
    game_state_response(app, &game)
}

fn game_state_response(app: &App, game: &GameState) -> GameStateResponse {
    GameStateResponse {
        time: app.use_cases.time.snapshot(),
        time_slot: game.world().time_slot.clone(),
        npcs: game
            .npcs_sorted()
            .into_iter()
            .map(|npc| NpcSummaryData {
                npc_id: npc.npc_id().to_string(),
                affinity: npc.affinity(),
                turn_count: npc.recent_turns().len(),
            })
            .collect(),
    }
}

fn flag_kv(flag: &FlagEntry) -> FlagKv {
    FlagKv {
        key: flag.key.clone(),
        value: flag.value.clone(),
    }
}

fn memory_data(memory: &NpcMemory) -> NpcMemoryData {
    NpcMemoryData {
        npc_id: memory.npc_id().to_string(),
        affinity: memory.affinity(),
        flags: memory.flags().iter().map(flag_kv).collect(),
        recent_turns: memory
            .recent_turns()
            .map(|t| TurnData {
                speaker: t.speaker.to_string(),
                text: t.text.clone(),
            })
            .collect(),
        summary_memo: memory.summary_memo().to_string(),
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// The dialogue proxy failed or sent an unusable reply.
    Upstream(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, ErrorCode::UpstreamFailed, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(ApiErrorBody { code, message })).into_response()
    }
}

impl From<SaveError> for ApiError {
    fn from(e: SaveError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ConversationError> for ApiError {
    fn from(e: ConversationError) -> Self {
        match e {
            ConversationError::NpcNotFound(_) => ApiError::NotFound(e.to_string()),
            ConversationError::Talk(TalkError::EmptyInput) => ApiError::BadRequest(e.to_string()),
            ConversationError::Talk(TalkError::InvalidRequest(_)) => {
                ApiError::Internal(e.to_string())
            }
            ConversationError::Talk(
                TalkError::Transport(_) | TalkError::InvalidResponse(_),
            ) => ApiError::Upstream(e.to_string()),
        }
    }
}
