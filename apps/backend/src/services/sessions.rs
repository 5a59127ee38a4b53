//! Live study sessions.
//!
//! Active engines live in the [`SessionRegistry`]; the store holds the
//! session record. An engine leaves the registry when its session finishes
//! or is cancelled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use study_core::{StudySessionEngine, SessionStatus as EngineStatus};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::{access, review};
use crate::AppState;

pub type SharedEngine = Arc<AsyncMutex<StudySessionEngine>>;

#[derive(Default)]
pub struct SessionRegistry {
    engines: Mutex<HashMap<SessionId, SharedEngine>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: SessionId, engine: StudySessionEngine) -> SharedEngine {
        let shared = Arc::new(AsyncMutex::new(engine));
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, shared.clone());
        shared
    }

    pub fn get(&self, id: SessionId) -> Option<SharedEngine> {
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn remove(&self, id: SessionId) -> Option<SharedEngine> {
        self.engines.lock().unwrap_or_else(PoisonError::into_inner).remove(&id)
    }

    pub fn len(&self) -> usize {
        self.engines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn live_view(engine: &mut StudySessionEngine) -> SessionResponse {
    let status = match engine.status() {
        EngineStatus::Finished => SessionLifecycle::Finished,
        EngineStatus::Selecting | EngineStatus::Active => SessionLifecycle::Active,
    };
    SessionResponse {
        session: engine.record().clone(),
        status,
        progress: Some(engine.progress()),
        prompt: engine.prompt(Utc::now()),
    }
}

fn stored_view(session: StudySession) -> SessionResponse {
    let status = if session.is_finished() {
        SessionLifecycle::Finished
    } else {
        SessionLifecycle::Abandoned
    };
    SessionResponse {
        session,
        status,
        progress: None,
        prompt: None,
    }
}

async fn owned_session(state: &AppState, user_id: UserId, session_id: SessionId) -> Result<StudySession> {
    let session = state
        .store
        .get_session(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if session.user_id != user_id {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }
    Ok(session)
}

/// Create a session over the deck and present its first item.
pub async fn start(state: &AppState, user_id: UserId, deck_id: DeckId, mode: StudyMode) -> Result<SessionResponse> {
    access::owned_deck(state.store.as_ref(), user_id, deck_id).await?;
    let cards = state.store.deck_cards(deck_id).await?;

    let now = Utc::now();
    let record = StudySession::new(user_id, deck_id, mode, now);
    let mut engine =
        StudySessionEngine::new(record, state.study.session_config()).with_algorithm(state.algorithm.clone());
    engine.start(cards, now, &mut rand::rng())?;

    state.store.insert_session(engine.record()).await?;

    let session_id = engine.record().id;
    tracing::info!(%session_id, %deck_id, %mode, status = ?engine.status(), "study session started");

    if engine.status() == EngineStatus::Finished {
        return Ok(live_view(&mut engine));
    }

    let shared = state.sessions.insert(session_id, engine);
    let mut engine = shared.lock().await;
    Ok(live_view(&mut engine))
}

pub async fn get(state: &AppState, user_id: UserId, session_id: SessionId) -> Result<SessionResponse> {
    let stored = owned_session(state, user_id, session_id).await?;
    match state.sessions.get(session_id) {
        Some(shared) => {
            let mut engine = shared.lock().await;
            Ok(live_view(&mut engine))
        }
        None => Ok(stored_view(stored)),
    }
}

/// Resolve a response against the current item and commit any review.
pub async fn answer(
    state: &AppState,
    user_id: UserId,
    session_id: SessionId,
    response: Response,
) -> Result<AnswerResponse> {
    let stored = owned_session(state, user_id, session_id).await?;
    let shared = state.sessions.get(session_id).ok_or_else(|| {
        if stored.is_finished() {
            ApiError::Conflict("Session is already finished".to_string())
        } else {
            ApiError::Conflict("Session is no longer active".to_string())
        }
    })?;

    let mut engine = shared.lock().await;
    let now = Utc::now();
    let evaluation = engine.evaluate(response, now)?;

    // The review is stored before the session moves on; a failed commit
    // leaves the same item in front of the learner.
    let updated_card = match evaluation.resolution.quality {
        Some(quality) => Some(
            review::commit_review(
                state.store.as_ref(),
                &state.card_locks,
                state.algorithm.as_ref(),
                evaluation.resolution.card_id,
                quality,
                now,
            )
            .await?,
        ),
        None => None,
    };

    let outcome = engine.advance(evaluation, updated_card, now, &mut rand::rng())?;
    state.store.update_session(engine.record()).await?;

    if outcome.finished {
        state.sessions.remove(session_id);
        tracing::info!(
            %session_id,
            studied = engine.record().cards_studied,
            correct = engine.record().cards_correct,
            "study session finished"
        );
    }

    Ok(AnswerResponse {
        resolution: outcome.resolution,
        updated_card: outcome.updated_card,
        finished: outcome.finished,
        session: live_view(&mut engine),
    })
}

/// Close the session. Calling it again returns the same record.
pub async fn finish(state: &AppState, user_id: UserId, session_id: SessionId) -> Result<SessionResponse> {
    let mut stored = owned_session(state, user_id, session_id).await?;

    if let Some(shared) = state.sessions.remove(session_id) {
        let mut engine = shared.lock().await;
        engine.finish(Utc::now());
        state.store.update_session(engine.record()).await?;
        tracing::info!(%session_id, studied = engine.record().cards_studied, "study session finished");
        return Ok(live_view(&mut engine));
    }

    if stored.finish(Utc::now()) {
        state.store.update_session(&stored).await?;
    }
    Ok(stored_view(stored))
}

/// Drop the live engine without writing `finished_at`.
pub async fn cancel(state: &AppState, user_id: UserId, session_id: SessionId) -> Result<()> {
    owned_session(state, user_id, session_id).await?;

    if let Some(shared) = state.sessions.remove(session_id) {
        let record = match Arc::try_unwrap(shared) {
            Ok(engine) => engine.into_inner().abandon(),
            Err(shared) => shared.lock().await.record().clone(),
        };
        state.store.update_session(&record).await?;
        tracing::info!(%session_id, studied = record.cards_studied, "study session cancelled");
    }
    Ok(())
}

pub async fn list(state: &AppState, user_id: UserId, limit: usize) -> Result<Vec<StudySession>> {
    state.store.list_sessions(user_id, limit).await
}
