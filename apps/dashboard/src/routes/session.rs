//! Client session resolution for the screen routes.
//!
//! A client names its session with the `x-session-id` header. Requests
//! without one (or with an unknown or expired id) get a new session, and
//! every screen response echoes the id back in the same header.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::render::ScreenView;
use crate::state::AppState;
use crate::workflow::DashboardSession;

pub const SESSION_HEADER: &str = "x-session-id";

/// The calling client's dashboard session.
pub struct ClientSession {
    pub id: Uuid,
    pub session: Arc<DashboardSession>,
}

impl ClientSession {
    pub fn respond(&self, view: ScreenView) -> ScreenResponse {
        ScreenResponse {
            session_id: self.id,
            view,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ClientSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());

        let (id, session) = state.sessions.resolve(requested);
        Ok(ClientSession { id, session })
    }
}

/// A rendered screen tagged with the session it belongs to.
pub struct ScreenResponse {
    session_id: Uuid,
    view: ScreenView,
}

impl IntoResponse for ScreenResponse {
    fn into_response(self) -> Response {
        (
            [(
                HeaderName::from_static(SESSION_HEADER),
                self.session_id.to_string(),
            )],
            Json(self.view),
        )
            .into_response()
    }
}
