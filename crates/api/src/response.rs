//! Shared response envelope types for console handlers.
//!
//! All JSON responses use a `{ "data": ... }` envelope. Mutations answer with
//! an [`Ack`], which also raises a success notice for the signed-in provider.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::notifications::{NoticeKind, PendingNotice};

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Acknowledgement of a successful mutation.
///
/// `reload_after_ms` is how long the UI waits before refetching; the backend
/// is the source of truth, so the console never patches its view locally.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub message: String,
    pub reload_after_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(skip)]
    notify: bool,
}

impl Ack {
    /// Stay on the page and refetch after `delay_ms`.
    pub fn reload(message: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            message: message.into(),
            reload_after_ms: delay_ms,
            redirect_to: None,
            notify: true,
        }
    }

    /// Navigate to `to` right away.
    pub fn redirect(message: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            reload_after_ms: 0,
            redirect_to: Some(to.into()),
            notify: true,
        }
    }

    /// Do not raise a notice for this acknowledgement.
    pub fn silent(mut self) -> Self {
        self.notify = false;
        self
    }
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        let notice = self.notify.then(|| PendingNotice {
            kind: NoticeKind::Success,
            message: self.message.clone(),
        });
        let mut response = Json(DataResponse { data: self }).into_response();
        if let Some(notice) = notice {
            response.extensions_mut().insert(notice);
        }
        response
    }
}
