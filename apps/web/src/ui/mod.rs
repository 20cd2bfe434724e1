//! Browser UI: per-session workspaces rendered server-side.
//!
//! Each browser session owns one in-memory `Workspace`, addressed by a UUID in
//! the URL. Nothing survives a restart.

pub mod handlers;
pub mod render;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;

/// Workspaces untouched for this long are dropped when a new one is created.
const SESSION_IDLE_HOURS: i64 = 12;

/// Upper bound on live workspaces. Creating one more evicts the least recently used.
const MAX_ACTIVE_SESSIONS: usize = 1_000;

/// The two views of the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Upload,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-shot message shown at the top of the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Marks a workspace busy for as long as it is alive.
pub struct InProgressGuard(Arc<AtomicBool>);

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Everything one user has entered or received.
#[derive(Debug)]
pub struct Workspace {
    pub resume_text: String,
    pub job_description: String,
    analysis: Option<AnalysisResult>,
    analyzed_at: Option<DateTime<Utc>>,
    view: View,
    in_progress: Arc<AtomicBool>,
    notice: Option<Notice>,
    last_seen: DateTime<Utc>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            resume_text: String::new(),
            job_description: String::new(),
            analysis: None,
            analyzed_at: None,
            view: View::Upload,
            in_progress: Arc::new(AtomicBool::new(false)),
            notice: None,
            last_seen: Utc::now(),
        }
    }
}

impl Workspace {
    pub fn view(&self) -> View {
        self.view
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at
    }

    /// Switches views. Results can only be shown once an analysis exists.
    pub fn show(&mut self, view: View) -> bool {
        if view == View::Results && self.analysis.is_none() {
            return false;
        }
        self.view = view;
        true
    }

    pub fn begin_analysis(&self) -> InProgressGuard {
        self.in_progress.store(true, Ordering::SeqCst);
        InProgressGuard(self.in_progress.clone())
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    pub fn complete_analysis(&mut self, result: AnalysisResult) {
        self.analysis = Some(result);
        self.analyzed_at = Some(Utc::now());
        self.view = View::Results;
    }

    /// Reports a failure. Any earlier analysis stays as it was.
    pub fn fail(&mut self, error: &AppError) {
        error.log();
        self.notice = Some(Notice::error(error.user_message()));
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// "Analyze another position": drops the analysis, keeps the entered texts.
    pub fn reset(&mut self) {
        self.analysis = None;
        self.analyzed_at = None;
        self.view = View::Upload;
    }
}

/// In-memory workspaces keyed by session id.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Workspace>>>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limit(MAX_ACTIVE_SESSIONS)
    }
}

impl SessionStore {
    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;

        let cutoff = Utc::now() - Duration::hours(SESSION_IDLE_HOURS);
        let before = sessions.len();
        sessions.retain(|_, ws| ws.last_seen >= cutoff);
        if sessions.len() < before {
            debug!("Dropped {} idle workspace(s)", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, ws)| ws.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            debug!("Evicted least recently used workspace {oldest}");
        }

        sessions.insert(id, Workspace::default());
        info!("Created workspace {id} ({} active)", sessions.len());
        id
    }

    /// Runs `f` against the workspace, or fails with `NotFound`.
    pub async fn with<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Workspace) -> R,
    ) -> Result<R, AppError> {
        let mut sessions = self.inner.write().await;
        let workspace = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        workspace.last_seen = Utc::now();
        Ok(f(workspace))
    }
}
