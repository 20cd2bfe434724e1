//! Axum route handlers for the browser UI.
//!
//! Every POST ends in a 303 redirect back to the session page, which renders
//! the workspace in its current view.

use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
    Form,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::AnalysisRequest;
use crate::errors::AppError;
use crate::extraction::acquisition::acquire_resume_text;
use crate::state::AppState;
use crate::ui::render::render_page;
use crate::ui::{Notice, View};

// ────────────────────────────────────────────────────────────────────────────
// Form types
// ────────────────────────────────────────────────────────────────────────────

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// The upload view's form. Both the "Load file" and the analyze buttons submit it.
#[derive(Default)]
struct WorkspaceForm {
    resume_text: Option<String>,
    job_description: Option<String>,
    file: Option<UploadedFile>,
}

#[derive(Debug, Deserialize)]
pub struct ViewForm {
    pub view: View,
}

async fn read_workspace_form(mut multipart: Multipart) -> Result<WorkspaceForm, AppError> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Malformed form submission: {}", e.body_text()))
    };

    let mut form = WorkspaceForm::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        match field.name() {
            Some("resume_text") => form.resume_text = Some(field.text().await.map_err(malformed)?),
            Some("job_description") => {
                form.job_description = Some(field.text().await.map_err(malformed)?)
            }
            Some("resume_file") => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(malformed)?;
                // Browsers send an empty, unnamed part when no file was picked.
                let picked = !bytes.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty());
                if picked {
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

fn session_url(id: Uuid) -> String {
    format!("/sessions/{id}")
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Starts a fresh workspace and sends the browser to it.
pub async fn handle_new_session(State(state): State<AppState>) -> Redirect {
    let id = state.sessions.create().await;
    Redirect::to(&session_url(id))
}

/// GET /sessions/:id
pub async fn handle_show_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let page = state
        .sessions
        .with(id, |ws| {
            let notice = ws.take_notice();
            render_page(id, ws, notice.as_ref())
        })
        .await?;
    Ok(Html(page))
}

/// POST /sessions/:id/resume
///
/// Saves the typed texts, then replaces the resume text with the uploaded
/// file's content. A failed upload leaves the previous resume text in place.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_workspace_form(multipart).await?;
    let file = state
        .sessions
        .with(id, |ws| {
            if let Some(text) = form.resume_text {
                ws.resume_text = text;
            }
            if let Some(text) = form.job_description {
                ws.job_description = text;
            }
            if form.file.is_none() {
                ws.notify(Notice::error("Choose a .txt or .pdf file to upload"));
            }
            form.file
        })
        .await?;

    let Some(file) = file else {
        return Ok(Redirect::to(&session_url(id)));
    };

    let acquired = acquire_resume_text(
        &state.pdf,
        file.file_name.as_deref(),
        file.content_type.as_deref(),
        file.bytes,
    )
    .await;

    state
        .sessions
        .with(id, |ws| match acquired {
            Ok(acquired) => {
                ws.notify(Notice::info(format!(
                    "Loaded {} characters from {}",
                    acquired.characters,
                    file.file_name.as_deref().unwrap_or("the uploaded file")
                )));
                ws.resume_text = acquired.text;
            }
            Err(e) => ws.fail(&e),
        })
        .await?;

    Ok(Redirect::to(&session_url(id)))
}

/// POST /sessions/:id/analyze
///
/// Runs one analysis. The workspace is marked busy until this handler returns
/// or is dropped, whatever the outcome.
pub async fn handle_session_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_workspace_form(multipart).await?;

    let (request, _busy) = state
        .sessions
        .with(id, |ws| {
            if let Some(text) = form.resume_text {
                ws.resume_text = text;
            }
            if let Some(text) = form.job_description {
                ws.job_description = text;
            }
            let request = AnalysisRequest {
                resume_text: ws.resume_text.clone(),
                job_description: ws.job_description.clone(),
            };
            (request, ws.begin_analysis())
        })
        .await?;

    let outcome = state.analyzer.analyze(&request).await;

    state
        .sessions
        .with(id, |ws| match outcome {
            Ok(result) => {
                info!("Workspace {id}: analysis stored (match_score={})", result.match_score);
                ws.complete_analysis(result);
            }
            Err(e) => ws.fail(&e),
        })
        .await?;

    Ok(Redirect::to(&session_url(id)))
}

/// POST /sessions/:id/view
pub async fn handle_switch_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ViewForm>,
) -> Result<Redirect, AppError> {
    state
        .sessions
        .with(id, |ws| {
            ws.show(form.view);
        })
        .await?;
    Ok(Redirect::to(&session_url(id)))
}

/// POST /sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    state.sessions.with(id, |ws| ws.reset()).await?;
    Ok(Redirect::to(&session_url(id)))
}
