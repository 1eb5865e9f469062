use crate::client::{Confirmation, DeleteOutcome, TaskListClient};
use crate::errors::AppError;
use crate::models::{StatusFilter, TaskId};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    Form,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskActionForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub confirm: Option<String>,
}

impl TaskActionForm {
    fn task_id(&self) -> Result<TaskId, AppError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(AppError::bad_request("id must not be empty"));
        }
        Ok(TaskId::new(id))
    }
}

pub async fn index(State(state): State<AppState>, Query(query): Query<BoardQuery>) -> Html<String> {
    let mut session = state.session();
    session.set_filter(query.status);
    session.refresh().await;
    page(&session)
}

pub async fn create_task(State(state): State<AppState>, Form(form): Form<CreateForm>) -> Html<String> {
    let mut session = state.session();
    session.set_filter(form.status);
    if session.create_task(&form.title, &form.description).await.is_err() {
        session.refresh().await;
    }
    page(&session)
}

pub async fn complete_task(
    State(state): State<AppState>,
    Form(form): Form<TaskActionForm>,
) -> Result<Html<String>, AppError> {
    let id = form.task_id()?;
    let mut session = state.session();
    session.set_filter(form.status);
    if session.complete_task(&id).await.is_err() {
        session.refresh().await;
    }
    Ok(page(&session))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Form(form): Form<TaskActionForm>,
) -> Result<Html<String>, AppError> {
    let id = form.task_id()?;
    let confirmation = if !state.config.confirm_delete || form.confirm.as_deref() == Some("yes") {
        Confirmation::Given
    } else {
        Confirmation::Required
    };

    let mut session = state.session();
    session.set_filter(form.status);
    match session.delete_task(&id, confirmation).await {
        Ok(DeleteOutcome::Deleted) => {}
        Ok(DeleteOutcome::AwaitingConfirmation) | Err(_) => session.refresh().await,
    }
    Ok(page(&session))
}

pub async fn healthz() -> &'static str {
    "ok"
}

fn page(session: &TaskListClient) -> Html<String> {
    Html(render_index(session.state()))
}
