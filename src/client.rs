use crate::api::TaskApi;
use crate::errors::ClientError;
use crate::models::{AnalyticsShape, AnalyticsSummary, NewTask, StatusFilter, Task, TaskId};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// Dismissable message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInputs {
    pub title: String,
    pub description: String,
}

impl TaskInputs {
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Required,
    Given,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AwaitingConfirmation,
}

/// Everything the board shows. Replaced piecewise by each successful fetch.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub filter: StatusFilter,
    /// `None` until the first successful list fetch.
    pub tasks: Option<Vec<Task>>,
    pub list_error: Option<String>,
    pub analytics: Option<AnalyticsSummary>,
    pub inputs: TaskInputs,
    pub notices: Vec<Notice>,
    pub pending_delete: Option<TaskId>,
}

impl ViewState {
    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.as_deref()?.iter().find(|task| &task.id == id)
    }
}

pub struct TaskListClient {
    api: Arc<dyn TaskApi>,
    analytics_shape: AnalyticsShape,
    state: ViewState,
}

impl TaskListClient {
    pub fn new(api: Arc<dyn TaskApi>, analytics_shape: AnalyticsShape) -> Self {
        Self {
            api,
            analytics_shape,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.state.filter = filter;
    }

    /// Fetches the list for `filter` and replaces the displayed one.
    /// Failures are recorded on the view and logged; the stale list stays.
    pub async fn list_tasks(&mut self, filter: StatusFilter) -> &[Task] {
        self.state.filter = filter;
        match self.api.list_tasks(filter).await {
            Ok(tasks) => {
                for task in tasks.iter().filter(|task| !task.is_consistent()) {
                    warn!(
                        "task {} has status {} but completed_at {:?}",
                        task.id,
                        task.status.as_str(),
                        task.completed_at
                    );
                }
                info!("loaded {} tasks (filter: {})", tasks.len(), filter.as_str());
                self.state.list_error = None;
                self.state.tasks = Some(tasks);
            }
            Err(err) => {
                error!("failed to load tasks: {err}");
                self.state.list_error = Some("Failed to load tasks. Please try again later.".to_string());
            }
        }
        self.state.tasks.as_deref().unwrap_or_default()
    }

    /// Fetches the analytics snapshot. A failure keeps the previous snapshot.
    pub async fn load_analytics(&mut self) -> Option<&AnalyticsSummary> {
        match self.api.analytics(self.analytics_shape).await {
            Ok(summary) => self.state.analytics = Some(summary),
            Err(err) => error!("failed to load analytics: {err}"),
        }
        self.state.analytics.as_ref()
    }

    pub async fn refresh(&mut self) {
        self.list_tasks(self.state.filter).await;
        self.load_analytics().await;
    }

    pub async fn create_task(&mut self, title: &str, description: &str) -> Result<Task, ClientError> {
        self.state.inputs = TaskInputs {
            title: title.to_string(),
            description: description.to_string(),
        };

        let Some(new_task) = NewTask::parse(title, description) else {
            let err = ClientError::Validation("Please enter a task title".to_string());
            warn!("create rejected locally: {err}");
            self.state.notices.push(Notice::error(err.to_string()));
            return Err(err);
        };

        match self.api.create_task(&new_task).await {
            Ok(task) => {
                info!("created task {} ({:?})", task.id, task.title);
                self.state.inputs.clear();
                self.refresh().await;
                self.state.notices.push(Notice::success("Task created successfully!"));
                Ok(task)
            }
            Err(err) => Err(self.report("create task", err)),
        }
    }

    pub async fn complete_task(&mut self, id: &TaskId) -> Result<(), ClientError> {
        match self.api.complete_task(id).await {
            Ok(()) => {
                info!("completed task {id}");
                self.refresh().await;
                self.state.notices.push(Notice::success("Task marked as complete!"));
                Ok(())
            }
            Err(err) => Err(self.report("complete task", err)),
        }
    }

    pub async fn delete_task(
        &mut self,
        id: &TaskId,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, ClientError> {
        if confirmation == Confirmation::Required {
            info!("awaiting confirmation to delete task {id}");
            self.state.pending_delete = Some(id.clone());
            return Ok(DeleteOutcome::AwaitingConfirmation);
        }

        self.state.pending_delete = None;
        match self.api.delete_task(id).await {
            Ok(()) => {
                info!("deleted task {id}");
                self.refresh().await;
                self.state.notices.push(Notice::success("Task deleted successfully!"));
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => Err(self.report("delete task", err)),
        }
    }

    fn report(&mut self, action: &str, err: ClientError) -> ClientError {
        error!("failed to {action} ({}): {err}", err.kind());
        self.state
            .notices
            .push(Notice::error(format!("Failed to {action}. Please try again.")));
        err
    }
}
