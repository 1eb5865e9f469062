use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// `completed_at` must be present exactly when the task is completed.
    pub fn is_consistent(&self) -> bool {
        self.is_completed() == self.completed_at.is_some()
    }

    /// Description with blank values folded into `None`.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Client-side status constraint for the list request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed];

    /// Value of the `status` query parameter; `None` means the parameter is omitted.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(TaskStatus::Pending.as_str()),
            StatusFilter::Completed => Some(TaskStatus::Completed.as_str()),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.query_value().unwrap_or("all")
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All tasks",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

impl NewTask {
    /// Trims both fields; returns `None` when the title is blank.
    pub fn parse(title: &str, description: &str) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
        })
    }
}

/// Which analytics endpoint is queried and how its body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsShape {
    #[default]
    Completion,
    Productivity,
}

impl AnalyticsShape {
    pub fn endpoint(self) -> [&'static str; 2] {
        match self {
            AnalyticsShape::Completion => ["analytics", "completion"],
            AnalyticsShape::Productivity => ["analytics", "productivity"],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completion" => Some(AnalyticsShape::Completion),
            "productivity" => Some(AnalyticsShape::Productivity),
            _ => None,
        }
    }
}

/// Canonical analytics snapshot rendered by the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    /// Percentage in the 0-100 range.
    pub completion_percentage: f64,
    pub average_completion_minutes: Option<f64>,
    pub completed_today: Option<u64>,
}

/// Body of `GET /analytics/completion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionAnalytics {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub completion_percentage: f64,
}

/// Body of `GET /analytics/productivity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityAnalytics {
    pub tasks_created: u64,
    pub tasks_completed: u64,
    pub completion_rate: f64,
    #[serde(default)]
    pub average_completion_time_minutes: Option<f64>,
    #[serde(default)]
    pub tasks_completed_today: Option<u64>,
}

impl From<CompletionAnalytics> for AnalyticsSummary {
    fn from(raw: CompletionAnalytics) -> Self {
        Self {
            total_tasks: raw.total_tasks,
            completed_tasks: raw.completed_tasks,
            pending_tasks: raw.pending_tasks,
            completion_percentage: raw.completion_percentage,
            average_completion_minutes: None,
            completed_today: None,
        }
    }
}

impl From<ProductivityAnalytics> for AnalyticsSummary {
    fn from(raw: ProductivityAnalytics) -> Self {
        Self {
            total_tasks: raw.tasks_created,
            completed_tasks: raw.tasks_completed,
            pending_tasks: raw.tasks_created.saturating_sub(raw.tasks_completed),
            completion_percentage: raw.completion_rate,
            average_completion_minutes: raw.average_completion_time_minutes,
            completed_today: raw.tasks_completed_today,
        }
    }
}

/// Timestamps arrive either as RFC 3339 or as naive ISO-8601 local times.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::Serializer;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.naive_local());
        }
        NaiveDateTime::parse_from_str(value, FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}
