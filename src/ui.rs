use crate::client::{Notice, ViewState};
use crate::models::{AnalyticsSummary, StatusFilter, Task};
use chrono::NaiveDateTime;
use std::fmt::Write;

pub fn render_index(state: &ViewState) -> String {
    let notices = render_notices(&state.notices);
    let analytics = render_analytics(state.analytics.as_ref());
    let options = render_filter_options(state.filter);
    let title = escape_html(&state.inputs.title);
    let description = escape_html(&state.inputs.description);
    let confirm = render_confirm(state);
    let tasks = render_tasks(state);
    fill(
        INDEX_HTML,
        &[
            ("NOTICES", notices.as_str()),
            ("ANALYTICS", analytics.as_str()),
            ("FILTER", state.filter.as_str()),
            ("FILTER_OPTIONS", options.as_str()),
            ("TITLE", title.as_str()),
            ("DESCRIPTION", description.as_str()),
            ("CONFIRM", confirm.as_str()),
            ("TASKS", tasks.as_str()),
        ],
    )
}

/// Escapes text for element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `May 1, 2024`
pub fn format_date(value: &NaiveDateTime) -> String {
    value.format("%b %-d, %Y").to_string()
}

pub fn render_tasks(state: &ViewState) -> String {
    let filter = state.filter.as_str();
    let mut out = String::new();

    if let Some(message) = &state.list_error {
        let class = if state.tasks.is_some() { "list-error" } else { "empty-message error" };
        let _ = write!(out, r#"<div class="{class}" role="alert"><p>{}</p></div>"#, escape_html(message));
    }

    match state.tasks.as_deref() {
        None => {}
        Some([]) => out.push_str(
            r#"<div class="empty-message"><p>No tasks found. Create your first task to get started!</p></div>"#,
        ),
        Some(tasks) => {
            out.push_str(r#"<ul class="task-list">"#);
            for task in tasks {
                render_task(&mut out, task, filter);
            }
            out.push_str("</ul>");
        }
    }
    out
}

fn render_task(out: &mut String, task: &Task, filter: &str) {
    let id = escape_html(task.id.as_str());
    let status = task.status.as_str();
    let description = escape_html(task.description_text().unwrap_or("No description"));
    let (complete_attrs, complete_label) = if task.is_completed() {
        (r#" disabled aria-disabled="true""#, "Completed")
    } else {
        ("", "Mark Complete")
    };

    let _ = write!(
        out,
        r#"
<li class="task-item {status}" data-task-id="{id}">
  <h3 class="task-title">{title}</h3>
  <p class="task-description">{description}</p>
  <div class="task-meta">
    <span class="task-date">{date}</span>
    <span class="status {status}">{status}</span>
  </div>
  <div class="task-actions">
    <form method="post" action="/tasks/complete">
      <input type="hidden" name="id" value="{id}" />
      <input type="hidden" name="status" value="{filter}" />
      <button class="btn success-btn complete-btn" type="submit" data-task-id="{id}"{complete_attrs}>{complete_label}</button>
    </form>
    <form method="post" action="/tasks/delete">
      <input type="hidden" name="id" value="{id}" />
      <input type="hidden" name="status" value="{filter}" />
      <button class="btn danger-btn delete-btn" type="submit" data-task-id="{id}">Delete</button>
    </form>
  </div>
</li>"#,
        title = escape_html(&task.title),
        date = task
            .created_at
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "Unknown date".to_string()),
    );
}

fn render_confirm(state: &ViewState) -> String {
    let Some(id) = &state.pending_delete else {
        return String::new();
    };
    let filter = state.filter.as_str();
    let title = state
        .find_task(id)
        .map(|task| task.title.as_str())
        .unwrap_or(id.as_str());
    format!(
        r#"<div class="confirm" role="alertdialog" data-task-id="{id}">
  <p>Are you sure you want to delete &ldquo;{title}&rdquo;?</p>
  <form method="post" action="/tasks/delete">
    <input type="hidden" name="id" value="{id}" />
    <input type="hidden" name="status" value="{filter}" />
    <input type="hidden" name="confirm" value="yes" />
    <button class="btn danger-btn" type="submit">Delete</button>
    <a class="btn" href="/?status={filter}">Cancel</a>
  </form>
</div>"#,
        id = escape_html(id.as_str()),
        title = escape_html(title),
    )
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            format!(
                r#"<div class="notice {kind}" role="status"><span>{message}</span><button class="notice-dismiss" type="button" data-dismiss="notice" aria-label="Dismiss">&times;</button></div>"#,
                kind = notice.kind.as_str(),
                message = escape_html(&notice.message),
            )
        })
        .collect()
}

fn render_analytics(summary: Option<&AnalyticsSummary>) -> String {
    let mut stats = vec![
        ("Total tasks", "total-tasks", summary.map(|s| s.total_tasks.to_string())),
        ("Completed", "completed-tasks", summary.map(|s| s.completed_tasks.to_string())),
        ("Pending", "pending-tasks", summary.map(|s| s.pending_tasks.to_string())),
        (
            "Completion",
            "completion-percentage",
            summary.map(|s| format!("{}%", format_metric(s.completion_percentage, 1))),
        ),
    ];
    if let Some(minutes) = summary.and_then(|s| s.average_completion_minutes) {
        stats.push(("Avg. completion", "average-completion", Some(format!("{} min", format_metric(minutes, 1)))));
    }
    if let Some(today) = summary.and_then(|s| s.completed_today) {
        stats.push(("Completed today", "completed-today", Some(today.to_string())));
    }

    stats
        .into_iter()
        .map(|(label, id, value)| {
            format!(
                r#"<div class="stat"><span class="label">{label}</span><span id="{id}" class="value">{}</span></div>"#,
                value.unwrap_or_else(|| "--".to_string())
            )
        })
        .collect()
}

fn render_filter_options(selected: StatusFilter) -> String {
    StatusFilter::ALL
        .iter()
        .map(|filter| {
            let marker = if *filter == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{marker}>{}</option>"#, filter.as_str(), filter.label())
        })
        .collect()
}

/// Rounds to `decimals` places and drops a trailing `.0`.
fn format_metric(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let formatted = format!("{value:.decimals$}");
    match formatted.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|ch| ch == '0') => whole.to_string(),
        _ => formatted,
    }
}

/// Single-pass `{{KEY}}` substitution, so inserted values are never rescanned.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>TaskHub</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #22252b;
      --muted: #6b6f78;
      --accent: #4a6cff;
      --success: #34a853;
      --danger: #ea4335;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(34, 37, 43, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 12px;
    }

    .stat {
      border: 1px solid rgba(34, 37, 43, 0.08);
      border-radius: 14px;
      padding: 14px;
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent);
    }

    form.create {
      display: grid;
      gap: 10px;
    }

    input[type="text"],
    textarea,
    select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid rgba(34, 37, 43, 0.2);
    }

    .btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      text-decoration: none;
    }

    .btn[disabled] {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .success-btn {
      background: var(--success);
    }

    .danger-btn {
      background: var(--danger);
    }

    .filter {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .task-list {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    .task-item {
      border: 1px solid rgba(34, 37, 43, 0.08);
      border-radius: 14px;
      padding: 16px;
      display: grid;
      gap: 8px;
    }

    .task-item.completed .task-title {
      text-decoration: line-through;
      color: var(--muted);
    }

    .task-title,
    .task-description {
      margin: 0;
    }

    .task-meta,
    .task-actions {
      display: flex;
      gap: 10px;
      align-items: center;
      flex-wrap: wrap;
    }

    .task-date {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .status {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.8rem;
      text-transform: uppercase;
    }

    .status.pending {
      background: rgba(74, 108, 255, 0.12);
      color: var(--accent);
    }

    .status.completed {
      background: rgba(52, 168, 83, 0.14);
      color: var(--success);
    }

    .empty-message {
      color: var(--muted);
      text-align: center;
    }

    .empty-message.error,
    .list-error {
      color: var(--danger);
    }

    .notices {
      display: grid;
      gap: 8px;
    }

    .notice {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 10px;
      padding: 12px 16px;
      border-radius: 10px;
      color: white;
    }

    .notice.success {
      background: var(--success);
    }

    .notice.error {
      background: var(--danger);
    }

    .notice-dismiss {
      background: transparent;
      border: none;
      color: inherit;
      font-size: 1.2rem;
      cursor: pointer;
    }

    .confirm {
      border: 1px solid var(--danger);
      border-radius: 14px;
      padding: 16px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>TaskHub</h1>
      <p class="subtitle">Track what needs doing and what got done.</p>
    </header>

    <section class="notices" id="notices">{{NOTICES}}</section>

    <section class="card">
      <h2>Productivity</h2>
      <div class="panel" id="analytics">{{ANALYTICS}}</div>
    </section>

    <section class="card">
      <h2>New task</h2>
      <form class="create" id="task-form" method="post" action="/tasks">
        <input type="hidden" name="status" value="{{FILTER}}" />
        <input type="text" id="title" name="title" placeholder="Task title" value="{{TITLE}}" />
        <textarea id="description" name="description" rows="3" placeholder="Description (optional)">{{DESCRIPTION}}</textarea>
        <button class="btn" type="submit">Add task</button>
      </form>
    </section>

    <section class="card">
      <div class="filter">
        <h2>Tasks</h2>
        <form method="get" action="/">
          <select id="status-filter" name="status" data-auto-submit>{{FILTER_OPTIONS}}</select>
          <button class="btn" type="submit">Apply</button>
        </form>
      </div>
      {{CONFIRM}}
      <div id="tasks-container">{{TASKS}}</div>
    </section>
  </main>

  <script>
    document.addEventListener('change', (event) => {
      const target = event.target;
      if (target.matches('[data-auto-submit]') && target.form) {
        target.form.requestSubmit();
      }
    });

    document.addEventListener('click', (event) => {
      const button = event.target.closest('[data-dismiss="notice"]');
      if (button) {
        button.closest('.notice').remove();
      }
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Notice, TaskInputs};
    use crate::models::{Task, TaskId, TaskStatus};

    fn task(id: &str, title: &str, status: &str) -> Task {
        let completed_at = (status == "completed").then_some("2024-05-02T09:00:00");
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "status": status,
            "created_at": "2024-05-01T09:00:00",
            "completed_at": completed_at,
        }))
        .unwrap()
    }

    fn items(html: &str) -> Vec<&str> {
        html.split(r#"<li class="task-item"#).skip(1).collect()
    }

    fn complete_button(item: &str) -> &str {
        let start = item.find("complete-btn").unwrap();
        let end = start + item[start..].find('>').unwrap();
        &item[start..end]
    }

    #[test]
    fn renders_one_item_per_task_in_order() {
        let state = ViewState {
            tasks: Some(vec![task("1", "A", "pending"), task("2", "B", "completed")]),
            ..ViewState::default()
        };

        let html = render_tasks(&state);
        let items = items(&html);

        assert_eq!(items.len(), 2);
        assert!(items[0].contains(r#"data-task-id="1""#));
        assert!(items[0].contains("<h3 class=\"task-title\">A</h3>"));
        assert!(items[1].contains(r#"data-task-id="2""#));
        assert!(!complete_button(items[0]).contains("disabled"));
        assert!(complete_button(items[1]).contains("disabled"));
    }

    #[test]
    fn renders_minimal_list_without_timestamps() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{"id":"1","title":"A","status":"pending"},{"id":"2","title":"B","status":"completed"}]"#,
        )
        .unwrap();
        let state = ViewState {
            tasks: Some(tasks),
            ..ViewState::default()
        };

        let html = render_tasks(&state);
        let items = items(&html);

        assert_eq!(items.len(), 2);
        assert!(items[0].contains(r#"<span class="task-date">Unknown date</span>"#));
        assert!(!complete_button(items[0]).contains("disabled"));
        assert!(complete_button(items[1]).contains("disabled"));
    }

    #[test]
    fn nothing_is_rendered_before_the_first_fetch() {
        assert_eq!(render_tasks(&ViewState::default()), "");
    }

    #[test]
    fn completed_tasks_never_get_an_enabled_complete_control() {
        let tasks: Vec<Task> = (0..5)
            .map(|n| task(&n.to_string(), "done", "completed"))
            .collect();
        let state = ViewState {
            tasks: Some(tasks),
            ..ViewState::default()
        };

        let html = render_tasks(&state);
        for item in items(&html) {
            assert!(complete_button(item).contains("disabled"));
        }
    }

    #[test]
    fn escapes_user_text() {
        let mut hostile = task("x\"1", "<script>alert('x')</script>", "pending");
        hostile.description = Some("Tom & \"Jerry\"".to_string());
        let state = ViewState {
            tasks: Some(vec![hostile]),
            inputs: TaskInputs {
                title: "<b>draft</b>".to_string(),
                description: "{{TASKS}}".to_string(),
            },
            ..ViewState::default()
        };

        let html = render_index(&state);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; &quot;Jerry&quot;"));
        assert!(html.contains(r#"data-task-id="x&quot;1""#));
        assert!(html.contains(r#"value="&lt;b&gt;draft&lt;/b&gt;""#));
        assert!(html.contains(">{{TASKS}}</textarea>"));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn shows_description_fallback_and_date() {
        let state = ViewState {
            tasks: Some(vec![task("1", "A", "pending")]),
            ..ViewState::default()
        };
        let html = render_tasks(&state);
        assert!(html.contains("No description"));
        assert!(html.contains("May 1, 2024"));
    }

    #[test]
    fn list_error_without_tasks_shows_error_state() {
        let state = ViewState {
            list_error: Some("Failed to load tasks. Please try again later.".to_string()),
            ..ViewState::default()
        };
        let html = render_tasks(&state);
        assert!(html.contains(r#"class="empty-message error""#));
        assert!(items(&html).is_empty());
    }

    #[test]
    fn list_error_keeps_stale_tasks_visible() {
        let state = ViewState {
            tasks: Some(vec![task("1", "A", "pending")]),
            list_error: Some("Failed to load tasks. Please try again later.".to_string()),
            ..ViewState::default()
        };
        let html = render_tasks(&state);
        assert!(html.contains(r#"class="list-error""#));
        assert_eq!(items(&html).len(), 1);
    }

    #[test]
    fn empty_list_shows_empty_state() {
        let state = ViewState {
            tasks: Some(Vec::new()),
            ..ViewState::default()
        };
        assert!(render_tasks(&state).contains("No tasks found"));
    }

    #[test]
    fn renders_selected_filter_and_notices() {
        let state = ViewState {
            filter: StatusFilter::Completed,
            notices: vec![Notice::error("Failed to create task. Please try again.")],
            ..ViewState::default()
        };
        let html = render_index(&state);
        assert!(html.contains(r#"<option value="completed" selected>"#));
        assert!(html.contains(r#"<div class="notice error""#));
        assert!(html.contains(r#"data-dismiss="notice""#));
    }

    #[test]
    fn renders_confirmation_prompt_for_pending_delete() {
        let state = ViewState {
            tasks: Some(vec![task("7", "Old chores", "pending")]),
            pending_delete: Some(TaskId::new("7")),
            ..ViewState::default()
        };
        let html = render_index(&state);
        assert!(html.contains("delete &ldquo;Old chores&rdquo;?"));
        assert!(html.contains(r#"name="confirm" value="yes""#));
    }

    #[test]
    fn renders_analytics_placeholders_and_values() {
        assert!(render_analytics(None).contains(r#"<span id="total-tasks" class="value">--</span>"#));

        let summary = AnalyticsSummary {
            total_tasks: 4,
            completed_tasks: 1,
            pending_tasks: 3,
            completion_percentage: 25.0,
            average_completion_minutes: Some(12.34),
            completed_today: Some(1),
        };
        let html = render_analytics(Some(&summary));
        assert!(html.contains(r#"<span id="completion-percentage" class="value">25%</span>"#));
        assert!(html.contains(r#"<span id="average-completion" class="value">12.3 min</span>"#));
        assert!(html.contains(r#"<span id="completed-today" class="value">1</span>"#));
    }

    #[test]
    fn status_text_matches_task_status() {
        let pending = task("1", "A", "pending");
        assert_eq!(pending.status, TaskStatus::Pending);
        let state = ViewState {
            tasks: Some(vec![pending]),
            ..ViewState::default()
        };
        assert!(render_tasks(&state).contains(r#"<span class="status pending">pending</span>"#));
    }
}
