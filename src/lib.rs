pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod ui;

pub use api::{HttpTaskApi, TaskApi};
pub use app::router;
pub use client::TaskListClient;
pub use config::Config;
pub use state::AppState;
