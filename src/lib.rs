pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod mutations;
pub mod state;
pub mod summary;
pub mod ui;
pub mod view;

pub use api::{HttpApi, RemoteApi};
pub use app::router;
pub use cache::{QueryCache, QueryKey};
pub use config::Config;
pub use state::AppState;
