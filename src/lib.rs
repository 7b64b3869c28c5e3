pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod server;
pub mod state;
pub mod static_files;

pub use server::app;
pub use state::AppState;
