pub mod app;
pub mod client;
pub mod components;
pub mod controller;
pub mod server_liveview;
pub mod types;
pub mod view;

pub use client::{ChatBackend, ChatError, HttpBackend};
pub use controller::ChatController;
