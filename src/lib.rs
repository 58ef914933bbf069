pub mod chat_core;
pub mod config;
pub mod frontend;
mod server;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use server::{router, start_server};
