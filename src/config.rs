use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3030";
const DEFAULT_DATABASE_URL: &str = "appointments.db";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    /// host:port browsers use to reach this server.
    pub reachable_addr: String,
    /// Backend endpoint the chat widget posts to.
    pub chat_endpoint: String,
    pub database_url: String,
    pub openai_model: String,
}

impl Settings {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Settings> {
        dotenv().ok();
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let listen = var("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen
            .parse::<SocketAddr>()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {listen}"))?;
        let reachable_addr = var("REACHABLE_ADDR").unwrap_or(listen);
        let chat_endpoint =
            var("CHAT_ENDPOINT").unwrap_or_else(|| format!("http://{reachable_addr}/chat"));

        Ok(Settings {
            listen_addr,
            reachable_addr,
            chat_endpoint,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        })
    }
}
