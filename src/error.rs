use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("usage: heapsched <config.toml>")]
    Usage,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid weight {weight} on edge {from} -> {to}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    #[error("internal error: {0}")]
    Internal(Box<anyhow::Error>),
}
