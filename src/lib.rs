mod error;
pub mod route;
pub mod scheduler;

pub use error::Error;
use route::RouteConfig;
use scheduler::TaskConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub route: Option<RouteConfig>,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,
    #[serde(default = "command_buffer_default")]
    pub command_buffer: usize,
}

fn command_buffer_default() -> usize {
    64
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        let mut config: Config = toml::from_str(contents)?;
        config.command_buffer = config.command_buffer.max(1);
        Ok(config)
    }
}
