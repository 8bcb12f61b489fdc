use crate::error::{Result, ResultExt};
use serde::Deserialize;

pub const DEFAULT_PATH: &str = "data/config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub bind_addr: String,
  pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
  pub root_url: String,
  #[serde(default = "default_submit_delay_ms")]
  pub submit_delay_ms: u64,
  /// seconds a rendered view keeps its transient state
  #[serde(default = "default_view_ttl")]
  pub view_ttl: u64,
  #[serde(default = "default_max_payload")]
  pub max_payload: usize,
}

fn default_submit_delay_ms() -> u64 {
  1500
}

fn default_view_ttl() -> u64 {
  3600
}

fn default_max_payload() -> usize {
  8 * 1024 * 1024
}

pub fn load(path: &str) -> Result<Config> {
  let file = std::fs::read_to_string(path).chain_err(|| format!("Unable to load \"{}\"", path))?;
  parse(&file).chain_err(|| format!("Unable to parse \"{}\"", path))
}

pub fn parse(file: &str) -> Result<Config> {
  Ok(toml::from_str(file)?)
}
