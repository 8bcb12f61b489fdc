use crate::{
  config::Config,
  error::{ErrorKind, Result},
};
use actix_web::{http::header, HttpResponse};
use chrono::{DateTime, Utc};
use hex_slice::AsHex;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use std::{borrow::Cow, time::SystemTime};

/// csrf hashes older than this are rejected
const CSRF_MAX_AGE: u64 = 86400; // 1 day

pub fn get_timestamp() -> u64 {
  SystemTime::now()
    .duration_since(SystemTime::UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or(0)
}

/// 64 hex chars of randomness, used for view tokens
pub fn gen_token() -> String {
  use rand::RngCore;

  let mut data = [0u8; 32];
  rand::thread_rng().fill_bytes(&mut data);
  format!("{:02x}", data.plain_hex(false))
}

pub fn gen_csrf_hash(timestamp: u64, config: &Config) -> String {
  format!(
    "{:x},{}",
    Sha256::digest(format!("{}{}", config.server.secret_key, timestamp).as_bytes()),
    timestamp
  )
}

pub fn check_csrf_hash(hash: &str, config: &Config) -> bool {
  let tokens: Vec<&str> = hash.split(',').collect();
  if tokens.len() != 2 {
    return false;
  }
  let timestamp = match tokens[1].parse::<u64>() {
    Ok(t) => t,
    Err(_) => return false,
  };
  let now = get_timestamp();
  gen_csrf_hash(timestamp, config) == hash && timestamp <= now && now - timestamp < CSRF_MAX_AGE
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> Cow<str> {
  match text.char_indices().nth(max_chars) {
    None => Cow::Borrowed(text),
    Some((idx, _)) => Cow::Owned(format!("{}…", text[..idx].trim_end())),
  }
}

/// `Sep 15, 2023`
pub fn format_short_date(datetime: &DateTime<Utc>) -> String {
  datetime.format("%b %-d, %Y").to_string()
}

/// `September 15, 2023 at 10:30 AM`
pub fn format_long_date(datetime: &DateTime<Utc>) -> String {
  datetime.format("%B %-d, %Y at %I:%M %p").to_string()
}

pub fn redirect(path: &str, config: &Config) -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((header::LOCATION, format!("{}{}", config.web.root_url, path)))
    .finish()
}

/// Takes the node at json pointer `path` out of `value` and deserializes it.
pub fn json_path<T: DeserializeOwned>(value: &mut JsonValue, path: &str) -> Result<T> {
  let node = value.pointer_mut(path).ok_or(ErrorKind::InvalidRequest)?.take();
  serde_json::from_value(node).map_err(|_| ErrorKind::InvalidRequest.into())
}
