use crate::{
  auth::{AuthContext, DurableSlot},
  error::{Error, Result},
  notice::Notice,
  schema::User,
  store::Store,
};
use actix_session::Session;

const NOTICES_KEY: &str = "notices";
/// Flashed notices kept until the next page render; older ones are dropped.
pub const MAX_NOTICES: usize = 3;

/// The signed cookie session acting as the durable slot.
pub struct SessionSlot(pub Session);

impl DurableSlot for SessionSlot {
  fn read(&self, key: &str) -> Result<Option<String>> {
    // actix-session json-encodes values; anything else is handed on raw
    Ok(
      self
        .0
        .entries()
        .get(key)
        .map(|raw| serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.clone())),
    )
  }

  fn write(&mut self, key: &str, value: String) -> Result<()> {
    self
      .0
      .insert(key, value)
      .map_err(|e| Error::from(format!("unable to set cookie: {}", e)))
  }

  fn erase(&mut self, key: &str) {
    self.0.remove(key);
  }
}

pub fn context<'a>(store: &'a Store, session: &Session) -> Result<AuthContext<'a, SessionSlot>> {
  AuthContext::init(store, SessionSlot(session.clone()))
}

pub fn get_user(store: &Store, session: &Session) -> Result<Option<User>> {
  Ok(context(store, session)?.user().cloned())
}

/// Queues `notice` for the next rendered page.
pub fn flash(session: &Session, notice: Notice) -> Result<()> {
  let mut notices = session.get::<Vec<Notice>>(NOTICES_KEY).ok().flatten().unwrap_or_default();
  notices.push(notice);
  let excess = notices.len().saturating_sub(MAX_NOTICES);
  notices.drain(..excess);
  session
    .insert(NOTICES_KEY, notices)
    .map_err(|e| Error::from(format!("unable to set cookie: {}", e)))
}

pub fn take_notices(session: &Session) -> Vec<Notice> {
  let notices = session.get::<Vec<Notice>>(NOTICES_KEY).ok().flatten().unwrap_or_default();
  if !notices.is_empty() {
    session.remove(NOTICES_KEY);
  }
  notices
}
