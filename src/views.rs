use crate::{
  create::CreateForm,
  detail::DetailView,
  error::{ErrorKind, Result},
  util,
};
use error_chain::bail;
use std::{collections::HashMap, sync::Mutex};

/// Transient state of one rendered page.
#[derive(Debug)]
pub enum ViewState {
  Detail(DetailView),
  Create(CreateForm),
}

struct Entry {
  expires: u64,
  state: ViewState,
}

/// Page state keyed by view token. A reload renders a new token, so state
/// never survives navigation.
pub struct ViewRegistry {
  ttl: u64,
  entries: Mutex<HashMap<String, Entry>>,
}

impl ViewRegistry {
  pub fn new(ttl: u64) -> Self {
    ViewRegistry {
      ttl,
      entries: Mutex::new(HashMap::new()),
    }
  }

  /// Registers `state` under a fresh token, dropping expired views.
  pub fn open(&self, state: ViewState) -> Result<String> {
    let now = util::get_timestamp();
    let token = util::gen_token();
    let mut entries = self.lock()?;
    entries.retain(|_, entry| entry.expires > now);
    entries.insert(
      token.clone(),
      Entry {
        expires: now + self.ttl,
        state,
      },
    );
    Ok(token)
  }

  pub fn with_detail<T>(&self, token: &str, f: impl FnOnce(&mut DetailView) -> Result<T>) -> Result<T> {
    self.with(token, |state| match state {
      ViewState::Detail(view) => f(view),
      _ => bail!(ErrorKind::InvalidRequest),
    })
  }

  pub fn with_create<T>(&self, token: &str, f: impl FnOnce(&mut CreateForm) -> Result<T>) -> Result<T> {
    self.with(token, |state| match state {
      ViewState::Create(form) => f(form),
      _ => bail!(ErrorKind::InvalidRequest),
    })
  }

  pub fn close(&self, token: &str) -> Result<Option<ViewState>> {
    Ok(self.lock()?.remove(token).map(|entry| entry.state))
  }

  pub fn len(&self) -> Result<usize> {
    Ok(self.lock()?.len())
  }

  fn with<T>(&self, token: &str, f: impl FnOnce(&mut ViewState) -> Result<T>) -> Result<T> {
    let now = util::get_timestamp();
    let mut entries = self.lock()?;
    match entries.get_mut(token) {
      Some(entry) if entry.expires > now => f(&mut entry.state),
      _ => bail!(ErrorKind::ViewExpired),
    }
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<HashMap<String, Entry>>> {
    self.entries.lock().map_err(|_| "view registry poisoned".into())
  }
}
