use crate::{
  error::{ErrorKind, Result},
  notice::Notice,
  schema::User,
  store::Store,
};
use error_chain::bail;
use rand::Rng;

/// Key of the durable slot holding the serialized current user.
pub const SESSION_KEY: &str = "currentUser";

const AVATAR_COUNT: u32 = 70;

/// String key-value storage that outlives a single request
/// (the cookie session in the server, a map in tests).
pub trait DurableSlot {
  fn read(&self, key: &str) -> Result<Option<String>>;
  fn write(&mut self, key: &str, value: String) -> Result<()>;
  fn erase(&mut self, key: &str);
}

/// Session state: the current user, if any, mirrored to a `DurableSlot`.
pub struct AuthContext<'a, S: DurableSlot> {
  store: &'a Store,
  slot: S,
  user: Option<User>,
}

impl<'a, S: DurableSlot> AuthContext<'a, S> {
  /// Restores the user from the slot. A corrupt value counts as no user.
  pub fn init(store: &'a Store, mut slot: S) -> Result<Self> {
    let user = match slot.read(SESSION_KEY)? {
      Some(stored) => match serde_json::from_str::<User>(&stored) {
        Ok(user) => Some(user),
        Err(e) => {
          log::warn!("discarding corrupt session slot: {}", e);
          slot.erase(SESSION_KEY);
          None
        }
      },
      None => None,
    };
    Ok(AuthContext { store, slot, user })
  }

  pub fn user(&self) -> Option<&User> {
    self.user.as_ref()
  }

  pub fn is_authenticated(&self) -> bool {
    self.user.is_some()
  }

  /// Password is accepted but not verified.
  pub fn login(&mut self, email: &str, _password: &str) -> Result<Notice> {
    let user = match self.store.user_by_email(email) {
      Some(user) => user.clone(),
      None => bail!(ErrorKind::InvalidCredentials),
    };
    log::info!("login: user {} ({})", user.id, user.email);
    let notice = Notice::info(
      "Login successful",
      format!("Welcome back, {}!", user.username),
    );
    self.set_user(user)?;
    Ok(notice)
  }

  /// Always succeeds, duplicates included. The new user is not added to the store.
  pub fn signup(&mut self, email: &str, username: &str, _password: &str) -> Result<Notice> {
    let avatar = rand::thread_rng().gen_range(0..AVATAR_COUNT);
    let user = User {
      id: self.store.next_user_id(),
      email: email.to_string(),
      username: username.to_string(),
      avatar_url: Some(format!("https://i.pravatar.cc/150?img={}", avatar)),
    };
    log::info!("signup: user {} ({})", user.id, user.email);
    self.set_user(user)?;
    Ok(Notice::info("Account created", format!("Welcome, {}!", username)))
  }

  pub fn logout(&mut self) -> Notice {
    if let Some(user) = self.user.take() {
      log::info!("logout: user {}", user.id);
    }
    self.slot.erase(SESSION_KEY);
    Notice::info("Logged out", "You have been successfully logged out.")
  }

  pub fn dispose(self) -> S {
    self.slot
  }

  fn set_user(&mut self, user: User) -> Result<()> {
    self.slot.write(SESSION_KEY, serde_json::to_string(&user)?)?;
    self.user = Some(user);
    Ok(())
  }
}
