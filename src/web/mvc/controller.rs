use super::mar_comment;
use crate::{
  create::{ImageUpload, ReportFields},
  detail::{self, Direction},
  error::{Error, ErrorKind, Result},
  notice::Notice,
  util::{self, json_path},
  web::{auth, Config, Store, Views},
};
use actix_session::Session;
use error_chain::bail;
use lazy_static::lazy_static;
use path_tree::PathTree;
use serde::Deserialize;
use serde_json::{from_value as from_json, json, Value as JsonValue};
use serde_repr::Serialize_repr;
use std::time::Duration;

#[repr(u8)]
#[derive(Serialize_repr, Debug, Clone, Copy, PartialEq, Eq)]
enum Opcode {
  Success = 0,
  //InternalError = 100,
  InvalidLogin = 101,
  //InvalidRequest = 102,
  AuthenticationRequired = 103,
  MissingField = 104,
}

pub async fn main(
  uri: String,
  mut post_data: JsonValue,
  config: Config,
  store: Store,
  views: Views,
  session: Session,
) -> Result<JsonValue> {
  // check csrf hash
  {
    if !util::check_csrf_hash(json_path::<String>(&mut post_data, "/csrf_h")?.as_str(), &config) {
      bail!(ErrorKind::InvalidRequest);
    }
  }

  lazy_static! {
    static ref PATH_TREE: PathTree::<&'static str> = {
      let mut tmp = PathTree::<&str>::new();
      for path in vec![
        "/auth/login",
        "/auth/signup",
        "/auth/logout",
        "/report/vote",
        "/report/comment",
        "/report/image",
        "/report/image/remove",
        "/report/submit",
      ] {
        tmp.insert(path, path);
      }
      tmp
    };
  };

  let ctr = Controller {
    config,
    store,
    views,
    session,
    post_data,
  };

  match PATH_TREE.find(uri.as_str()) {
    Some((path, _)) => match *path {
      "/auth/login" => ctr.auth_login().await,
      "/auth/signup" => ctr.auth_signup().await,
      "/auth/logout" => ctr.auth_logout().await,
      "/report/vote" => ctr.report_vote().await,
      "/report/comment" => ctr.report_comment().await,
      "/report/image" => ctr.report_image().await,
      "/report/image/remove" => ctr.report_image_remove().await,
      "/report/submit" => ctr.report_submit().await,
      _ => unreachable!(),
    },
    None => bail!(ErrorKind::RouteNotFound),
  }
}

struct Controller {
  config: Config,
  store: Store,
  views: Views,
  session: Session,
  post_data: JsonValue,
}

impl Controller {
  /// Notice shown after the client follows `redirect`.
  fn navigate(&self, notice: Notice, path: &str) -> Result<JsonValue> {
    auth::flash(&self.session, notice)?;
    Ok(json!({
      "result": Opcode::Success,
      "redirect": format!("{}{}", self.config.web.root_url, path)
    }))
  }

  fn require_user(&self) -> Result<()> {
    if auth::get_user(&self.store, &self.session)?.is_none() {
      bail!(ErrorKind::AuthenticationRequired);
    }
    Ok(())
  }

  ///auth/login
  async fn auth_login(mut self) -> Result<JsonValue> {
    #[derive(Deserialize)]
    struct Request {
      email: String,
      password: String,
    }
    let request: Request = from_json(self.post_data.take()).map_err(|_| ErrorKind::InvalidRequest)?;
    let result = auth::context(&self.store, &self.session)?.login(&request.email, &request.password);
    match result {
      Ok(notice) => self.navigate(notice, ""),
      Err(Error(ErrorKind::InvalidCredentials, _)) => Ok(json!({
        "result": Opcode::InvalidLogin,
        "notice": Notice::error("Login failed", "Invalid email or password")
      })),
      Err(e) => Err(e),
    }
  }

  ///auth/signup
  async fn auth_signup(mut self) -> Result<JsonValue> {
    #[derive(Deserialize)]
    struct Request {
      email: String,
      username: String,
      password: String,
    }
    let request: Request = from_json(self.post_data.take()).map_err(|_| ErrorKind::InvalidRequest)?;
    let notice = auth::context(&self.store, &self.session)?.signup(
      &request.email,
      &request.username,
      &request.password,
    )?;
    self.navigate(notice, "")
  }

  ///auth/logout
  async fn auth_logout(self) -> Result<JsonValue> {
    let notice = auth::context(&self.store, &self.session)?.logout();
    self.navigate(notice, "")
  }

  ///report/vote
  async fn report_vote(mut self) -> Result<JsonValue> {
    let view = json_path::<String>(&mut self.post_data, "/view")?;
    let direction = json_path::<Direction>(&mut self.post_data, "/direction")?;
    let authenticated = auth::get_user(&self.store, &self.session)?.is_some();

    let result = self.views.with_detail(&view, |view| {
      view.vote(authenticated, direction)?;
      Ok(view.loaded().map(|loaded| {
        (
          loaded.report.upvotes,
          loaded.report.downvotes,
          loaded.vote,
        )
      }))
    });
    match result {
      Ok(Some((upvotes, downvotes, vote))) => Ok(json!({
        "result": Opcode::Success,
        "upvotes": upvotes,
        "downvotes": downvotes,
        "vote": vote
      })),
      Ok(None) => Ok(json!({ "result": Opcode::Success })),
      Err(Error(ErrorKind::AuthenticationRequired, _)) => Ok(json!({
        "result": Opcode::AuthenticationRequired,
        "notice": detail::login_required_notice("vote on reports")
      })),
      Err(e) => Err(e),
    }
  }

  ///report/comment
  async fn report_comment(mut self) -> Result<JsonValue> {
    let view = json_path::<String>(&mut self.post_data, "/view")?;
    let content = json_path::<String>(&mut self.post_data, "/content")?;
    let user = auth::get_user(&self.store, &self.session)?;

    let result = self.views.with_detail(&view, |view| {
      let comment = view
        .comment(user.as_ref(), &content, chrono::Utc::now())?
        .map(|(comment, notice)| (mar_comment(comment).into_string(), notice));
      let count = view.loaded().map_or(0, |loaded| loaded.report.comments.len());
      Ok((comment, count))
    });
    match result {
      Ok((Some((html, notice)), count)) => Ok(json!({
        "result": Opcode::Success,
        "html": html,
        "count": count,
        "notice": notice
      })),
      Ok((None, count)) => Ok(json!({ "result": Opcode::Success, "count": count })),
      Err(Error(ErrorKind::AuthenticationRequired, _)) => Ok(json!({
        "result": Opcode::AuthenticationRequired,
        "notice": detail::login_required_notice("comment")
      })),
      Err(e) => Err(e),
    }
  }

  ///report/image
  async fn report_image(mut self) -> Result<JsonValue> {
    self.require_user()?;
    let view = json_path::<String>(&mut self.post_data, "/view")?;
    let name = json_path::<String>(&mut self.post_data, "/name")?;
    let data = json_path::<String>(&mut self.post_data, "/data")?;
    let image = ImageUpload::from_data_url(&name, &data)?;

    let preview = self.views.with_create(&view, |form| form.attach_image(image))?;
    Ok(json!({
      "result": Opcode::Success,
      "preview": preview
    }))
  }

  ///report/image/remove
  async fn report_image_remove(mut self) -> Result<JsonValue> {
    self.require_user()?;
    let view = json_path::<String>(&mut self.post_data, "/view")?;
    self.views.with_create(&view, |form| form.remove_image())?;
    Ok(json!({ "result": Opcode::Success }))
  }

  ///report/submit
  async fn report_submit(mut self) -> Result<JsonValue> {
    #[derive(Deserialize)]
    struct Request {
      view: String,
      title: String,
      description: String,
      address: String,
    }
    self.require_user()?;
    let request: Request = from_json(self.post_data.take()).map_err(|_| ErrorKind::InvalidRequest)?;
    let fields = ReportFields {
      title: request.title,
      description: request.description,
      address: request.address,
    };

    match self.views.with_create(&request.view, |form| form.begin_submit(fields)) {
      Ok(()) => (),
      Err(Error(ErrorKind::MissingField(field), _)) => {
        return Ok(json!({
          "result": Opcode::MissingField,
          "field": field.to_string(),
          "notice": field.notice()
        }))
      }
      Err(e) => return Err(e),
    }

    // simulated network latency; a client that goes away drops this future
    actix_rt::time::sleep(Duration::from_millis(self.config.web.submit_delay_ms)).await;

    let notice = self.views.with_create(&request.view, |form| form.finish_submit())?;
    self.views.close(&request.view)?;
    self.navigate(notice, "")
  }
}
