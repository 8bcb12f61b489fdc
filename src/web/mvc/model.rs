use crate::{
  create::CreateForm,
  detail::DetailView,
  error::Result,
  feed::{self, StatusFilter},
  notice::Notice,
  schema::User,
  util,
  views::ViewState,
  web::{auth, Config, Store, Views},
};
use actix_session::Session;
use maud::Markup;
use serde_json::json;

/// Everything a page render needs: shared state plus the session's user and notices.
pub struct Model {
  config: Config,
  store: Store,
  views: Views,
  pub root_url: String,
  pub user: Option<User>,
  pub notices: Vec<Notice>,
}

impl Model {
  pub fn new(config: Config, store: Store, views: Views, session: &Session) -> Result<Self> {
    let user = auth::get_user(&store, session)?;
    let notices = auth::take_notices(session);
    Ok(Model {
      root_url: config.web.root_url.clone(),
      config,
      store,
      views,
      user,
      notices,
    })
  }

  fn m_root(&self, title: &str, page: Markup) -> Result<Markup> {
    let csrf_h = util::gen_csrf_hash(util::get_timestamp(), &self.config);

    let js_glob = json!({
      "root_url": self.root_url,
      "rpc": format!("{}rpc/", self.root_url),
      "csrf_h": csrf_h,
    });

    self.v_root(title, page, js_glob)
  }

  pub fn m_feed(&self, status: Option<&str>) -> Result<Markup> {
    let status: StatusFilter = status.unwrap_or_default().parse()?;
    let entries = feed::entries(self.store.reports(), status);
    let page = self.v_feed(status, entries)?;
    self.m_root("Community Pothole Reports", page)
  }

  pub fn m_report(&self, id: &str) -> Result<Markup> {
    let view = DetailView::open(&self.store, id);
    let (title, page) = match view.loaded() {
      Some(loaded) => {
        let title = loaded.report.title.clone();
        let page = self.v_report(loaded)?;
        (title, page)
      }
      None => ("Report not found".to_string(), self.v_report_not_found()?),
    };
    // only a loaded report has state worth keeping
    let page = if view.loaded().is_some() {
      let token = self.views.open(ViewState::Detail(view))?;
      self.v_view_scope(&token, page)
    } else {
      page
    };
    self.m_root(&title, page)
  }

  /// Caller guarantees an authenticated user.
  pub fn m_report_new(&self) -> Result<Markup> {
    let token = self.views.open(ViewState::Create(CreateForm::default()))?;
    let page = self.v_view_scope(&token, self.v_report_new()?);
    self.m_root("Report a Pothole", page)
  }

  pub fn m_login(&self) -> Result<Markup> {
    self.m_root("Log in", self.v_login()?)
  }

  pub fn m_signup(&self) -> Result<Markup> {
    self.m_root("Sign up", self.v_signup()?)
  }

  pub fn m_not_found(&self) -> Result<Markup> {
    self.m_root("Page Not Found", self.v_not_found()?)
  }
}
