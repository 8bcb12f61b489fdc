use crate::{config, error, store, util, views};
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
  cookie::Key, get, http::Method, middleware, post, web, App, HttpRequest, HttpResponse, HttpServer, Result,
};
use maud::Markup;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha512};

pub mod auth;
mod mvc;

pub type Config = web::Data<config::Config>;
pub type Store = web::Data<store::Store>;
pub type Views = web::Data<views::ViewRegistry>;

fn page(markup: Markup) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/html; charset=utf-8")
    .body(markup.into_string())
}

#[derive(Deserialize)]
struct FeedQuery {
  status: Option<String>,
}

#[get("/")]
async fn sv_feed(
  query: web::Query<FeedQuery>,
  config: Config,
  store: Store,
  views: Views,
  session: Session,
) -> Result<HttpResponse, error::Error> {
  let t0 = std::time::Instant::now();
  let res = mvc::Model::new(config, store, views, &session)?.m_feed(query.status.as_deref())?;
  log::debug!("profiling: {:?}", t0.elapsed());
  Ok(page(res))
}

#[get("/report/new")]
async fn sv_report_new(config: Config, store: Store, views: Views, session: Session) -> Result<HttpResponse, error::Error> {
  if auth::get_user(&store, &session)?.is_none() {
    auth::flash(&session, crate::create::login_required_notice())?;
    return Ok(util::redirect("login", &config));
  }
  let res = mvc::Model::new(config, store, views, &session)?.m_report_new()?;
  Ok(page(res))
}

#[get("/report/{id}")]
async fn sv_report(
  id: web::Path<String>,
  config: Config,
  store: Store,
  views: Views,
  session: Session,
) -> Result<HttpResponse, error::Error> {
  let t0 = std::time::Instant::now();
  let res = mvc::Model::new(config, store, views, &session)?.m_report(&id)?;
  log::debug!("profiling: {:?}", t0.elapsed());
  Ok(page(res))
}

#[get("/login")]
async fn sv_login(config: Config, store: Store, views: Views, session: Session) -> Result<HttpResponse, error::Error> {
  if auth::get_user(&store, &session)?.is_some() {
    return Ok(util::redirect("", &config));
  }
  Ok(page(mvc::Model::new(config, store, views, &session)?.m_login()?))
}

#[get("/signup")]
async fn sv_signup(config: Config, store: Store, views: Views, session: Session) -> Result<HttpResponse, error::Error> {
  if auth::get_user(&store, &session)?.is_some() {
    return Ok(util::redirect("", &config));
  }
  Ok(page(mvc::Model::new(config, store, views, &session)?.m_signup()?))
}

#[post("/rpc/{uri:.+}")]
async fn sv_rpc(
  uri: web::Path<String>,
  payload: web::Bytes,
  config: Config,
  store: Store,
  views: Views,
  session: Session,
) -> Result<HttpResponse, error::Error> {
  let t0 = std::time::Instant::now();
  let uri = format!("/{}", uri.trim_matches('/'));

  // parse into untyped
  let post_data = serde_json::from_slice::<JsonValue>(&payload).map_err(|_| error::ErrorKind::InvalidRequest)?;

  let res = mvc::controller(uri, post_data, config, store, views, session)
    .await
    .map(|res| HttpResponse::Ok().json(res));

  log::debug!("profiling: {:?}", t0.elapsed());
  res
}

/// Catch-all: 404 page for unmatched GETs, 405 for everything else.
async fn sv_not_found(
  req: HttpRequest,
  config: Config,
  store: Store,
  views: Views,
  session: Session,
) -> Result<HttpResponse, error::Error> {
  if *req.method() != Method::GET {
    return Ok(HttpResponse::MethodNotAllowed().finish());
  }
  log::error!("404 Error: User attempted to access non-existent route: {}", req.path());
  let res = mvc::Model::new(config, store, views, &session)?.m_not_found()?;
  Ok(
    HttpResponse::NotFound()
      .content_type("text/html; charset=utf-8")
      .body(res.into_string()),
  )
}

pub fn session_middleware(config: &config::Config) -> SessionMiddleware<CookieSessionStore> {
  // cookie keys need 64 bytes, whatever the configured secret length
  let key = Key::from(Sha512::digest(config.server.secret_key.as_bytes()).as_slice());
  SessionMiddleware::builder(CookieSessionStore::default(), key)
    .cookie_secure(false)
    .build()
}

pub fn routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(sv_feed)
    .service(sv_report_new)
    .service(sv_report)
    .service(sv_login)
    .service(sv_signup)
    .service(sv_rpc)
    .service(actix_files::Files::new("/static", "./data/static"))
    .default_service(web::to(sv_not_found));
}

#[actix_rt::main]
pub async fn init(config: config::Config, store: store::Store) -> error::Result<()> {
  let views = web::Data::new(views::ViewRegistry::new(config.web.view_ttl));
  let store = web::Data::new(store);
  let bind_addr = config.server.bind_addr.clone();

  let server = HttpServer::new({
    let config = config.clone();
    move || {
      App::new()
        .app_data(web::Data::new(config.clone()))
        .app_data(store.clone())
        .app_data(views.clone())
        .app_data(web::PayloadConfig::new(config.web.max_payload))
        .wrap(session_middleware(&config))
        .wrap(middleware::Logger::default())
        .configure(routes)
    }
  });

  log::info!("listening on {}", bind_addr);
  if let Some(path) = bind_addr.strip_prefix("unix:") {
    #[cfg(unix)]
    {
      server.bind_uds(path)?.run().await?;
    }
    #[cfg(not(unix))]
    {
      error_chain::bail!("Unix sockets are not available for this target: {}", path);
    }
  } else {
    server.bind(bind_addr)?.run().await?;
  }
  Ok(())
}
