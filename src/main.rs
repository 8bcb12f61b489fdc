mod auth;
mod cli;
mod config;
mod create;
mod detail;
mod error;
mod feed;
mod notice;
mod schema;
mod store;
mod util;
mod views;
mod web;

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  if let Err(e) = (|| -> error::Result<_> {
    let matches = cli::matches();
    let config = config::load(cli::config_path(&matches))?;
    let store = store::Store::seed()?;

    cli::load(&matches, &store)?;

    log::info!(
      "loaded {} users and {} reports",
      store.users().len(),
      store.reports().len()
    );
    web::init(config, store)?;

    Ok(())
  })() {
    error::display(&e);
    std::process::exit(1);
  }
}
