use crate::{
  config,
  error::Result,
  feed::{self, StatusFilter},
  store::Store,
};
use clap::{clap_app, ArgMatches};
use std::process::exit;

pub fn matches() -> ArgMatches<'static> {
  clap_app!(potholefix =>
    (@arg config: -c --config +takes_value +global "config file")
    (@subcommand users => )
    (@subcommand reports =>
      (@arg status: -s --status +takes_value)
    )
  )
  .help(
    r#"USAGE (cli): [-c <config>] <command> <opts>

Commands:
(none)            start the web server
users             list seed users, for demo login
reports           list the report feed
  -s, --status      reported | in_progress | fixed | all

-c, --config      config file (default: data/config.toml)
"#,
  )
  .get_matches()
}

pub fn config_path<'a>(matches: &'a ArgMatches) -> &'a str {
  matches.value_of("config").unwrap_or(config::DEFAULT_PATH)
}

/// Runs a one-shot command and exits. Returns when the server should start.
pub fn load(matches: &ArgMatches, store: &Store) -> Result<()> {
  match matches.subcommand() {
    /*** users ***/
    ("users", Some(_)) => {
      print!("{}", users(store));
      exit(0);
    }

    /*** reports ***/
    ("reports", Some(command)) => {
      let status: StatusFilter = command.value_of("status").unwrap_or_default().parse()?;
      print!("{}", reports(store, status));
      exit(0);
    }

    _ => (),
  };
  Ok(())
}

fn users(store: &Store) -> String {
  store
    .users()
    .iter()
    .map(|user| format!("{}\t{}\t{}\n", user.id, user.email, user.username))
    .collect()
}

fn reports(store: &Store, status: StatusFilter) -> String {
  feed::entries(store.reports(), status)
    .iter()
    .map(|entry| {
      format!(
        "{}\t{}\t{}\t▲{} ▼{}\t{}\n",
        entry.id,
        entry.status.label(),
        entry.title,
        entry.upvotes,
        entry.downvotes,
        entry.address
      )
    })
    .collect()
}
