use crate::{
  error::{Error, ErrorKind},
  schema::{Report, Status},
  util,
};
use std::{borrow::Cow, fmt, str::FromStr};

pub const ADDRESS_DISPLAY_LEN: usize = 40;
pub const DESCRIPTION_DISPLAY_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Only(Status),
}

impl StatusFilter {
  pub fn matches(self, report: &Report) -> bool {
    match self {
      StatusFilter::All => true,
      StatusFilter::Only(status) => report.status == status,
    }
  }
}

impl FromStr for StatusFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "" | "all" => Ok(StatusFilter::All),
      s => Status::from_str(s)
        .map(StatusFilter::Only)
        .map_err(|_| ErrorKind::InvalidRequest.into()),
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      StatusFilter::All => write!(f, "all"),
      StatusFilter::Only(status) => write!(f, "{}", status),
    }
  }
}

/// Reports matching `filter`, in seed order. Always evaluated against the full list.
pub fn filter(reports: &[Report], filter: StatusFilter) -> Vec<&Report> {
  reports.iter().filter(|report| filter.matches(report)).collect()
}

/// What a feed card shows for one report.
#[derive(Debug)]
pub struct FeedEntry<'a> {
  pub id: &'a str,
  pub image_url: &'a str,
  pub status: Status,
  pub title: &'a str,
  pub address: Cow<'a, str>,
  pub description: Cow<'a, str>,
  pub upvotes: u32,
  pub downvotes: u32,
  pub comments: usize,
  pub date: String,
}

impl<'a> From<&'a Report> for FeedEntry<'a> {
  fn from(report: &'a Report) -> Self {
    FeedEntry {
      id: &report.id,
      image_url: &report.image_url,
      status: report.status,
      title: &report.title,
      address: util::truncate(&report.location.address, ADDRESS_DISPLAY_LEN),
      description: util::truncate(&report.description, DESCRIPTION_DISPLAY_LEN),
      upvotes: report.upvotes,
      downvotes: report.downvotes,
      comments: report.comments.len(),
      date: util::format_short_date(&report.created_at),
    }
  }
}

pub fn entries(reports: &[Report], status: StatusFilter) -> Vec<FeedEntry> {
  filter(reports, status).into_iter().map(FeedEntry::from).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::Store;
  use strum::IntoEnumIterator;

  fn all_filters() -> Vec<StatusFilter> {
    std::iter::once(StatusFilter::All)
      .chain(Status::iter().map(StatusFilter::Only))
      .collect()
  }

  #[test]
  fn filter_matches_exactly() {
    let store = Store::seed().unwrap();
    for f in all_filters() {
      let ids: Vec<&str> = filter(store.reports(), f).iter().map(|r| r.id.as_str()).collect();
      let expected: Vec<&str> = store
        .reports()
        .iter()
        .filter(|r| match f {
          StatusFilter::All => true,
          StatusFilter::Only(status) => r.status == status,
        })
        .map(|r| r.id.as_str())
        .collect();
      assert_eq!(ids, expected, "filter {}", f);
    }
  }

  #[test]
  fn filter_by_seed_status() {
    let store = Store::seed().unwrap();
    let ids = |f| -> Vec<String> { filter(store.reports(), f).iter().map(|r| r.id.clone()).collect() };
    assert_eq!(ids(StatusFilter::All), vec!["1", "2", "3"]);
    assert_eq!(ids(StatusFilter::Only(Status::Reported)), vec!["1", "3"]);
    assert_eq!(ids(StatusFilter::Only(Status::InProgress)), vec!["2"]);
    assert!(ids(StatusFilter::Only(Status::Fixed)).is_empty());
  }

  #[test]
  fn filter_is_idempotent() {
    let store = Store::seed().unwrap();
    for f in all_filters() {
      let once = filter(store.reports(), f);
      let twice = filter(store.reports(), f);
      assert_eq!(once, twice);
    }
  }

  #[test]
  fn parses_filter_values() {
    assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    assert_eq!(
      "in_progress".parse::<StatusFilter>().unwrap(),
      StatusFilter::Only(Status::InProgress)
    );
    assert!("closed".parse::<StatusFilter>().is_err());
    for f in all_filters() {
      assert_eq!(f.to_string().parse::<StatusFilter>().unwrap(), f);
    }
  }

  #[test]
  fn entry_clips_display_fields_only() {
    let store = Store::seed().unwrap();
    let entry = FeedEntry::from(store.report("2").unwrap());
    assert_eq!(entry.comments, 1);
    assert_eq!(entry.date, "Sep 10, 2023");
    assert_eq!(entry.address, "546 Oak Ave, Anytown, USA");
    assert_eq!(entry.description, store.report("2").unwrap().description);

    let mut long = store.report("1").unwrap().clone();
    long.description = "pothole ".repeat(40);
    long.location.address = "Intersection of Very Long Boulevard and Another Street".into();
    let entry = FeedEntry::from(&long);
    assert_eq!(entry.description.chars().count(), DESCRIPTION_DISPLAY_LEN);
    assert!(entry.description.ends_with('…'));
    assert!(entry.address.chars().count() <= ADDRESS_DISPLAY_LEN + 1);
    assert_eq!(long.description.len(), 320);
  }
}
