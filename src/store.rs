use crate::{
  error::{Result, ResultExt},
  schema::{Comment, Location, Report, Status, User},
};
use chrono::{DateTime, Utc};
use error_chain::bail;
use serde::Deserialize;
use std::{
  collections::HashSet,
  sync::atomic::{AtomicUsize, Ordering},
};

const SEED: &str = include_str!("../data/seed.json");

/// The in-memory "database": seed users and reports, read-only once loaded.
#[derive(Debug)]
pub struct Store {
  users: Vec<User>,
  reports: Vec<Report>,
  next_user_id: AtomicUsize,
}

// seed rows reference users by id, the store embeds them by value
#[derive(Deserialize)]
struct Seed {
  users: Vec<User>,
  reports: Vec<SeedReport>,
}

#[derive(Deserialize)]
struct SeedReport {
  id: String,
  title: String,
  description: String,
  image_url: String,
  location: Location,
  status: Status,
  upvotes: u32,
  downvotes: u32,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  comments: Vec<SeedComment>,
  author: String,
}

#[derive(Deserialize)]
struct SeedComment {
  id: String,
  content: String,
  created_at: DateTime<Utc>,
  user: String,
}

impl Store {
  pub fn seed() -> Result<Self> {
    Self::from_json(SEED).chain_err(|| "invalid seed data")
  }

  pub fn from_json(json: &str) -> Result<Self> {
    let seed: Seed = serde_json::from_str(json)?;
    let user = |id: &str| -> Result<User> {
      match seed.users.iter().find(|user| user.id == id) {
        Some(user) => Ok(user.clone()),
        None => bail!("unknown user id \"{}\"", id),
      }
    };

    let mut ids = HashSet::new();
    let mut reports = Vec::with_capacity(seed.reports.len());
    for row in &seed.reports {
      if !ids.insert(row.id.as_str()) {
        bail!("duplicate report id \"{}\"", row.id);
      }
      reports.push(Report {
        id: row.id.clone(),
        title: row.title.clone(),
        description: row.description.clone(),
        image_url: row.image_url.clone(),
        location: row.location.clone(),
        status: row.status,
        upvotes: row.upvotes,
        downvotes: row.downvotes,
        created_at: row.created_at,
        updated_at: row.updated_at,
        comments: row
          .comments
          .iter()
          .map(|comment| -> Result<Comment> {
            Ok(Comment {
              id: comment.id.clone(),
              content: comment.content.clone(),
              created_at: comment.created_at,
              user: user(&comment.user)?,
            })
          })
          .collect::<Result<_>>()?,
        author: user(&row.author)?,
      });
    }

    Ok(Store {
      next_user_id: AtomicUsize::new(seed.users.len() + 1),
      users: seed.users,
      reports,
    })
  }

  pub fn users(&self) -> &[User] {
    &self.users
  }

  pub fn reports(&self) -> &[Report] {
    &self.reports
  }

  pub fn user_by_email(&self, email: &str) -> Option<&User> {
    self.users.iter().find(|user| user.email == email)
  }

  pub fn report(&self, id: &str) -> Option<&Report> {
    self.reports.iter().find(|report| report.id == id)
  }

  /// Sequential id for a signed up user. Signups are never added to `users`.
  pub fn next_user_id(&self) -> String {
    self.next_user_id.fetch_add(1, Ordering::Relaxed).to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_embeds_users_by_value() {
    let store = Store::seed().unwrap();
    assert_eq!(store.users().len(), 3);
    assert_eq!(store.reports().len(), 3);

    let report = store.report("1").unwrap();
    assert_eq!(report.author.username, "john_doe");
    assert_eq!(report.comments[0].user.email, "jane@example.com");
    assert_eq!(store.report("3").unwrap().comments.len(), 3);
  }

  #[test]
  fn lookups() {
    let store = Store::seed().unwrap();
    assert_eq!(store.user_by_email("guest@example.com").unwrap().id, "3");
    assert!(store.user_by_email("nobody@example.com").is_none());
    assert!(store.report("42").is_none());
  }

  #[test]
  fn user_ids_continue_after_seed() {
    let store = Store::seed().unwrap();
    assert_eq!(store.next_user_id(), "4");
    assert_eq!(store.next_user_id(), "5");
  }

  #[test]
  fn rejects_duplicate_report_ids() {
    let json = r#"{
      "users": [{ "id": "1", "email": "a@b.c", "username": "a", "avatar_url": null }],
      "reports": [
        { "id": "1", "title": "t", "description": "d", "image_url": "i",
          "location": { "address": "a", "lat": 0.0, "lng": 0.0 }, "status": "fixed",
          "upvotes": 0, "downvotes": 0, "created_at": "2023-01-01T00:00:00Z",
          "updated_at": "2023-01-01T00:00:00Z", "comments": [], "author": "1" },
        { "id": "1", "title": "t", "description": "d", "image_url": "i",
          "location": { "address": "a", "lat": 0.0, "lng": 0.0 }, "status": "fixed",
          "upvotes": 0, "downvotes": 0, "created_at": "2023-01-01T00:00:00Z",
          "updated_at": "2023-01-01T00:00:00Z", "comments": [], "author": "1" }
      ]
    }"#;
    assert!(Store::from_json(json).is_err());
  }

  #[test]
  fn rejects_unknown_author() {
    let json = r#"{
      "users": [],
      "reports": [
        { "id": "1", "title": "t", "description": "d", "image_url": "i",
          "location": { "address": "a", "lat": 0.0, "lng": 0.0 }, "status": "reported",
          "upvotes": 0, "downvotes": 0, "created_at": "2023-01-01T00:00:00Z",
          "updated_at": "2023-01-01T00:00:00Z", "comments": [], "author": "9" }
      ]
    }"#;
    assert!(Store::from_json(json).is_err());
  }
}
