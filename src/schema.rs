use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: String,
  pub email: String,
  pub username: String,
  pub avatar_url: Option<String>,
}

impl User {
  pub const DEFAULT_AVATAR: &'static str = "https://i.pravatar.cc/150?img=0";

  pub fn avatar(&self) -> &str {
    self.avatar_url.as_deref().unwrap_or(Self::DEFAULT_AVATAR)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id: String,
  pub content: String,
  pub created_at: DateTime<Utc>,
  pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub address: String,
  pub lat: f64,
  pub lng: f64,
}

#[derive(
  Display, AsRefStr, EnumString, EnumIter, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Reported,
  InProgress,
  Fixed,
}

impl Status {
  /// Human readable badge text, e.g. "in progress".
  pub fn label(self) -> String {
    self.as_ref().replace('_', " ")
  }

  pub fn badge_class(self) -> &'static str {
    match self {
      Status::Reported => "bg-yellow",
      Status::InProgress => "bg-blue",
      Status::Fixed => "bg-green",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
  pub id: String,
  pub title: String,
  pub description: String,
  pub image_url: String,
  pub location: Location,
  pub status: Status,
  pub upvotes: u32,
  pub downvotes: u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub comments: Vec<Comment>,
  pub author: User,
}
