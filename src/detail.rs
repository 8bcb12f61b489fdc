use crate::{
  error::{ErrorKind, Result},
  notice::Notice,
  schema::{Comment, Report, User},
  store::Store,
};
use chrono::{DateTime, Utc};
use error_chain::bail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
}

/// The vote currently cast from this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
  None,
  Up,
  Down,
}

impl From<Direction> for Vote {
  fn from(direction: Direction) -> Self {
    match direction {
      Direction::Up => Vote::Up,
      Direction::Down => Vote::Down,
    }
  }
}

/// A report copied out of the store for one detail page. Mutations stay here.
#[derive(Debug, Clone)]
pub struct Loaded {
  pub report: Report,
  pub vote: Vote,
  comment_seq: u32,
}

#[derive(Debug, Clone, Default)]
pub enum DetailView {
  #[default]
  Loading,
  NotFound,
  Loaded(Box<Loaded>),
}

impl DetailView {
  pub fn open(store: &Store, id: &str) -> Self {
    match store.report(id) {
      Some(report) => DetailView::Loaded(Box::new(Loaded {
        report: report.clone(),
        vote: Vote::None,
        comment_seq: 0,
      })),
      None => DetailView::NotFound,
    }
  }

  pub fn loaded(&self) -> Option<&Loaded> {
    match self {
      DetailView::Loaded(loaded) => Some(loaded),
      _ => None,
    }
  }

  /// Casts, retracts or switches the vote of this view.
  pub fn vote(&mut self, authenticated: bool, direction: Direction) -> Result<()> {
    if !authenticated {
      bail!(ErrorKind::AuthenticationRequired);
    }
    let loaded: &mut Loaded = match self {
      DetailView::Loaded(loaded) => loaded,
      _ => return Ok(()),
    };
    let report = &mut loaded.report;

    let requested = Vote::from(direction);
    // retract whatever is active
    match loaded.vote {
      Vote::Up => report.upvotes = report.upvotes.saturating_sub(1),
      Vote::Down => report.downvotes = report.downvotes.saturating_sub(1),
      Vote::None => (),
    }
    loaded.vote = if loaded.vote == requested {
      Vote::None
    } else {
      match direction {
        Direction::Up => report.upvotes += 1,
        Direction::Down => report.downvotes += 1,
      }
      requested
    };
    Ok(())
  }

  /// Appends a comment by `user`. Blank content is ignored.
  pub fn comment(
    &mut self,
    user: Option<&User>,
    content: &str,
    now: DateTime<Utc>,
  ) -> Result<Option<(&Comment, Notice)>> {
    let user = match user {
      Some(user) => user,
      None => bail!(ErrorKind::AuthenticationRequired),
    };
    let loaded: &mut Loaded = match self {
      DetailView::Loaded(loaded) => loaded,
      _ => return Ok(None),
    };
    if content.trim().is_empty() {
      return Ok(None);
    }

    loaded.comment_seq += 1;
    loaded.report.comments.push(Comment {
      id: format!("comment-{}-{}", now.timestamp_millis(), loaded.comment_seq),
      content: content.to_string(),
      created_at: now,
      user: user.clone(),
    });
    let notice = Notice::info("Comment posted", "Your comment has been added to this report.");
    Ok(loaded.report.comments.last().map(|comment| (comment, notice)))
  }
}

pub fn login_required_notice(action: &str) -> Notice {
  Notice::error("Login required", format!("Please log in to {}.", action))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn open(id: &str) -> (Store, DetailView) {
    let store = Store::seed().unwrap();
    let view = DetailView::open(&store, id);
    (store, view)
  }

  fn counts(view: &DetailView) -> (u32, u32, Vote) {
    let loaded = view.loaded().unwrap();
    (loaded.report.upvotes, loaded.report.downvotes, loaded.vote)
  }

  #[test]
  fn starts_loading_and_resolves() {
    assert!(matches!(DetailView::default(), DetailView::Loading));
    let (_, view) = open("1");
    assert_eq!(view.loaded().unwrap().report.title, "Deep pothole on Main Street");
    let (_, view) = open("nope");
    assert!(matches!(view, DetailView::NotFound));
  }

  #[test]
  fn up_twice_round_trips() {
    let (_, mut view) = open("1");
    let (up, down, _) = counts(&view);

    view.vote(true, Direction::Up).unwrap();
    assert_eq!(counts(&view), (up + 1, down, Vote::Up));
    view.vote(true, Direction::Up).unwrap();
    assert_eq!(counts(&view), (up, down, Vote::None));
  }

  #[test]
  fn switching_direction_moves_the_vote() {
    let (_, mut view) = open("1");
    let (up, down, _) = counts(&view);

    view.vote(true, Direction::Up).unwrap();
    view.vote(true, Direction::Down).unwrap();
    assert_eq!(counts(&view), (up, down + 1, Vote::Down));

    view.vote(true, Direction::Up).unwrap();
    assert_eq!(counts(&view), (up + 1, down, Vote::Up));
  }

  #[test]
  fn down_from_none() {
    let (_, mut view) = open("3");
    view.vote(true, Direction::Down).unwrap();
    assert_eq!(counts(&view), (45, 1, Vote::Down));
    view.vote(true, Direction::Down).unwrap();
    assert_eq!(counts(&view), (45, 0, Vote::None));
  }

  #[test]
  fn anonymous_vote_is_rejected_without_mutation() {
    let (_, mut view) = open("2");
    let before = counts(&view);
    let err = view.vote(false, Direction::Up).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::AuthenticationRequired));
    assert_eq!(counts(&view), before);
  }

  #[test]
  fn vote_on_missing_report_is_a_no_op() {
    let (_, mut view) = open("nope");
    view.vote(true, Direction::Up).unwrap();
    assert!(matches!(view, DetailView::NotFound));
  }

  #[test]
  fn mutations_never_reach_the_store() {
    let (store, mut view) = open("1");
    let user = store.user_by_email("jane@example.com").cloned();
    view.vote(true, Direction::Up).unwrap();
    view.comment(user.as_ref(), "again", Utc::now()).unwrap();

    let seed = store.report("1").unwrap();
    assert_eq!(seed.upvotes, 15);
    assert_eq!(seed.comments.len(), 2);
    let reopened = DetailView::open(&store, "1");
    assert_eq!(counts(&reopened), (15, 2, Vote::None));
  }

  #[test]
  fn blank_comments_are_ignored() {
    let (store, mut view) = open("1");
    let user = store.user_by_email("john@example.com").cloned();
    for blank in ["", "   ", "\n\t "] {
      assert!(view.comment(user.as_ref(), blank, Utc::now()).unwrap().is_none());
    }
    assert_eq!(view.loaded().unwrap().report.comments.len(), 2);
  }

  #[test]
  fn comment_appends_one_entry_by_session_user() {
    let (store, mut view) = open("2");
    let user = store.user_by_email("guest@example.com").cloned();
    let now = Utc::now();

    let (comment, notice) = view.comment(user.as_ref(), "  Still there  ", now).unwrap().unwrap();
    assert_eq!(comment.content, "  Still there  ");
    assert_eq!(comment.user.username, "guest_user");
    assert_eq!(comment.created_at, now);
    assert_eq!(notice.title, "Comment posted");

    let comments = &view.loaded().unwrap().report.comments;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments.last().unwrap().content, "  Still there  ");
  }

  #[test]
  fn rapid_comments_get_distinct_ids() {
    let (store, mut view) = open("2");
    let user = store.user_by_email("guest@example.com").cloned();
    let now = Utc::now();
    let first = view.comment(user.as_ref(), "a", now).unwrap().unwrap().0.id.clone();
    let second = view.comment(user.as_ref(), "b", now).unwrap().unwrap().0.id.clone();
    assert_ne!(first, second);
  }

  #[test]
  fn anonymous_comment_is_rejected() {
    let (_, mut view) = open("2");
    let err = view.comment(None, "hello", Utc::now()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::AuthenticationRequired));
    assert_eq!(view.loaded().unwrap().report.comments.len(), 1);
  }
}
