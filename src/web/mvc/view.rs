use super::model::Model as View;
use crate::{
  detail::{Loaded, Vote},
  error::Result,
  feed::{FeedEntry, StatusFilter},
  schema::{Comment, Status},
  util,
};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde_json::Value as JsonValue;
use strum::IntoEnumIterator;

impl View {
  pub fn v_root(&self, title: &str, body: Markup, js_glob: JsonValue) -> Result<Markup> {
    Ok(html! {
      (DOCTYPE)
      html lang="en" {
        head {
          meta http-equiv="Content-Type" content="text/html; charset=utf-8";
          meta name="viewport" content="width=device-width, initial-scale=1";

          link rel="stylesheet" href={ (self.root_url) "static/style.css" } type="text/css" media="screen";
          script type="text/javascript" src={ (self.root_url) "static/script.js" } defer {  }

          title { (title) " | PotholeFix" }

          script type="text/javascript" {
            "var __glob = " (PreEscaped(js_glob.to_string())) ";"
          }
        }
        body {
          (self.mar_header())
          (self.mar_notices())
          main.container { (body) }
          @if self.user.is_some() {
            a.fab href={ (self.root_url) "report/new" } title="Report a pothole" { "+" }
          }
          footer.footer {
            p { "© 2025 PotholeFix. All rights reserved." }
          }
        }
      }
    })
  }

  pub fn v_feed(&self, status: StatusFilter, entries: Vec<FeedEntry>) -> Result<Markup> {
    Ok(html! {
      .page-feed {
        .feed-head {
          div {
            h1 { "Community Pothole Reports" }
            p.muted { "Help improve our roads by reporting, voting, and commenting on potholes in your community." }
          }
          .feed-actions {
            form.filter method="get" action=(self.root_url) {
              select name="status" data-autosubmit {
                option value="all" selected[status == StatusFilter::All] { "All reports" }
                @for s in Status::iter() {
                  option value=(s.as_ref()) selected[status == StatusFilter::Only(s)] { (status_title(s)) }
                }
              }
              noscript { button type="submit" { "Filter" } }
            }
            @if self.user.is_some() {
              a.btn.primary href={ (self.root_url) "report/new" } { "Report Pothole" }
            }
          }
        }

        @if self.user.is_none() {
          .card.banner {
            div {
              h3 { "Sign in to report potholes" }
              p.muted { "Join our community to report potholes, vote, and comment." }
            }
            .banner-actions {
              a.btn href={ (self.root_url) "login" } { "Log in" }
              a.btn.primary href={ (self.root_url) "signup" } { "Sign up" }
            }
          }
        }

        @if entries.is_empty() {
          .empty {
            h3 { "No reports found" }
            p.muted { "No pothole reports match your current filter." }
            a.btn href=(self.root_url) { "View all reports" }
          }
        } @else {
          .grid {
            @for entry in &entries {
              a.card.report-card href={ (self.root_url) "report/" (entry.id) } {
                .cover {
                  img src=(entry.image_url) alt=(entry.title);
                  span.badge.(entry.status.badge_class()) { (entry.status.label()) }
                }
                .card-body {
                  h2 { (entry.title) }
                  p.address title=(entry.address.as_ref()) { (entry.address.as_ref()) }
                  p.description { (entry.description.as_ref()) }
                }
                .card-foot {
                  span.counts {
                    span.up { "▲ " (entry.upvotes) }
                    span.down { "▼ " (entry.downvotes) }
                    span.comments { "💬 " (entry.comments) }
                  }
                  span.date { (entry.date) }
                }
              }
            }
          }
        }
      }
    })
  }

  pub fn v_report(&self, loaded: &Loaded) -> Result<Markup> {
    let report = &loaded.report;
    Ok(html! {
      .page-report {
        a.btn.back href=(self.root_url) { "← Back to Reports" }
        .columns {
          .main-col {
            .card {
              img.hero src=(report.image_url) alt=(report.title);
              .card-body {
                .title-row {
                  h1 { (report.title) }
                  span.badge.(report.status.badge_class()) { (report.status.label()) }
                }
                p.address { (report.location.address) }
                h3 { "Description" }
                p { (report.description) }
                p.meta {
                  span { "Reported by " (report.author.username) }
                  span { (util::format_long_date(&report.created_at)) }
                }
                .votes {
                  button.btn.vote-up.active[loaded.vote == Vote::Up] type="button"
                    data-rpc="report/vote" data-direction="up" {
                    "▲ Upvote (" span.count { (report.upvotes) } ")"
                  }
                  button.btn.vote-down.active[loaded.vote == Vote::Down] type="button"
                    data-rpc="report/vote" data-direction="down" {
                    "▼ Downvote (" span.count { (report.downvotes) } ")"
                  }
                }
              }
            }

            .card.comments {
              h2 { "Comments (" span.comment-count { (report.comments.len()) } ")" }
              @if self.user.is_some() {
                form.comment-form data-rpc="report/comment" {
                  textarea name="content" placeholder="Add your comment..." {}
                  button.btn.primary type="submit" { "Post Comment" }
                }
              } @else {
                .login-hint {
                  p { "You need to be logged in to comment" }
                  a.btn href={ (self.root_url) "login" } { "Log in to comment" }
                }
              }
              hr;
              .comment-list {
                @if report.comments.is_empty() {
                  p.empty { "No comments yet. Be the first to comment!" }
                }
                @for comment in &report.comments {
                  (mar_comment(comment))
                }
              }
            }
          }

          .side-col {
            .card {
              h2 { "Location" }
              .map-placeholder { "📍" }
              p { strong { "Address:" } }
              p { (report.location.address) }
              p.muted { "Lat: " (report.location.lat) ", Lng: " (report.location.lng) }
            }
            .card {
              h2 { "Status History" }
              ul.history {
                li.bg-yellow { strong { "Reported" } span { (util::format_long_date(&report.created_at)) } }
                @if matches!(report.status, Status::InProgress | Status::Fixed) {
                  li.bg-blue { strong { "In Progress" } span { (util::format_long_date(&report.updated_at)) } }
                }
                @if report.status == Status::Fixed {
                  li.bg-green { strong { "Fixed" } span { (util::format_long_date(&report.updated_at)) } }
                }
              }
            }
          }
        }
      }
    })
  }

  pub fn v_report_not_found(&self) -> Result<Markup> {
    Ok(html! {
      .page-empty {
        h2 { "Report not found" }
        p.muted { "The pothole report you're looking for doesn't exist or has been removed." }
        a.btn href=(self.root_url) { "Back to Homepage" }
      }
    })
  }

  pub fn v_report_new(&self) -> Result<Markup> {
    Ok(html! {
      .page-report-new {
        a.btn.back href=(self.root_url) { "← Back to Reports" }
        .card {
          h1 { "Report a Pothole" }
          p.muted { "Fill out the form below to report a pothole in your community." }
          form.report-form data-rpc="report/submit" {
            label for="title" { "Title" }
            input id="title" name="title" type="text" placeholder="E.g., Deep pothole on Main Street";

            label for="description" { "Description" }
            textarea id="description" name="description" rows="4"
              placeholder="Describe the pothole, its size, depth, and any other relevant details..." {}

            label for="address" { "Location" }
            input id="address" name="address" type="text" placeholder="Street address or intersection";
            p.hint { "Enter the street address or intersection where the pothole is located" }

            label for="image" { "Photo" }
            .upload {
              .preview hidden {
                img alt="Pothole preview";
                button.btn type="button" data-rpc="report/image/remove" { "Remove photo" }
              }
              label.picker {
                span { "Upload photo of pothole" }
                span.hint { "Click to browse" }
                input id="image" type="file" accept="image/*" data-rpc="report/image";
              }
            }

            .form-actions {
              a.btn href=(self.root_url) { "Cancel" }
              button.btn.primary type="submit" data-busy="Submitting..." { "Submit Report" }
            }
          }
        }
      }
    })
  }

  pub fn v_login(&self) -> Result<Markup> {
    Ok(html! {
      .page-auth {
        .card {
          h1 { "Log in" }
          form data-rpc="auth/login" {
            label for="email" { "Email" }
            input id="email" name="email" type="email" placeholder="you@example.com";
            label for="password" { "Password" }
            input id="password" name="password" type="password";
            button.btn.primary type="submit" { "Log in" }
          }
          p.muted { "No account? " a href={ (self.root_url) "signup" } { "Sign up" } }
        }
      }
    })
  }

  pub fn v_signup(&self) -> Result<Markup> {
    Ok(html! {
      .page-auth {
        .card {
          h1 { "Sign up" }
          form data-rpc="auth/signup" {
            label for="email" { "Email" }
            input id="email" name="email" type="email" placeholder="you@example.com";
            label for="username" { "Username" }
            input id="username" name="username" type="text";
            label for="password" { "Password" }
            input id="password" name="password" type="password";
            button.btn.primary type="submit" { "Create account" }
          }
          p.muted { "Already registered? " a href={ (self.root_url) "login" } { "Log in" } }
        }
      }
    })
  }

  pub fn v_not_found(&self) -> Result<Markup> {
    Ok(html! {
      .page-empty {
        h1.big { "404" }
        h2 { "Page Not Found" }
        p.muted { "The page you're looking for doesn't exist or has been moved." }
        a.btn.primary href=(self.root_url) { "Return to Home" }
      }
    })
  }

  /// Ties a page to its server-side view state.
  pub fn v_view_scope(&self, token: &str, page: Markup) -> Markup {
    html! {
      .view-scope data-view=(token) { (page) }
    }
  }

  fn mar_header(&self) -> Markup {
    html! {
      header.header {
        .container {
          a.logo href=(self.root_url) { "📍 PotholeFix" }
          .user {
            @if let Some(user) = &self.user {
              img.avatar src=(user.avatar()) alt=(user.username);
              span.username { (user.username) }
              button.btn.ghost type="button" data-rpc="auth/logout" title="Log out" { "Log out" }
            } @else {
              a.btn.ghost href={ (self.root_url) "login" } { "Login" }
              a.btn.primary href={ (self.root_url) "signup" } { "Sign Up" }
            }
          }
        }
      }
    }
  }

  fn mar_notices(&self) -> Markup {
    html! {
      .notices {
        @for notice in &self.notices {
          .notice.destructive[notice.is_destructive()] {
            strong { (notice.title) }
            p { (notice.description) }
          }
        }
      }
    }
  }
}

fn status_title(status: Status) -> &'static str {
  match status {
    Status::Reported => "Reported",
    Status::InProgress => "In Progress",
    Status::Fixed => "Fixed",
  }
}

pub fn mar_comment(comment: &Comment) -> Markup {
  html! {
    .comment data-id=(comment.id) {
      .comment-head {
        img.avatar src=(comment.user.avatar()) alt=(comment.user.username);
        div {
          p.username { (comment.user.username) }
          p.date { (util::format_long_date(&comment.created_at)) }
        }
      }
      p.content { (comment.content) }
    }
  }
}
