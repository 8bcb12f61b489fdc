use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
  Default,
  Destructive,
}

/// Transient notification shown once to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub title: String,
  pub description: String,
  pub variant: Variant,
}

impl Notice {
  pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
    Notice {
      title: title.into(),
      description: description.into(),
      variant: Variant::Default,
    }
  }

  pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
    Notice {
      title: title.into(),
      description: description.into(),
      variant: Variant::Destructive,
    }
  }

  pub fn is_destructive(&self) -> bool {
    self.variant == Variant::Destructive
  }
}
