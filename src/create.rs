use crate::{
  error::{ErrorKind, Result},
  notice::Notice,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use error_chain::bail;
use strum_macros::{Display, EnumIter};

/// Form fields in the order they are validated.
#[derive(Display, EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
  Title,
  Description,
  Address,
  Image,
}

impl Field {
  pub fn notice(self) -> Notice {
    match self {
      Field::Title => Notice::error("Missing title", "Please enter a title for your report."),
      Field::Description => Notice::error("Missing description", "Please describe the pothole issue."),
      Field::Address => Notice::error("Missing location", "Please enter the location of the pothole."),
      Field::Image => Notice::error("Missing image", "Please upload a photo of the pothole."),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
  pub name: String,
  pub mime: String,
  pub data: Vec<u8>,
}

impl ImageUpload {
  /// Decodes a `data:<mime>;base64,<payload>` url. The mime type is taken from
  /// the bytes when the format is recognised, otherwise from the url.
  pub fn from_data_url(name: &str, url: &str) -> Result<Self> {
    let (header, payload) = match url.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
      Some(parts) => parts,
      None => bail!(ErrorKind::InvalidRequest),
    };
    let declared = match header.strip_suffix(";base64") {
      Some(mime) => mime,
      None => bail!(ErrorKind::InvalidRequest),
    };
    let data = BASE64.decode(payload)?;
    let mime = match image::guess_format(&data) {
      Ok(format) => format.to_mime_type().to_string(),
      Err(_) if !declared.is_empty() => declared.to_string(),
      Err(_) => "application/octet-stream".to_string(),
    };
    Ok(ImageUpload {
      name: name.to_string(),
      mime,
      data,
    })
  }

  /// Local preview reference shown next to the form.
  pub fn preview(&self) -> String {
    format!("data:{};base64,{}", self.mime, BASE64.encode(&self.data))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Editing,
  Submitting,
  Submitted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFields {
  pub title: String,
  pub description: String,
  pub address: String,
}

/// Draft of a new report. Submitting never adds anything to the store.
#[derive(Debug, Clone)]
pub struct CreateForm {
  pub fields: ReportFields,
  image: Option<ImageUpload>,
  phase: Phase,
}

impl Default for CreateForm {
  fn default() -> Self {
    CreateForm {
      fields: ReportFields::default(),
      image: None,
      phase: Phase::Editing,
    }
  }
}

impl CreateForm {
  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn image(&self) -> Option<&ImageUpload> {
    self.image.as_ref()
  }

  /// Rendered from the upload on each call, only the raw bytes are kept.
  pub fn preview(&self) -> Option<String> {
    self.image.as_ref().map(ImageUpload::preview)
  }

  /// Replaces any previous image and returns its preview.
  pub fn attach_image(&mut self, image: ImageUpload) -> Result<String> {
    self.ensure_editing()?;
    let preview = image.preview();
    self.image = Some(image);
    Ok(preview)
  }

  pub fn remove_image(&mut self) -> Result<()> {
    self.ensure_editing()?;
    self.image = None;
    Ok(())
  }

  /// First missing field in check order, if any.
  pub fn missing_field(&self) -> Option<Field> {
    if self.fields.title.trim().is_empty() {
      Some(Field::Title)
    } else if self.fields.description.trim().is_empty() {
      Some(Field::Description)
    } else if self.fields.address.trim().is_empty() {
      Some(Field::Address)
    } else if self.image.is_none() {
      Some(Field::Image)
    } else {
      None
    }
  }

  /// Stores `fields`, validates and enters the submitting phase.
  pub fn begin_submit(&mut self, fields: ReportFields) -> Result<()> {
    self.ensure_editing()?;
    self.fields = fields;
    if let Some(field) = self.missing_field() {
      bail!(ErrorKind::MissingField(field));
    }
    self.phase = Phase::Submitting;
    Ok(())
  }

  pub fn finish_submit(&mut self) -> Result<Notice> {
    if self.phase != Phase::Submitting {
      bail!(ErrorKind::InvalidRequest);
    }
    self.phase = Phase::Submitted;
    Ok(Notice::info(
      "Report submitted",
      "Your pothole report has been submitted successfully!",
    ))
  }

  fn ensure_editing(&self) -> Result<()> {
    if self.phase != Phase::Editing {
      bail!(ErrorKind::InvalidRequest);
    }
    Ok(())
  }
}

pub fn login_required_notice() -> Notice {
  Notice::error("Login required", "You must be logged in to report a pothole.")
}

#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator;

  // 1x1 transparent png
  const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

  fn png_upload() -> ImageUpload {
    ImageUpload::from_data_url("hole.png", &format!("data:image/png;base64,{}", PNG)).unwrap()
  }

  fn complete() -> ReportFields {
    ReportFields {
      title: "Crater".into(),
      description: "Big one".into(),
      address: "1 Elm St".into(),
    }
  }

  fn missing(form: &mut CreateForm, fields: ReportFields) -> Field {
    match form.begin_submit(fields).unwrap_err().kind() {
      ErrorKind::MissingField(field) => *field,
      kind => panic!("unexpected {:?}", kind),
    }
  }

  #[test]
  fn reports_first_missing_field_in_order() {
    let mut form = CreateForm::default();
    assert_eq!(missing(&mut form, ReportFields::default()), Field::Title);

    let no_description = ReportFields {
      description: "  ".into(),
      address: String::new(),
      ..complete()
    };
    assert_eq!(missing(&mut form, no_description), Field::Description);

    let no_address = ReportFields {
      address: "\t".into(),
      ..complete()
    };
    assert_eq!(missing(&mut form, no_address), Field::Address);
    assert_eq!(missing(&mut form, complete()), Field::Image);
    assert_eq!(form.phase(), Phase::Editing);
  }

  #[test]
  fn each_single_missing_field_is_reported() {
    for field in Field::iter() {
      let mut form = CreateForm::default();
      let mut fields = complete();
      match field {
        Field::Title => fields.title.clear(),
        Field::Description => fields.description.clear(),
        Field::Address => fields.address.clear(),
        Field::Image => (),
      }
      if field != Field::Image {
        form.attach_image(png_upload()).unwrap();
      }
      assert_eq!(missing(&mut form, fields), field);
      assert_eq!(form.phase(), Phase::Editing);
    }
  }

  #[test]
  fn complete_form_submits_once() {
    let mut form = CreateForm::default();
    form.attach_image(png_upload()).unwrap();
    form.begin_submit(complete()).unwrap();
    assert_eq!(form.phase(), Phase::Submitting);

    // controls are disabled while submitting
    assert!(form.begin_submit(complete()).is_err());
    assert!(form.remove_image().is_err());

    let notice = form.finish_submit().unwrap();
    assert_eq!(notice.title, "Report submitted");
    assert_eq!(form.phase(), Phase::Submitted);
    assert!(form.finish_submit().is_err());
  }

  #[test]
  fn image_preview_and_removal() {
    let mut form = CreateForm::default();
    let preview = form.attach_image(png_upload()).unwrap();
    assert_eq!(preview, format!("data:image/png;base64,{}", PNG));
    assert_eq!(form.preview(), Some(preview));
    assert_eq!(form.image().unwrap().name, "hole.png");

    form.remove_image().unwrap();
    assert!(form.image().is_none());
    assert!(form.preview().is_none());
  }

  #[test]
  fn unknown_bytes_keep_declared_mime() {
    let upload = ImageUpload::from_data_url("x.heic", "data:image/heic;base64,AAECAw==").unwrap();
    assert_eq!(upload.mime, "image/heic");
    assert_eq!(upload.data, vec![0, 1, 2, 3]);
  }

  #[test]
  fn rejects_malformed_data_urls() {
    assert!(ImageUpload::from_data_url("a", "not a data url").is_err());
    assert!(ImageUpload::from_data_url("a", "data:image/png,plain").is_err());
    assert!(ImageUpload::from_data_url("a", "data:image/png;base64,***").is_err());
  }
}
