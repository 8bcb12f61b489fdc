use crate::create::Field;
use actix_web::{http::StatusCode, HttpResponse};
use error_chain::error_chain;

error_chain! {
  foreign_links {
    IoError(std::io::Error);
    TomlError(toml::de::Error);
    SerdeJsonError(serde_json::error::Error);
    Base64DecodeError(base64::DecodeError);
    ClapError(clap::Error);
    ChronoParseError(chrono::ParseError);
  }

  errors {
    InvalidCredentials {
      description("invalid credentials")
      display("Invalid email or password")
    }
    AuthenticationRequired {
      description("authentication required")
      display("authentication required")
    }
    MissingField(field: Field) {
      description("missing form field")
      display("missing {}", field)
    }
    InvalidRequest
    ViewExpired {
      description("view expired")
      display("view expired or unknown")
    }
    RouteNotFound
  }
}

pub fn display(error: &Error) -> String {
  match error.kind() {
    ErrorKind::RouteNotFound => "".to_string(),
    _ => {
      let mut msg = "Error:\n".to_string();
      error
        .iter()
        .enumerate()
        .for_each(|(index, error)| msg.push_str(&format!("└> {} - {}\n", index, error)));

      if let Some(backtrace) = error.backtrace() {
        msg.push_str(&format!("\n{:?}", backtrace));
      }
      log::error!("{}", msg);
      msg
    }
  }
}

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.kind() {
      ErrorKind::RouteNotFound => StatusCode::NOT_FOUND,
      ErrorKind::InvalidRequest | ErrorKind::ViewExpired => StatusCode::BAD_REQUEST,
      ErrorKind::AuthenticationRequired => StatusCode::UNAUTHORIZED,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self.kind() {
      ErrorKind::RouteNotFound => HttpResponse::NotFound().finish(),
      ErrorKind::AuthenticationRequired => HttpResponse::Unauthorized().finish(),
      ErrorKind::InvalidRequest | ErrorKind::ViewExpired => HttpResponse::BadRequest().body({
        #[cfg(debug_assertions)]
        {
          display(self)
        }
        #[cfg(not(debug_assertions))]
        {
          self.to_string()
        }
      }),
      _ => HttpResponse::InternalServerError().body(display(self)),
    }
  }
}
