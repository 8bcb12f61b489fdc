mod controller;
mod model;
mod view;

pub use controller::main as controller;
pub use model::Model;
pub use view::mar_comment;
