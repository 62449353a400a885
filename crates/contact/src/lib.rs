mod field;
mod form;
mod recaptcha;
mod service;
mod submit;

pub use field::*;
pub use form::*;
pub use recaptcha::*;
pub use service::*;
pub use submit::*;
