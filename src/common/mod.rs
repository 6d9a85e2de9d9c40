mod config;
mod error;
mod models;

pub(crate) use self::config::secret_file_or_string;
pub use self::config::read_utf8;
pub use error::*;
pub use models::*;
