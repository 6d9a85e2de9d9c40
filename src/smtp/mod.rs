mod config;
mod transport;

pub use self::config::*;
pub use transport::*;
