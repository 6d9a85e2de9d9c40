mod config;
mod models;
mod recipients;
mod template;

pub use self::config::*;
pub use models::*;
pub use recipients::*;
