mod models;
mod render;
mod service;

pub use models::*;
pub use render::*;
pub use service::*;
