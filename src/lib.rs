pub mod campaign;
pub mod common;
pub mod config;
pub mod service;
pub mod smtp;

pub use self::config::*;
