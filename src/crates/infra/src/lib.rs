pub mod repository;

pub mod id_generator;

pub mod spreadsheet;

pub mod config;
pub use config::{ImportConfig, ServerConfig};

pub mod auth;
