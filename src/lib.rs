pub mod common;
pub mod config;
pub mod errors;
pub mod graph;
pub mod records;
pub mod repository;
pub mod resources;
pub mod services;
pub mod trace;

#[cfg(feature = "server")]
pub mod server;
