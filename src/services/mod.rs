pub mod graph_service;

pub use graph_service::*;
