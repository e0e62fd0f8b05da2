pub mod dto;
pub mod entity;
pub mod handler;
pub mod infra;
pub mod repository;
pub mod service;

pub use handler::router;
