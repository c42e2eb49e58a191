pub mod lifecycle;
pub mod repository;
pub mod service;
