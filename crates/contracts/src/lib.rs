//! Shared contracts: доменные типы, DTO и проекции,
//! общие для backend и любых внешних клиентов.

pub mod domain;
pub mod enums;
pub mod projections;
