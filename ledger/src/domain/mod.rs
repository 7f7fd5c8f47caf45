//! Domain layer: the account entity and the registry service.

pub mod account_service;
pub mod models;
