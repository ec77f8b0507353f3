//! Application service layer - config, fleet services, HTTP API, clients

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod constants;
pub mod repository;
