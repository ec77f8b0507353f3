//! Fleet domain: bus records, routes, roster, and the pure services that
//! validate, reconcile, and summarize them.

pub mod model;
pub mod repository;
pub mod service;
