//! Fetches a user's records and runs them through the analytics pipeline.
//! Every request recomputes from the database; nothing is cached.

pub mod handler;
pub mod models;
pub mod service;
