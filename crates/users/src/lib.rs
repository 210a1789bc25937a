//! Accounts that own all finance data, with argon2 password hashes.

pub mod models;
mod password;
mod repository;
pub mod service;
