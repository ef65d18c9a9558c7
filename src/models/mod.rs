//! Database models shared across the listing repository.

pub mod config;
pub mod filter;
pub mod listing;
pub mod notification;
pub mod subscription;
pub mod user;
