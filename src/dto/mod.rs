//! JSON payloads exchanged with the REST API.

pub mod auth;
pub mod filter;
pub mod listing;
pub mod notification;
pub mod user;
