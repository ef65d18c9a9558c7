//! Domain aggregates exposed by the listing service layer.

#[cfg(feature = "server")]
pub mod auth;
pub mod filter;
pub mod listing;
pub mod notification;
pub mod subscription;
pub mod user;
