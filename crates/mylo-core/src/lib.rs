//! Core mylo library (session, profile, provider clients, config).

pub mod clients;
pub mod config;
pub mod logging;
pub mod profile;
pub mod providers;
pub mod session;
