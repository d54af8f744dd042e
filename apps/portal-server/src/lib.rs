//! Portal backend process wiring.
//!
//! One binary runs as any of the three backends (`catalog`, `techdocs`,
//! `main`). Each process builds the discovery route table and the group
//! permission policy from the same configuration, so every backend agrees on
//! where plugins live and who may do what.

pub mod clusters;
pub mod commands;
pub mod config;
pub mod logging;
pub mod startup;

pub use config::AppConfig;
