//! Core application modules
//!
//! This module contains configuration, constants, logging, the anti-forgery
//! store and the upstream provider client.

pub mod client;
pub mod config;
pub mod constants;
pub mod csrf;
pub mod logging;
pub mod provider;
pub mod secrets;
