//! Watches a motherboard support page for new BIOS releases.
//!
//! Every run reads the last announced release from a JSON file, fetches the releases currently published by the
//! vendor and, when a newer one is found, posts it to a chat webhook before recording it as the new marker.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod service;
pub mod utils;

pub use app::{App, RunOutcome};
