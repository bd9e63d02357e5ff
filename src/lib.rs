// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod specs;

pub mod bingo;
pub mod data;
pub mod download;
pub mod log;
pub mod merge;
pub mod progress;
pub mod scrape;
pub mod store;
pub mod throttle;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "server")]
pub mod server;
