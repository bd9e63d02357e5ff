// src/config/mod.rs
pub mod consts;
pub mod leagues;
pub mod options;

pub use leagues::League;
pub use options::{DownloadOptions, RemoteKind, ScrapeOptions, ServerOptions};
