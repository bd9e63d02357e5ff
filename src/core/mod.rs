// src/core/mod.rs

pub mod backoff;
pub mod clock;
pub mod html;
pub mod net;
pub mod sanitize;

pub use clock::{Clock, ManualClock, SystemClock};
pub use net::{FetchError, Fetcher, Transport};
