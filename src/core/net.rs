// src/core/net.rs
//
// Polite HTTP GET with browser-like headers and retries.
// The wire is behind `Transport` so the retry loop can be driven offline.

use std::time::Duration;

use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, warn};

use super::backoff::Backoff;
use super::clock::{Clock, SystemClock};
use crate::config::consts::{
    ACCEPT, ACCEPT_LANGUAGE, REFERER, REQUEST_TIMEOUT_SECS, USER_AGENTS,
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error for {url}: {msg}")]
    Transport { url: String, msg: String },
}

/// Headers sent with one attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub referer: &'static str,
}

impl RequestHeaders {
    /// Static browser headers with a user agent drawn from the pool.
    pub fn random() -> Self {
        let ua = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        Self {
            user_agent: ua,
            accept: ACCEPT,
            accept_language: ACCEPT_LANGUAGE,
            referer: REFERER,
        }
    }
}

pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub trait Transport {
    fn get(&self, url: &str, headers: &RequestHeaders) -> Result<RawResponse, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, headers: &RequestHeaders) -> Result<RawResponse, FetchError> {
        (**self).get(url, headers)
    }
}

/// Blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, headers: &RequestHeaders) -> Result<RawResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, headers.user_agent)
            .header(reqwest::header::ACCEPT, headers.accept)
            .header(reqwest::header::ACCEPT_LANGUAGE, headers.accept_language)
            .header(reqwest::header::REFERER, headers.referer)
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(RawResponse { status, body })
    }
}

/// GET with a fixed attempt budget and exponential backoff between attempts.
pub struct Fetcher<T = HttpTransport, C = SystemClock> {
    transport: T,
    clock: C,
    backoff: Backoff,
    max_attempts: u32,
}

impl Fetcher {
    /// Real network, real sleeps.
    pub fn http(max_attempts: u32) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))?;
        Ok(Fetcher::new(transport, SystemClock, max_attempts))
    }
}

impl<T: Transport, C: Clock> Fetcher<T, C> {
    pub fn new(transport: T, clock: C, max_attempts: u32) -> Self {
        Self {
            transport,
            clock,
            backoff: Backoff::default(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 { self.max_attempts }

    pub fn clock(&self) -> &C { &self.clock }

    /// Body of the first 200 response. After `max_attempts` failures the last
    /// error is returned.
    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0u32;
        loop {
            let headers = RequestHeaders::random();
            let err = match self.transport.get(url, &headers) {
                Ok(resp) if resp.status == 200 => {
                    debug!(url, attempt = attempt + 1, bytes = resp.body.len(), "fetched");
                    return Ok(resp.body);
                }
                Ok(resp) => FetchError::Status { url: s!(url), status: resp.status },
                Err(e) => e,
            };

            attempt += 1;
            warn!(url, attempt, max = self.max_attempts, error = %err, "fetch attempt failed");
            if attempt >= self.max_attempts {
                return Err(err);
            }
            self.clock.sleep(self.backoff.delay(attempt - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::cell::Cell;

    struct Flaky {
        fail_first: u32,
        calls: Cell<u32>,
    }

    impl Transport for Flaky {
        fn get(&self, url: &str, _h: &RequestHeaders) -> Result<RawResponse, FetchError> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n <= self.fail_first {
                Err(FetchError::Transport { url: s!(url), msg: format!("boom {n}") })
            } else {
                Ok(RawResponse { status: 200, body: s!("<html/>") })
            }
        }
    }

    #[test]
    fn random_headers_come_from_pool() {
        let h = RequestHeaders::random();
        assert!(USER_AGENTS.contains(&h.user_agent));
        assert_eq!(h.referer, "https://www.google.com/");
        assert_eq!(h.accept_language, "en-US,en;q=0.9");
    }

    #[test]
    fn recovers_after_transient_failures() {
        let t = Flaky { fail_first: 2, calls: Cell::new(0) };
        let clock = ManualClock::new();
        let f = Fetcher::new(&t, &clock, 5).with_backoff(Backoff::new(1_000));
        assert_eq!(f.fetch("http://x").unwrap(), "<html/>");
        assert_eq!(t.calls.get(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn zero_budget_still_tries_once() {
        let t = Flaky { fail_first: 10, calls: Cell::new(0) };
        let clock = ManualClock::new();
        let f = Fetcher::new(&t, &clock, 0);
        assert!(f.fetch("http://x").is_err());
        assert_eq!(t.calls.get(), 1);
        assert!(clock.sleeps().is_empty());
    }
}
