// src/probe.rs

//! Remote existence checks and conditional fetches of documentation
//! indices.
//!
//! The probe is an external collaborator: it enforces its own timeouts and
//! its failures are never fatal to the reactor walk — callers log and carry
//! on with a partial link set.

use std::fmt::Debug;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::IF_MODIFIED_SINCE;

/// Result of a conditional fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body written to the destination; carries the HTTP status code.
    Fetched(u16),
    /// Server reported the resource unchanged since the given time.
    NotModified,
    /// Non-success status; nothing written.
    Failed(u16),
}

pub trait RemoteProbe: Debug {
    /// Whether a documentation url is reachable.
    fn exists(&self, url: &str) -> bool;

    /// Fetch `url` into `dest`, conditionally on `if_modified_since`.
    ///
    /// Transport-level failures surface as errors; HTTP-level failures as
    /// [`FetchOutcome::Failed`].
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        if_modified_since: Option<SystemTime>,
    ) -> Result<FetchOutcome>;
}

/// [`RemoteProbe`] over blocking HTTP with connect/read timeouts.
#[derive(Debug)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

impl RemoteProbe for HttpProbe {
    fn exists(&self, url: &str) -> bool {
        match self.client.get(url).send() {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        if_modified_since: Option<SystemTime>,
    ) -> Result<FetchOutcome> {
        let mut request = self.client.get(url);
        if let Some(since) = if_modified_since {
            request = request.header(IF_MODIFIED_SINCE, http_date(since));
        }
        let response = request
            .send()
            .with_context(|| format!("fetching {url}"))?;

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }
        if !status.is_success() {
            return Ok(FetchOutcome::Failed(status.as_u16()));
        }

        let body = response
            .bytes()
            .with_context(|| format!("reading body of {url}"))?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {:?}", parent))?;
        }
        fs::write(dest, &body).with_context(|| format!("writing {:?}", dest))?;
        Ok(FetchOutcome::Fetched(status.as_u16()))
    }
}

/// RFC 7231 HTTP-date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date(time: SystemTime) -> String {
    let utc: DateTime<Utc> = time.into();
    utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
