//! The extraction pipeline: one fetch-classify-extract cycle per target,
//! strictly sequential, with a randomized pause between requests.
//!
//! One in-flight request at a time is a deliberate rate bound, not a
//! missing feature — parallel fetches change the run's detection risk
//! profile. The delay between items is likewise mandatory throttling and
//! is never skipped or overlapped with other work.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::extract;
use crate::logger::RunLogger;
use crate::record::{self, UrnRecord};

/// Non-standard status the target site uses as a soft-block signal.
pub const RATE_LIMIT_STATUS: u16 = 999;
/// Case-insensitive body marker for an unauthenticated session.
const AUTH_WALL_MARKER: &str = "authwall";
/// Final-URL marker for a redirect into the login flow.
const LOGIN_PATH_MARKER: &str = "login";

/// Why a single target produced no record. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScrapeFailure {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited (status {RATE_LIMIT_STATUS})")]
    RateLimited,

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("authentication wall (cookie invalid or expired)")]
    AuthWall,

    #[error("URL matches neither the company nor the profile namespace")]
    UnknownTargetShape,

    #[error("no identifier pattern matched the page body")]
    PatternNotFound,
}

impl ScrapeFailure {
    /// Stable class label for diagnostics and summary counts.
    pub fn class(&self) -> &'static str {
        match self {
            ScrapeFailure::Timeout => "timeout",
            ScrapeFailure::Transport(_) => "transport",
            ScrapeFailure::RateLimited => "rate-limited",
            ScrapeFailure::UnexpectedStatus(_) => "bad-status",
            ScrapeFailure::AuthWall => "auth-wall",
            ScrapeFailure::UnknownTargetShape => "unknown-target",
            ScrapeFailure::PatternNotFound => "pattern-not-found",
        }
    }
}

/// A failed target, kept for reporting. Failures never become placeholder
/// records in the result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Zero-based position in the input list.
    pub index: usize,
    pub input_url: String,
    pub failure: ScrapeFailure,
}

/// Outcome of a pipeline run: successes in input order, failures alongside.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub records: Vec<UrnRecord>,
    pub failures: Vec<ItemFailure>,
    /// True when the run stopped early on consecutive auth-wall failures.
    pub aborted: bool,
}

/// Sequential fetch/classify/extract driver. Owns the HTTP client and the
/// injected random source for delay jitter.
pub struct Pipeline<R: Rng> {
    client: Client,
    delay_min_secs: f64,
    delay_max_secs: f64,
    /// Consecutive auth-wall failures tolerated before aborting the rest of
    /// the batch. 0 disables the heuristic (reference behavior).
    max_auth_failures: u32,
    rng: R,
}

impl<R: Rng> Pipeline<R> {
    pub fn new(client: Client, delay_min_secs: f64, delay_max_secs: f64, rng: R) -> Self {
        Self {
            client,
            delay_min_secs,
            delay_max_secs,
            max_auth_failures: 0,
            rng,
        }
    }

    pub fn with_max_auth_failures(mut self, max_auth_failures: u32) -> Self {
        self.max_auth_failures = max_auth_failures;
        self
    }

    /// Process every URL in order. One request in flight at a time; a
    /// uniform random pause from the delay range after every item except
    /// the last.
    pub async fn run(&mut self, urls: &[String], logger: &RunLogger) -> ScrapeReport {
        let total = urls.len();
        let mut report = ScrapeReport::default();
        let mut consecutive_auth_failures = 0u32;

        for (index, url) in urls.iter().enumerate() {
            logger.log_item_start(index + 1, total, url);

            match self.scrape_one(url).await {
                Ok(rec) => {
                    consecutive_auth_failures = 0;
                    logger.log_item_success(index + 1, total, &rec.urn);
                    report.records.push(rec);
                }
                Err(failure) => {
                    if failure == ScrapeFailure::AuthWall {
                        consecutive_auth_failures += 1;
                    } else {
                        consecutive_auth_failures = 0;
                    }

                    logger.log_item_failure(
                        index + 1,
                        total,
                        url,
                        failure.class(),
                        &failure.to_string(),
                    );
                    report.failures.push(ItemFailure {
                        index,
                        input_url: url.clone(),
                        failure,
                    });

                    if self.max_auth_failures > 0
                        && consecutive_auth_failures >= self.max_auth_failures
                    {
                        logger.error(&format!(
                            "Aborting: {} consecutive auth-wall failures — the cookie is not being accepted",
                            consecutive_auth_failures
                        ));
                        report.aborted = true;
                        logger.record_target_processed();
                        logger.advance_progress(1).await;
                        break;
                    }
                }
            }

            logger.record_target_processed();
            logger.advance_progress(1).await;

            if index + 1 < total {
                let secs = self
                    .rng
                    .gen_range(self.delay_min_secs..=self.delay_max_secs);
                debug!("sleeping {:.2}s before next request", secs);
                logger.log_delay(secs);
                tokio::time::sleep(Duration::from_secs_f64(secs)).await;
            }
        }

        report
    }

    /// One fetch-classify-extract cycle. Pure orchestration over the
    /// immutable session client; every early return is a typed failure.
    async fn scrape_one(&self, url: &str) -> Result<UrnRecord, ScrapeFailure> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(ScrapeFailure::Timeout),
            Err(e) => return Err(ScrapeFailure::Transport(e.to_string())),
        };

        let status = response.status().as_u16();
        if status == RATE_LIMIT_STATUS {
            return Err(ScrapeFailure::RateLimited);
        }
        if status != 200 {
            return Err(ScrapeFailure::UnexpectedStatus(status));
        }

        // Final URL after redirects; the body consumes the response.
        let final_url = response.url().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(ScrapeFailure::Timeout),
            Err(e) => return Err(ScrapeFailure::Transport(e.to_string())),
        };

        if body.to_lowercase().contains(AUTH_WALL_MARKER)
            || final_url.contains(LOGIN_PATH_MARKER)
        {
            return Err(ScrapeFailure::AuthWall);
        }

        // Classification looks at the requested URL, not where redirects
        // landed.
        let kind = record::classify(url).ok_or(ScrapeFailure::UnknownTargetShape)?;

        let matched = extract::extract(kind, &body).ok_or(ScrapeFailure::PatternNotFound)?;

        Ok(UrnRecord {
            input_url: url.to_string(),
            entity_type: kind,
            urn: matched.urn,
            entity_id: matched.entity_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classes_are_distinct() {
        let classes = [
            ScrapeFailure::Timeout.class(),
            ScrapeFailure::Transport("x".into()).class(),
            ScrapeFailure::RateLimited.class(),
            ScrapeFailure::UnexpectedStatus(403).class(),
            ScrapeFailure::AuthWall.class(),
            ScrapeFailure::UnknownTargetShape.class(),
            ScrapeFailure::PatternNotFound.class(),
        ];
        let unique: std::collections::HashSet<_> = classes.iter().collect();
        assert_eq!(unique.len(), classes.len());
    }

    #[test]
    fn test_rate_limit_distinct_from_bad_status() {
        // 999 and ordinary error statuses both drop the item but must stay
        // distinguishable in diagnostics.
        assert_ne!(
            ScrapeFailure::RateLimited.class(),
            ScrapeFailure::UnexpectedStatus(429).class()
        );
    }
}
