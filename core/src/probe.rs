//! Ordered candidate endpoints and the short-circuiting prober over them.
//!
//! # Design
//! `try_in_order` knows nothing about HTTP. It walks the candidates, asks the
//! supplied closure to attempt each one, and stops at the first `Step::Done`.
//! A 404 is reported as `Step::NotFound` and never becomes the "last error",
//! so an exhausted probe can tell "nothing exists here" apart from "things
//! exist but failed". Candidates run strictly one after another.

use tracing::{debug, warn};

use crate::error::ApiError;

/// One endpoint to try: the configured path or suffix and its absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: String,
    pub url: String,
}

/// Build the candidate list: override first, then the defaults in order.
///
/// An empty base URL yields no candidates at all. Duplicates are kept.
pub fn candidates(base_url: &str, override_path: Option<&str>, defaults: &[&str]) -> Vec<Candidate> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Vec::new();
    }
    override_path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .into_iter()
        .chain(defaults.iter().copied())
        .map(|path| Candidate {
            path: path.to_string(),
            url: join_url(base, path),
        })
        .collect()
}

/// Join a base URL and a path. Absolute `http(s)://` paths replace the base.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Result of attempting a single candidate.
#[derive(Debug)]
pub enum Step<T> {
    Done(T),
    NotFound,
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    NotFound,
    Failed(String),
}

/// Record of one candidate that was actually tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub url: String,
    pub outcome: AttemptOutcome,
}

/// Why a probe ended without a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No base URL configured, so nothing was attempted.
    NoBaseUrl,
    /// Every candidate answered 404.
    AllNotFound,
    /// At least one candidate failed; carries the most recent failure.
    Failed { last_error: String },
}

impl FallbackReason {
    /// Short label used in log fields and across the FFI.
    pub fn label(&self) -> &'static str {
        match self {
            FallbackReason::NoBaseUrl => "no_base_url",
            FallbackReason::AllNotFound => "all_not_found",
            FallbackReason::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    Found { url: String, value: T },
    Exhausted(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe<T> {
    pub outcome: ProbeOutcome<T>,
    pub attempts: Vec<Attempt>,
}

/// Try each candidate in order until one yields `Step::Done`.
pub fn try_in_order<T, F>(candidates: &[Candidate], mut attempt: F) -> Probe<T>
where
    F: FnMut(&Candidate) -> Step<T>,
{
    let mut attempts = Vec::with_capacity(candidates.len());
    let mut last_error: Option<String> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        debug!(attempt = index + 1, url = %candidate.url, "trying candidate");
        match attempt(candidate) {
            Step::Done(value) => {
                debug!(attempt = index + 1, url = %candidate.url, "candidate succeeded");
                attempts.push(Attempt {
                    url: candidate.url.clone(),
                    outcome: AttemptOutcome::Succeeded,
                });
                return Probe {
                    outcome: ProbeOutcome::Found {
                        url: candidate.url.clone(),
                        value,
                    },
                    attempts,
                };
            }
            Step::NotFound => {
                debug!(attempt = index + 1, url = %candidate.url, "candidate not found, skipping");
                attempts.push(Attempt {
                    url: candidate.url.clone(),
                    outcome: AttemptOutcome::NotFound,
                });
            }
            Step::Failed(err) => {
                let message = err.to_string();
                warn!(attempt = index + 1, url = %candidate.url, error = %message, "candidate failed");
                attempts.push(Attempt {
                    url: candidate.url.clone(),
                    outcome: AttemptOutcome::Failed(message.clone()),
                });
                last_error = Some(message);
            }
        }
    }

    let reason = if candidates.is_empty() {
        FallbackReason::NoBaseUrl
    } else if let Some(last_error) = last_error {
        FallbackReason::Failed { last_error }
    } else {
        FallbackReason::AllNotFound
    };
    Probe {
        outcome: ProbeOutcome::Exhausted(reason),
        attempts,
    }
}
