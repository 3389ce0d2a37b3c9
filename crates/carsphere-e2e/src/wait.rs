//! Wait policies and the polling waiter.
//!
//! Every lookup against the application under test goes through this module:
//! the rendered document is polled at a fixed interval until a condition holds
//! or the timeout elapses. Each poll re-resolves the query from scratch, so
//! client-side re-renders that replace nodes never leave the harness holding a
//! stale reference. There is no backoff; the application's render latency is
//! bounded, and a fixed interval keeps failure timing reproducible.
//!
//! The API is two-tier by design:
//!
//! - [`wait_for`] / [`wait_for_all`] / [`wait_for_value`] assert. A miss is a
//!   typed error.
//! - [`is_visible`] probes. A miss is `false`, never an error, so call sites
//!   asking "is this button shown to this user?" don't wrap error handling
//!   around every probe.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::driver::{Driver, ElementHandle};
use crate::query::ElementQuery;
use crate::result::{HarnessError, HarnessResult};

/// Default timeout for element waits (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Default timeout for externally-generated content (30 seconds)
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 30_000;

/// What a wait is polling for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// At least one match exists in the document
    Present,
    /// At least one match exists and is visible
    Visible,
    /// The full match set, however many there are
    AllPresent,
    /// A match exists and its form value is non-empty
    ValueNonEmpty,
}

impl WaitCondition {
    /// Human-readable condition name used in error messages
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::AllPresent => "all-present",
            Self::ValueNonEmpty => "value-non-empty",
        }
    }
}

/// Validated timing + condition for one wait.
///
/// Construction is the only place timing is checked: a zero timeout or a poll
/// interval longer than the timeout is rejected up front, not discovered as a
/// hang or a busy-loop mid-scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    timeout: Duration,
    poll_interval: Duration,
    condition: WaitCondition,
}

impl WaitPolicy {
    /// Create a policy, validating the timing
    pub fn new(
        condition: WaitCondition,
        timeout: Duration,
        poll_interval: Duration,
    ) -> HarnessResult<Self> {
        if timeout.is_zero() {
            return Err(HarnessError::InvalidPolicy {
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        if poll_interval.is_zero() {
            return Err(HarnessError::InvalidPolicy {
                reason: "poll interval must be greater than zero".to_string(),
            });
        }
        if poll_interval > timeout {
            return Err(HarnessError::InvalidPolicy {
                reason: format!(
                    "poll interval {}ms exceeds timeout {}ms",
                    poll_interval.as_millis(),
                    timeout.as_millis()
                ),
            });
        }
        Ok(Self {
            timeout,
            poll_interval,
            condition,
        })
    }

    /// Presence policy with the given timing
    pub fn present(timeout: Duration, poll_interval: Duration) -> HarnessResult<Self> {
        Self::new(WaitCondition::Present, timeout, poll_interval)
    }

    /// Visibility policy with the given timing
    pub fn visible(timeout: Duration, poll_interval: Duration) -> HarnessResult<Self> {
        Self::new(WaitCondition::Visible, timeout, poll_interval)
    }

    /// Full-match-set policy with the given timing
    pub fn all_present(timeout: Duration, poll_interval: Duration) -> HarnessResult<Self> {
        Self::new(WaitCondition::AllPresent, timeout, poll_interval)
    }

    /// Non-empty-value policy with the given timing
    pub fn value_non_empty(timeout: Duration, poll_interval: Duration) -> HarnessResult<Self> {
        Self::new(WaitCondition::ValueNonEmpty, timeout, poll_interval)
    }

    /// The wait timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// The condition being polled for
    #[must_use]
    pub const fn condition(&self) -> WaitCondition {
        self.condition
    }

    /// Timeout in whole milliseconds, for error reporting
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    pub(crate) fn for_condition(&self, condition: WaitCondition) -> Self {
        Self {
            condition,
            ..self.clone()
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            condition: WaitCondition::Present,
        }
    }
}

fn pick<'a>(
    handles: &'a [ElementHandle],
    condition: WaitCondition,
) -> Option<&'a ElementHandle> {
    match condition {
        WaitCondition::Visible => handles.iter().find(|handle| handle.visible),
        _ => handles.first(),
    }
}

/// Wait until `query` satisfies the policy's condition, returning the first
/// matching element.
///
/// Queries matching multiple nodes return the first match; callers needing
/// the whole set use [`wait_for_all`].
///
/// # Errors
///
/// [`HarnessError::NotFound`] when the condition never holds within the
/// timeout.
pub async fn wait_for(
    driver: &dyn Driver,
    query: &ElementQuery,
    policy: &WaitPolicy,
) -> HarnessResult<ElementHandle> {
    let deadline = Instant::now() + policy.timeout();
    loop {
        let handles = driver.resolve(query).await?;
        if let Some(handle) = pick(&handles, policy.condition()) {
            return Ok(handle.clone());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::NotFound {
                query: query.to_string(),
                condition: policy.condition().describe(),
                timeout_ms: policy.timeout_ms(),
            });
        }
        sleep(policy.poll_interval()).await;
    }
}

/// Wait for the full match set of `query`.
///
/// A set that is still empty at the timeout is returned as an empty vector
/// rather than an error, so count-based assertions ("no delete buttons for
/// this user") need no special failure path.
pub async fn wait_for_all(
    driver: &dyn Driver,
    query: &ElementQuery,
    policy: &WaitPolicy,
) -> HarnessResult<Vec<ElementHandle>> {
    let deadline = Instant::now() + policy.timeout();
    loop {
        let handles = driver.resolve(query).await?;
        if !handles.is_empty() {
            return Ok(handles);
        }
        if Instant::now() >= deadline {
            return Ok(Vec::new());
        }
        sleep(policy.poll_interval()).await;
    }
}

/// Probe whether `query` resolves to a visible element within the timeout.
///
/// A timeout is an answer here, not a failure: the result is `false`. Only
/// backend transport errors propagate.
pub async fn is_visible(
    driver: &dyn Driver,
    query: &ElementQuery,
    policy: &WaitPolicy,
) -> HarnessResult<bool> {
    match wait_for(driver, query, &policy.for_condition(WaitCondition::Visible)).await {
        Ok(_) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Wait until the form value of `query` becomes non-empty, returning the
/// first non-empty value observed.
///
/// # Errors
///
/// [`HarnessError::NotFound`] if the element never renders at all;
/// [`HarnessError::GenerationTimeout`] if it renders but its value is still
/// empty at the timeout. The two are distinct so an operator can tell "the
/// field never appeared" from "generation never completed".
pub async fn wait_for_value(
    driver: &dyn Driver,
    query: &ElementQuery,
    policy: &WaitPolicy,
) -> HarnessResult<String> {
    let deadline = Instant::now() + policy.timeout();
    let mut ever_resolved = false;
    loop {
        let handles = driver.resolve(query).await?;
        if let Some(handle) = handles.first() {
            ever_resolved = true;
            let value = driver.value(handle).await?;
            if !value.is_empty() {
                return Ok(value);
            }
        }
        if Instant::now() >= deadline {
            if ever_resolved {
                return Err(HarnessError::GenerationTimeout {
                    query: query.to_string(),
                    timeout_ms: policy.timeout_ms(),
                });
            }
            return Err(HarnessError::NotFound {
                query: query.to_string(),
                condition: WaitCondition::ValueNonEmpty.describe(),
                timeout_ms: policy.timeout_ms(),
            });
        }
        sleep(policy.poll_interval()).await;
    }
}
