//! Concurrent dual-backend writes.
//!
//! Some operations write the same data to the general API and the process
//! API. Both legs always run to completion; the combined result succeeds only
//! when both do, and otherwise names each failed leg.

use std::fmt;
use std::future::Future;

use assistdesk_types::error::RequestError;
use tracing::warn;

/// One leg of a fan-out and its outcome.
#[derive(Debug)]
pub struct Leg<T> {
    pub label: &'static str,
    pub result: Result<T, RequestError>,
}

impl<T> Leg<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.result.as_ref().err()
    }
}

/// Outcome of two concurrent requests.
#[derive(Debug)]
pub struct FanOut<A, B> {
    pub first: Leg<A>,
    pub second: Leg<B>,
}

impl<A, B> FanOut<A, B> {
    pub fn is_success(&self) -> bool {
        self.first.is_ok() && self.second.is_ok()
    }

    pub fn failed_labels(&self) -> Vec<&'static str> {
        self.failures().into_iter().map(|(label, _)| label).collect()
    }

    /// Every failed leg with its error, in leg order.
    pub fn failures(&self) -> Vec<(&'static str, &RequestError)> {
        let mut failures = Vec::new();
        if let Some(err) = self.first.error() {
            failures.push((self.first.label, err));
        }
        if let Some(err) = self.second.error() {
            failures.push((self.second.label, err));
        }
        failures
    }

    /// Both values, or the first failure in leg order.
    pub fn into_result(self) -> Result<(A, B), RequestError> {
        Ok((self.first.result?, self.second.result?))
    }
}

impl<A, B> fmt::Display for FanOut<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return write!(f, "{} and {} succeeded", self.first.label, self.second.label);
        }
        let parts: Vec<String> = self
            .failures()
            .into_iter()
            .map(|(label, err)| format!("{label} failed: {err}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Run both requests concurrently and report each outcome.
pub async fn join_both<A, B, FA, FB>(
    first_label: &'static str,
    first: FA,
    second_label: &'static str,
    second: FB,
) -> FanOut<A, B>
where
    FA: Future<Output = Result<A, RequestError>>,
    FB: Future<Output = Result<B, RequestError>>,
{
    let (first, second) = tokio::join!(first, second);
    let report = FanOut {
        first: Leg {
            label: first_label,
            result: first,
        },
        second: Leg {
            label: second_label,
            result: second,
        },
    };
    if !report.is_success() {
        warn!(failed = ?report.failed_labels(), "fan-out partially failed");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn both_legs_succeed() {
        let report = join_both("general", async { Ok(1) }, "process", async { Ok("ok") }).await;
        assert!(report.is_success());
        assert!(report.failed_labels().is_empty());
        assert_eq!(report.to_string(), "general and process succeeded");
        assert_eq!(report.into_result().unwrap(), (1, "ok"));
    }

    #[tokio::test]
    async fn partial_failure_names_the_failed_leg() {
        let report = join_both(
            "general",
            async { Ok::<_, RequestError>(()) },
            "process",
            async { Err::<(), _>(RequestError::Timeout) },
        )
        .await;

        assert!(!report.is_success());
        assert!(report.first.is_ok());
        assert_eq!(report.failed_labels(), vec!["process"]);
        assert_eq!(report.to_string(), format!("process failed: {}", RequestError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_failure_does_not_cancel_other_leg() {
        let report = join_both(
            "general",
            async { Err::<(), _>(RequestError::Network("refused".into())) },
            "process",
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, RequestError>(42)
            },
        )
        .await;

        assert_eq!(report.failed_labels(), vec!["general"]);
        assert_eq!(*report.second.result.as_ref().unwrap(), 42);
    }

    #[tokio::test]
    async fn both_failures_are_reported() {
        let report = join_both(
            "general",
            async { Err::<(), _>(RequestError::Timeout) },
            "process",
            async { Err::<(), _>(RequestError::Timeout) },
        )
        .await;
        assert_eq!(report.failed_labels(), vec!["general", "process"]);
    }
}
