//! Bounded-concurrency batch runner.
//!
//! A batch is a list of independent tasks of one kind (fetch a source listing,
//! or fetch and extract one article). At most `pool_size` run at once; the
//! caller waits until every task has finished, or until the optional deadline
//! passes. Each task yields `Result<T>`: errors and panics are logged with the
//! batch label and dropped, so one bad source or article never costs the rest.
//! Results arrive in completion order.

use crate::config::SearchConfig;
use crate::error::Result;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Concurrency limits for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub pool_size: usize,
    pub deadline: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pool_size: 5,
            deadline: None,
        }
    }
}

impl BatchOptions {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            pool_size: config.pool_size.max(1),
            deadline: config.batch_deadline(),
        }
    }
}

/// Run `task` over every item with bounded concurrency and keep the successes.
///
/// # Arguments
///
/// * `label` - Batch name attached to every log event
/// * `items` - One input per task
/// * `options` - Worker count and optional deadline
/// * `describe` - Context for an item (URL, source, title) logged when its
///   task fails or panics
/// * `task` - Turns one item into a future yielding `Result<T>`
///
/// # Returns
///
/// The `Ok` values in completion order. Failed, empty and panicked tasks are
/// logged and left out; with a deadline, unfinished tasks are abandoned.
pub async fn run_batch<I, T, D, F, Fut>(
    label: &str,
    items: Vec<I>,
    options: BatchOptions,
    describe: D,
    task: F,
) -> Vec<T>
where
    D: Fn(&I) -> String,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let total = items.len();
    let t0 = Instant::now();

    let outcomes = stream::iter(items)
        .map(|item| {
            let context = describe(&item);
            let fut = task(item);
            async move { (context, AssertUnwindSafe(fut).catch_unwind().await) }
        })
        .buffer_unordered(options.pool_size.max(1));

    let outcomes: Vec<_> = match options.deadline {
        Some(deadline) => outcomes.take_until(sleep(deadline)).collect().await,
        None => outcomes.collect().await,
    };

    let finished = outcomes.len();
    let mut results = Vec::with_capacity(finished);
    for (item, outcome) in outcomes {
        match outcome {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(e)) if e.is_empty_result() => warn!(batch = label, %item, error = %e, "Task produced no result"),
            Ok(Err(e)) => error!(batch = label, %item, error = %e, "Task failed"),
            Err(panic) => error!(batch = label, %item, reason = panic_message(&*panic), "Task panicked"),
        }
    }

    if finished < total {
        warn!(
            batch = label,
            abandoned = total - finished,
            "Batch deadline reached; returning partial results"
        );
    }
    info!(
        batch = label,
        total,
        succeeded = results.len(),
        elapsed_ms = t0.elapsed().as_millis(),
        "Batch complete"
    );
    results
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn label(n: &u64) -> String {
        format!("item-{n}")
    }

    /// Log sink shared with a thread-local subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let mut results = run_batch("test", vec![1u64, 2, 3, 4], BatchOptions::default(), label, |n| async move {
            if n % 2 == 0 {
                Err(SearchError::Parse {
                    source_name: "test".to_string(),
                    reason: format!("bad {n}"),
                })
            } else {
                Ok(n * 10)
            }
        })
        .await;
        results.sort();
        assert_eq!(results, vec![10, 30]);
    }

    #[tokio::test]
    async fn test_panicking_task_does_not_abort_batch() {
        let results = run_batch("test", vec![1u64, 2, 3], BatchOptions::default(), label, |n| async move {
            if n == 2 {
                panic!("boom");
            }
            Ok(n)
        })
        .await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_logs_carry_item_context() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let urls = vec![
            "https://x.com/ok".to_string(),
            "https://x.com/panics".to_string(),
            "https://x.com/empty".to_string(),
        ];
        let results = run_batch(
            "articles",
            urls,
            BatchOptions::default(),
            |url| format!("{url} [bing_news] Apple stock rises"),
            |url| async move {
                if url.ends_with("panics") {
                    panic!("malformed page");
                }
                if url.ends_with("empty") {
                    return Err(SearchError::ExtractionEmpty {
                        url,
                        reason: "no substantial paragraphs".to_string(),
                    });
                }
                Ok(url)
            },
        )
        .await;

        assert_eq!(results, vec!["https://x.com/ok".to_string()]);
        let output = logs.contents();
        let panic_line = output.lines().find(|l| l.contains("Task panicked")).unwrap();
        assert!(panic_line.contains("https://x.com/panics [bing_news] Apple stock rises"));
        assert!(panic_line.contains("malformed page"));
        let empty_line = output.lines().find(|l| l.contains("Task produced no result")).unwrap();
        assert!(empty_line.contains("https://x.com/empty [bing_news]"));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let options = BatchOptions {
            pool_size: 2,
            deadline: None,
        };

        let results = run_batch("test", (0..6).collect(), options, label, |n: u64| {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(n)
            }
        })
        .await;

        assert_eq!(results.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_results() {
        let options = BatchOptions {
            pool_size: 4,
            deadline: Some(Duration::from_millis(100)),
        };
        let results = run_batch("test", vec![10u64, 5_000], options, label, |ms| async move {
            sleep(Duration::from_millis(ms)).await;
            Ok(ms)
        })
        .await;
        assert_eq!(results, vec![10]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results: Vec<u64> =
            run_batch("test", Vec::<u64>::new(), BatchOptions::default(), label, |n| async move { Ok(n) }).await;
        assert!(results.is_empty());
    }
}
