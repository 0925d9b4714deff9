//! Long-running job poller.
//!
//! A spawned task sleeps one interval, checks the job, and repeats until the job is
//! terminal, the wall-clock ceiling passes, or the owner cancels. The ceiling is
//! measured from [`JobPoller::spawn`] and is independent of per-request HTTP timeouts.
//!
//! No check is issued at or after the ceiling, after a terminal status, or after
//! cancellation.

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use validator::Validate;
use wellspring_types::protocol::StartJobPayload;
use wellspring_types::{AsyncJob, ConfigError, GatewayError, JobStatus, PollerConfig};

use super::transport::JobTransport;

/// How a poll sequence ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Provider reported DONE; the artifact reference to fetch
    Done(String),
    /// Provider reported FAILED, or a check failed unrecoverably
    Failed(GatewayError),
    /// The ceiling elapsed first
    TimedOut,
    /// The owner cancelled
    Cancelled,
}

impl PollOutcome {
    /// Error equivalent for outcomes that are failures. `Done` and `Cancelled` have none.
    pub fn error(&self) -> Option<GatewayError> {
        match self {
            Self::Failed(err) => Some(err.clone()),
            Self::TimedOut => Some(GatewayError::timeout("job did not finish before the ceiling")),
            Self::Done(_) | Self::Cancelled => None,
        }
    }
}

/// Owner's handle on a running poll task. Dropping it cancels the task.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    status: watch::Receiver<JobStatus>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    /// Stop polling. The task resolves to [`PollOutcome::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Live job status.
    pub fn status(&self) -> watch::Receiver<JobStatus> {
        self.status.clone()
    }

    /// Wait for the task to finish.
    pub async fn outcome(mut self) -> PollOutcome {
        let Some(task) = self.task.take() else {
            return PollOutcome::Cancelled;
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => PollOutcome::Cancelled,
            Err(e) => PollOutcome::Failed(
                GatewayError::provider_unavailable(format!("poll task aborted: {}", e)),
            ),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Submits jobs and drives them to completion.
pub struct JobPoller<T> {
    transport: Arc<T>,
    config: PollerConfig,
}

impl<T> Clone for JobPoller<T> {
    fn clone(&self) -> Self {
        Self { transport: Arc::clone(&self.transport), config: self.config }
    }
}

impl<T: JobTransport + 'static> JobPoller<T> {
    /// Fails if the interval or ceiling is zero.
    pub fn new(transport: Arc<T>, config: PollerConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(|e| ConfigError::from_validation_errors(&e))?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Submit a job and return it in SUBMITTED state.
    pub async fn submit(&self, payload: &StartJobPayload) -> Result<AsyncJob, GatewayError> {
        let handle = self.transport.submit(payload).await?;
        info!(operation = %handle, "Job submitted");
        Ok(AsyncJob::submitted(handle))
    }

    /// Start the background poll loop for `job`.
    pub fn spawn(&self, job: AsyncJob) -> PollHandle {
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(job.status());
        let deadline = Instant::now() + self.config.ceiling();

        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.transport),
            job,
            self.config,
            deadline,
            cancel.clone(),
            status_tx,
        ));

        PollHandle { cancel, status: status_rx, task: Some(task) }
    }

    /// Submit and spawn in one step.
    pub async fn start(&self, payload: &StartJobPayload) -> Result<PollHandle, GatewayError> {
        let job = self.submit(payload).await?;
        Ok(self.spawn(job))
    }

    /// Fetch a finished artifact by reference.
    pub async fn fetch(&self, reference: &str) -> Result<Bytes, GatewayError> {
        self.transport.fetch(reference).await
    }
}

async fn poll_loop<T: JobTransport + ?Sized>(
    transport: Arc<T>,
    mut job: AsyncJob,
    config: PollerConfig,
    deadline: Instant,
    cancel: CancellationToken,
    status_tx: watch::Sender<JobStatus>,
) -> PollOutcome {
    loop {
        let tick = Instant::now() + config.interval();

        if tick >= deadline {
            // The next check would land at or past the ceiling: wait it out, no more polls.
            return tokio::select! {
                biased;
                () = cancel.cancelled() => PollOutcome::Cancelled,
                () = sleep_until(deadline) => timed_out(&job),
            };
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => return PollOutcome::Cancelled,
            () = sleep_until(tick) => {},
        }

        let check = tokio::select! {
            biased;
            () = cancel.cancelled() => return PollOutcome::Cancelled,
            () = sleep_until(deadline) => return timed_out(&job),
            check = transport.check(job.handle()) => check,
        };

        let check = match check {
            Ok(check) => check,
            Err(err) if err.is_retryable() => {
                warn!(operation = %job.handle(), kind = %err.kind, "Job check failed, will retry next tick");
                continue;
            },
            Err(err) => return PollOutcome::Failed(err),
        };

        let status = match job.record_poll(check.status, check.result_ref) {
            Ok(status) => status,
            Err(e) => {
                return PollOutcome::Failed(GatewayError::provider_unavailable(e.to_string()));
            },
        };
        status_tx.send_replace(status);
        debug!(operation = %job.handle(), ?status, polls = job.polls(), "Job polled");

        match status {
            JobStatus::Done => {
                let reference = job.result_ref().unwrap_or_default().to_string();
                info!(operation = %job.handle(), polls = job.polls(), "Job done");
                return PollOutcome::Done(reference);
            },
            JobStatus::Failed => {
                let detail = check.error.unwrap_or_else(|| "provider reported FAILED".to_string());
                info!(operation = %job.handle(), polls = job.polls(), "Job failed");
                return PollOutcome::Failed(GatewayError::provider_unavailable(detail));
            },
            JobStatus::Submitted | JobStatus::Pending => {},
        }
    }
}

fn timed_out(job: &AsyncJob) -> PollOutcome {
    warn!(operation = %job.handle(), polls = job.polls(), "Job hit the poll ceiling");
    PollOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use wellspring_types::protocol::JobCheck;
    use wellspring_types::{ErrorKind, JobHandle};

    /// Reports PENDING until `done_after` checks, then DONE (or never, if `None`).
    /// Queued `errors` are returned by the first checks instead of a status.
    struct CountingJobs {
        checks: AtomicUsize,
        done_after: Option<usize>,
        fail: bool,
        errors: Mutex<VecDeque<GatewayError>>,
    }

    impl CountingJobs {
        fn new(done_after: Option<usize>) -> Arc<Self> {
            Self::with_errors(done_after, Vec::new())
        }

        fn failing_after(n: usize) -> Arc<Self> {
            Arc::new(Self {
                checks: AtomicUsize::new(0),
                done_after: Some(n),
                fail: true,
                errors: Mutex::new(VecDeque::new()),
            })
        }

        fn with_errors(done_after: Option<usize>, errors: Vec<GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                checks: AtomicUsize::new(0),
                done_after,
                fail: false,
                errors: Mutex::new(errors.into()),
            })
        }

        fn checks(&self) -> usize {
            self.checks.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobTransport for CountingJobs {
        async fn submit(&self, _payload: &StartJobPayload) -> Result<JobHandle, GatewayError> {
            Ok(JobHandle::new("models/veo/operations/test"))
        }

        async fn check(&self, handle: &JobHandle) -> Result<JobCheck, GatewayError> {
            let n = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(err) = self.errors.lock().unwrap().pop_front() {
                return Err(err);
            }
            let finished = self.done_after.is_some_and(|after| n >= after);
            let (status, result_ref, error) = match (finished, self.fail) {
                (true, false) => (JobStatus::Done, Some("https://files.example/v.mp4".to_string()), None),
                (true, true) => (JobStatus::Failed, None, Some("safety filter".to_string())),
                (false, _) => (JobStatus::Pending, None, None),
            };
            Ok(JobCheck { operation: handle.to_string(), status, result_ref, error })
        }

        async fn fetch(&self, _reference: &str) -> Result<Bytes, GatewayError> {
            Ok(Bytes::from_static(b"mp4"))
        }
    }

    fn config(interval_secs: u64, ceiling_secs: u64) -> PollerConfig {
        PollerConfig { interval_ms: interval_secs * 1000, ceiling_ms: ceiling_secs * 1000 }
    }

    fn payload() -> StartJobPayload {
        StartJobPayload { prompt: "a calm lake".to_string(), image: None, aspect_ratio: None }
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_on_third_poll_stops_after_three() {
        let transport = CountingJobs::new(Some(3));
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();

        let started = Instant::now();
        let handle = poller.start(&payload()).await.unwrap();
        let status = handle.status();
        let outcome = handle.outcome().await;

        assert_eq!(outcome, PollOutcome::Done("https://files.example/v.mp4".to_string()));
        assert_eq!(transport.checks(), 3);
        assert_eq!(*status.borrow(), JobStatus::Done);
        assert_eq!(started.elapsed(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.checks(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_terminal_times_out_without_polling_past_ceiling() {
        let transport = CountingJobs::new(None);
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 35)).unwrap();

        let started = Instant::now();
        let outcome = poller.start(&payload()).await.unwrap().outcome().await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(outcome.error().map(|e| e.kind), Some(ErrorKind::Timeout));
        assert_eq!(transport.checks(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(35));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_on_interval_boundary_skips_that_poll() {
        let transport = CountingJobs::new(None);
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 30)).unwrap();

        let outcome = poller.start(&payload()).await.unwrap().outcome().await;
        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(transport.checks(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_stops_polling() {
        let transport = CountingJobs::failing_after(2);
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();

        let outcome = poller.start(&payload()).await.unwrap().outcome().await;
        match outcome {
            PollOutcome::Failed(err) => {
                assert_eq!(err.kind, ErrorKind::ProviderUnavailable);
                assert_eq!(err.detail.as_deref(), Some("safety filter"));
            },
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(transport.checks(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let transport = CountingJobs::new(None);
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();
        let handle = poller.start(&payload()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(transport.checks(), 1);

        handle.cancel();
        assert_eq!(handle.outcome().await, PollOutcome::Cancelled);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(transport.checks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let transport = CountingJobs::new(None);
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();
        let handle = poller.start(&payload()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(25)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(transport.checks(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_check_waits_one_interval() {
        let transport = CountingJobs::new(Some(1));
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();
        let handle = poller.start(&payload()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(transport.checks(), 0);
        assert_eq!(*handle.status().borrow(), JobStatus::Submitted);
        assert!(matches!(handle.outcome().await, PollOutcome::Done(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_check_error_keeps_polling() {
        let transport = CountingJobs::with_errors(
            Some(3),
            vec![GatewayError::network("connection reset"), GatewayError::rate_limited("HTTP 429")],
        );
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();

        let started = Instant::now();
        let outcome = poller.start(&payload()).await.unwrap().outcome().await;

        assert_eq!(outcome, PollOutcome::Done("https://files.example/v.mp4".to_string()));
        assert_eq!(transport.checks(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_check_error_stops_polling() {
        let transport = CountingJobs::with_errors(
            None,
            vec![GatewayError::invalid_request("unknown operation")],
        );
        let poller = JobPoller::new(Arc::clone(&transport), config(10, 600)).unwrap();

        let outcome = poller.start(&payload()).await.unwrap().outcome().await;
        match outcome {
            PollOutcome::Failed(err) => {
                assert_eq!(err.kind, ErrorKind::InvalidRequest);
                assert_eq!(err.detail.as_deref(), Some("unknown operation"));
            },
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(transport.checks(), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.checks(), 1);
    }

    #[test]
    fn test_zero_interval_or_ceiling_rejected() {
        let transport = CountingJobs::new(None);
        let zero_interval = PollerConfig { interval_ms: 0, ceiling_ms: 600_000 };
        let err = JobPoller::new(Arc::clone(&transport), zero_interval).err().unwrap();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "interval_ms"));

        let zero_ceiling = PollerConfig { interval_ms: 10_000, ceiling_ms: 0 };
        let err = JobPoller::new(transport, zero_ceiling).err().unwrap();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "ceiling_ms"));
    }
}
