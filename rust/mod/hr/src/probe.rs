//! Debounced email-availability checks.
//!
//! Each keystroke schedules a check that runs once input has been stable
//! for the window. Scheduling again aborts the pending check and bumps a
//! sequence number; a response whose ticket is no longer the latest is
//! dropped, so a slow stale reply can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pointer_client::{ApiError, EmailProbe};
use tokio::task::JoinHandle;
use tracing::debug;

pub struct DebouncedProbe {
    window: Duration,
    seq: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedProbe {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seq: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Supersede any pending check with one for `email`. `apply` runs with
    /// the probe's answer only if no newer check was scheduled meanwhile.
    /// Returns the ticket of the new check.
    pub fn schedule<F>(&self, probe: Arc<dyn EmailProbe>, email: String, apply: F) -> u64
    where
        F: FnOnce(Result<bool, ApiError>) + Send + 'static,
    {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let seq = Arc::clone(&self.seq);
        let window = self.window;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if seq.load(Ordering::SeqCst) != ticket {
                return;
            }
            let result = probe.check_email_available(&email).await;
            if seq.load(Ordering::SeqCst) != ticket {
                debug!(ticket, "stale availability response discarded");
                return;
            }
            apply(result);
        });

        if let Some(previous) = self.pending.lock().unwrap().replace(handle) {
            previous.abort();
        }
        ticket
    }

    /// Drop any pending check without scheduling a new one.
    pub fn cancel(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.pending.lock().unwrap().take() {
            previous.abort();
        }
    }

    pub fn latest(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }
}

impl Drop for DebouncedProbe {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.lock().unwrap().take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    /// Answers "available" unless the email is listed as taken; optional
    /// per-email latency.
    #[derive(Default)]
    struct FakeProbe {
        taken: Vec<&'static str>,
        delays: HashMap<&'static str, Duration>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmailProbe for FakeProbe {
        async fn check_email_available(&self, email: &str) -> Result<bool, ApiError> {
            self.calls.lock().unwrap().push(email.to_string());
            if let Some(d) = self.delays.get(email) {
                tokio::time::sleep(*d).await;
            }
            Ok(!self.taken.contains(&email))
        }
    }

    type Applied = Arc<Mutex<Vec<(String, bool)>>>;

    fn recorder(applied: &Applied, email: &str) -> impl FnOnce(Result<bool, ApiError>) + Send + 'static {
        let applied = Arc::clone(applied);
        let email = email.to_string();
        move |r| applied.lock().unwrap().push((email, r.unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_probes_once() {
        let fake = Arc::new(FakeProbe::default());
        let probe = DebouncedProbe::new(Duration::from_millis(500));
        let applied: Applied = Default::default();

        for email in ["a", "an", "ana@pointer.d", "ana@pointer.dev"] {
            probe.schedule(fake.clone(), email.into(), recorder(&applied, email));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(fake.calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*fake.calls.lock().unwrap(), vec!["ana@pointer.dev".to_string()]);
        assert_eq!(
            *applied.lock().unwrap(),
            vec![("ana@pointer.dev".to_string(), true)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_stale_response_is_not_applied() {
        let fake = Arc::new(FakeProbe {
            taken: vec!["gabriel.gestor@pointer.dev"],
            delays: HashMap::from([("gabriel.gestor@pointer.dev", Duration::from_secs(3))]),
            ..Default::default()
        });
        let probe = DebouncedProbe::new(Duration::from_millis(500));
        let applied: Applied = Default::default();

        let email = "gabriel.gestor@pointer.dev";
        probe.schedule(fake.clone(), email.into(), recorder(&applied, email));
        // The first check is now in flight.
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(fake.calls.lock().unwrap().len(), 1);

        let newer = "novo@pointer.dev";
        let ticket = probe.schedule(fake.clone(), newer.into(), recorder(&applied, newer));
        assert_eq!(probe.latest(), ticket);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fake.calls.lock().unwrap().len(), 2);
        assert_eq!(*applied.lock().unwrap(), vec![(newer.to_string(), true)]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_check() {
        let fake = Arc::new(FakeProbe::default());
        let probe = DebouncedProbe::new(Duration::from_millis(500));
        let applied: Applied = Default::default();

        probe.schedule(fake.clone(), "x@y.com".into(), recorder(&applied, "x@y.com"));
        probe.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fake.calls.lock().unwrap().is_empty());
        assert!(applied.lock().unwrap().is_empty());
    }
}
