//! Driver double that records every call, for tests.

use crate::error::DriverError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::MotorDriver;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Forward(f64),
    Backward(f64),
    Stop,
}

/// Call with its start and end time
#[derive(Debug, Clone)]
pub struct Span {
    pub call: Call,
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Default)]
struct Shared {
    spans: Mutex<Vec<Span>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Cloneable handle; every clone sees the same call log.
#[derive(Clone, Default)]
pub struct RecordingDriver {
    shared: Arc<Shared>,
    delay: Duration,
    fail: bool,
}

impl RecordingDriver {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.spans().into_iter().map(|span| span.call).collect()
    }

    pub fn spans(&self) -> Vec<Span> {
        self.shared.spans.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }

    async fn record(&self, call: Call) -> Result<(), DriverError> {
        let started = Instant::now();
        let now = self.shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.shared.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.shared.spans.lock().unwrap().push(Span {
            call,
            started,
            finished: Instant::now(),
        });

        if self.fail {
            return Err(DriverError::Hardware("pin unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MotorDriver for RecordingDriver {
    async fn drive_forward(&mut self, speed: f64) -> Result<(), DriverError> {
        self.record(Call::Forward(speed)).await
    }

    async fn drive_backward(&mut self, speed: f64) -> Result<(), DriverError> {
        self.record(Call::Backward(speed)).await
    }

    async fn stop(&mut self) -> Result<(), DriverError> {
        self.record(Call::Stop).await
    }
}
