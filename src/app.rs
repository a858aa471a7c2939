use crate::command::Command;
use crate::gesture;
use crate::tracker::{HandTracker, TrackerEvent};
use crate::transport::{CommandClient, CommandSink, SendOutcome};

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Frame loop of the vision process
///
/// One classification per frame, strictly in order. Each send is bounded by
/// the sink's timeout, so a slow robot delays the next frame by at most that
/// much.
pub struct VisionApp<T, S> {
    tracker: T,
    client: CommandClient<S>,
    speed: f64,
    frame_retry: Duration,
}

impl<T: HandTracker, S: CommandSink> VisionApp<T, S> {
    pub fn new(tracker: T, client: CommandClient<S>, speed: f64, frame_retry: Duration) -> Self {
        Self {
            tracker,
            client,
            speed,
            frame_retry,
        }
    }

    /// Run until Ctrl+C or until the detector stops.
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl+C, shutting down");
        })
        .await
    }

    /// Run until `shutdown` resolves or the detector stops, then send a final STOP.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                event = self.tracker.next_event() => match event {
                    Ok(Some(event)) => self.handle_event(event).await,
                    Ok(None) => {
                        tracing::info!("Detector stream ended");
                        break Ok(());
                    }
                    Err(e) => break Err(e),
                },
                _ = &mut shutdown => break Ok(()),
            }
        };

        if self.client.shutdown().await != SendOutcome::Sent {
            tracing::warn!("Final {} could not be delivered", Command::Stop);
        }

        tracing::info!("Vision loop stopped");
        result
    }

    async fn handle_event(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::Frame(detection) => {
                let command = gesture::classify_frame(&detection.hands, self.speed);
                tracing::debug!("{} hand(s) -> {}", detection.hands.len(), command);
                self.client.submit(command).await;
            }
            TrackerEvent::NoFrame => {
                tracing::debug!("No frame available, skipping");
                tokio::time::sleep(self.frame_retry).await;
            }
        }
    }
}
