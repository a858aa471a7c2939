use crate::command::Command;
use crate::messages::CommandRequest;
use std::time::{Duration, Instant};

use super::CommandSink;

/// What [`CommandClient::submit`] did with a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Same command already sent within the heartbeat interval
    Skipped,
    Failed,
}

/// Last command delivered and when
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchState {
    last: Option<Command>,
    sent_at: Option<Instant>,
}

impl DispatchState {
    /// A command is due when it differs from the last one delivered, or
    /// when the last delivery is at least `heartbeat` old.
    pub fn is_due(&self, command: &Command, now: Instant, heartbeat: Duration) -> bool {
        match (self.last, self.sent_at) {
            (Some(last), Some(sent_at)) if last == *command => {
                now.saturating_duration_since(sent_at) >= heartbeat
            }
            _ => true,
        }
    }

    pub fn last(&self) -> Option<Command> {
        self.last
    }

    fn record(&mut self, command: Command, now: Instant) {
        self.last = Some(command);
        self.sent_at = Some(now);
    }

    fn clear(&mut self) {
        self.last = None;
        self.sent_at = None;
    }
}

/// Rate-limited command sender
///
/// This client:
/// - Drops repeats of the last delivered command
/// - Re-sends an unchanged command once per heartbeat interval
/// - Forgets the last command after a failed send so the next one goes out
///   immediately
/// - Never queues or retries on its own: the newest command wins
pub struct CommandClient<S> {
    sink: S,
    state: DispatchState,
    heartbeat: Duration,
}

impl<S: CommandSink> CommandClient<S> {
    pub fn new(sink: S, heartbeat: Duration) -> Self {
        Self {
            sink,
            state: DispatchState::default(),
            heartbeat,
        }
    }

    pub async fn submit(&mut self, command: Command) -> SendOutcome {
        self.submit_at(command, Instant::now()).await
    }

    pub async fn submit_at(&mut self, command: Command, now: Instant) -> SendOutcome {
        if !self.state.is_due(&command, now, self.heartbeat) {
            tracing::debug!("Skipping {}, already sent", command);
            return SendOutcome::Skipped;
        }

        self.transmit(command, now).await
    }

    /// Send a final STOP regardless of what was sent before.
    pub async fn shutdown(&mut self) -> SendOutcome {
        tracing::info!("Sending final {}", Command::Stop);
        self.transmit(Command::Stop, Instant::now()).await
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    async fn transmit(&mut self, command: Command, now: Instant) -> SendOutcome {
        tracing::info!("Sending command: {}", command);

        match self.sink.send(&CommandRequest::from(&command)).await {
            Ok(()) => {
                self.state.record(command, now);
                SendOutcome::Sent
            }
            Err(e) => {
                tracing::warn!("Failed to send {}: {}", command.name(), e);
                self.state.clear();
                SendOutcome::Failed
            }
        }
    }
}
