use crate::messages::Detection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::{self, BufRead};
use tokio::sync::mpsc;

/// Longest detector line accepted; longer lines are dropped as missing frames
pub const MAX_LINE_BYTES: usize = 64 * 1024;

const EVENT_QUEUE: usize = 4;

/// What the hand-pose detector produced for one camera frame
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Frame(Detection),
    /// Camera delivered nothing usable for this frame
    NoFrame,
}

/// Source of per-frame hand detections
#[async_trait]
pub trait HandTracker: Send {
    /// Next frame's detections, or `None` once the detector has stopped.
    async fn next_event(&mut self) -> Result<Option<TrackerEvent>>;
}

/// Reads detector output as JSON lines, one frame per line
///
/// This tracker:
/// - Reads on its own thread, so a quiet detector never holds up shutdown
/// - Treats `null` and blank lines as missing frames
/// - Drops unparsable, non-UTF-8 and oversized lines as missing frames
/// - Only gives up on a real read error
pub struct JsonLinesTracker {
    events: mpsc::Receiver<io::Result<TrackerEvent>>,
}

impl JsonLinesTracker {
    pub fn spawn<R: BufRead + Send + 'static>(reader: R) -> Result<Self> {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE);

        std::thread::Builder::new()
            .name("detector-reader".to_string())
            .spawn(move || read_events(reader, tx))
            .context("Failed to start detector reader thread")?;

        Ok(Self { events: rx })
    }
}

#[async_trait]
impl HandTracker for JsonLinesTracker {
    async fn next_event(&mut self) -> Result<Option<TrackerEvent>> {
        match self.events.recv().await {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(e)) => Err(e).context("Failed to read detector output"),
            None => Ok(None),
        }
    }
}

fn read_events<R: BufRead>(mut reader: R, tx: mpsc::Sender<io::Result<TrackerEvent>>) {
    loop {
        let event = match read_line(&mut reader) {
            Ok(Some(Line::Complete(bytes))) => Ok(parse_line(&bytes)),
            Ok(Some(Line::TooLong(len))) => {
                tracing::warn!("Detector line of {} bytes is too long, skipping frame", len);
                Ok(TrackerEvent::NoFrame)
            }
            Ok(None) => break,
            Err(e) => Err(e),
        };

        let fatal = event.is_err();
        // Receiver gone means the vision loop has stopped.
        if tx.blocking_send(event).is_err() || fatal {
            break;
        }
    }
}

enum Line {
    Complete(Vec<u8>),
    TooLong(usize),
}

/// Read up to the next `\n`, keeping at most [`MAX_LINE_BYTES`] in memory.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Line>> {
    let mut line = Vec::new();
    let mut len = 0usize;
    let mut seen_any = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if available.is_empty() {
            if !seen_any {
                return Ok(None);
            }
            break;
        }
        seen_any = true;

        let (chunk_len, used, done) = match available.iter().position(|b| *b == b'\n') {
            Some(i) => (i, i + 1, true),
            None => (available.len(), available.len(), false),
        };

        len += chunk_len;
        if len <= MAX_LINE_BYTES {
            line.extend_from_slice(&available[..chunk_len]);
        } else if !line.is_empty() {
            line = Vec::new();
        }

        reader.consume(used);
        if done {
            break;
        }
    }

    if len > MAX_LINE_BYTES {
        Ok(Some(Line::TooLong(len)))
    } else {
        Ok(Some(Line::Complete(line)))
    }
}

fn parse_line(line: &[u8]) -> TrackerEvent {
    let line = line.trim_ascii();
    if line.is_empty() {
        return TrackerEvent::NoFrame;
    }

    match serde_json::from_slice::<Option<Detection>>(line) {
        Ok(Some(detection)) => TrackerEvent::Frame(detection),
        Ok(None) => TrackerEvent::NoFrame,
        Err(e) => {
            tracing::warn!("Unreadable detector line, skipping frame: {}", e);
            TrackerEvent::NoFrame
        }
    }
}
