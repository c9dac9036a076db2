//! Configuration audit logging
//!
//! Every configuration write, and every already-present read during
//! default seeding, emits one line on a channel. Together the lines form
//! an audit trail of configuration state over the device's lifetime.
//!
//! ## Channels
//!
//! - `Metric`: transmitted off-device with telemetry
//! - `NoSend`: retained locally only, used for sensitive values
//! - `Event`: operational records (storage recovery, lifecycle)

use core::fmt;
use heapless::{HistoryBuf, String, Vec};

/// Maximum log line size in bytes
pub const LOG_LINE_SIZE: usize = 192;

/// Ring buffer capacity in number of lines
pub const LOG_BUFFER_SIZE: usize = 32;

/// Destination channel for one log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogChannel {
    /// Transmitted off-device as telemetry
    Metric,
    /// Retained locally, never transmitted
    NoSend,
    /// Operational event record
    Event,
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogChannel::Metric => write!(f, "metric"),
            LogChannel::NoSend => write!(f, "nosend"),
            LogChannel::Event => write!(f, "event"),
        }
    }
}

/// Sink consuming channelized log lines
pub trait LogSink {
    /// Deliver one formatted line to `channel`
    fn log(&mut self, channel: LogChannel, line: &str);
}

/// Sink that discards every line
#[derive(Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&mut self, _channel: LogChannel, _line: &str) {}
}

/// One recorded log line
#[derive(Debug, Clone)]
pub struct LogLine {
    pub channel: LogChannel,
    pub line: String<LOG_LINE_SIZE>,
}

/// Ring buffer sink for log lines
///
/// Stores up to [`LOG_BUFFER_SIZE`] lines. When full, the oldest line is
/// evicted to make room and the overflow counter is incremented.
pub struct RingBufferSink {
    buffer: HistoryBuf<LogLine, LOG_BUFFER_SIZE>,
    overflow_count: u32,
}

impl RingBufferSink {
    /// Create a new empty ring buffer sink
    pub const fn new() -> Self {
        Self {
            buffer: HistoryBuf::new(),
            overflow_count: 0,
        }
    }

    /// Return the current number of lines in the buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Return true if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Return the number of lines lost to buffer overflow
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    /// Iterate over lines in oldest-first order
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.buffer.oldest_ordered()
    }

    /// Iterate over the lines recorded on one channel, oldest first
    pub fn lines_on(&self, channel: LogChannel) -> impl Iterator<Item = &LogLine> {
        self.iter().filter(move |l| l.channel == channel)
    }

    /// Drain all lines, returning them in oldest-first order
    pub fn drain(&mut self) -> Vec<LogLine, LOG_BUFFER_SIZE> {
        let mut result = Vec::new();
        for line in self.buffer.oldest_ordered() {
            let _ = result.push(line.clone());
        }
        self.buffer.clear();
        result
    }

    /// Clear all lines without resetting the overflow counter
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for RingBufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for RingBufferSink {
    fn log(&mut self, channel: LogChannel, line: &str) {
        if self.buffer.len() == LOG_BUFFER_SIZE {
            self.overflow_count = self.overflow_count.saturating_add(1);
        }
        let mut stored = String::new();
        if stored.push_str(line).is_err() {
            // Keep as many whole characters as fit
            for ch in line.chars() {
                if stored.push(ch).is_err() {
                    break;
                }
            }
        }
        self.buffer.write(LogLine {
            channel,
            line: stored,
        });
    }
}
