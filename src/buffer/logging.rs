use super::ReadOutcome;
use super::observer::{Observer, Snapshot};
use crate::error::BufferResult;
use log::{Level, debug, log_enabled, trace, warn};

const TARGET: &str = "membuf";

/// Observer that reports buffer activity through the `log` facade.
///
/// State descriptors are logged at debug level. The full valid contents are
/// only copied out and logged when trace level is enabled for `membuf`.
#[derive(Debug, Clone)]
pub struct LogObserver {
    name: String,
}

impl LogObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn log_data(&self, op: &str, state: &Snapshot<'_>) {
        if log_enabled!(target: TARGET, Level::Trace) {
            trace!(target: TARGET, "{}: {}: Data: {:?}", self.name, op, state.to_bytes());
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new("membuf")
    }
}

impl Observer for LogObserver {
    fn on_allocate(&mut self, block: usize, state: Snapshot<'_>) {
        debug!(
            target: TARGET,
            "{}: adding another block (index {}) {}",
            self.name,
            block,
            state.stats()
        );
    }

    fn on_read(&mut self, data: &[u8], outcome: ReadOutcome, state: Snapshot<'_>) {
        if all_zero(data) {
            warn!(target: TARGET, "{}: read {} bytes that are all zero", self.name, data.len());
        }
        debug!(
            target: TARGET,
            "{}: read {} bytes (end of data: {}) {}",
            self.name,
            outcome.count,
            outcome.end_of_data,
            state.stats()
        );
        self.log_data("Read", &state);
    }

    fn on_write(&mut self, data: &[u8], state: Snapshot<'_>) {
        debug!(
            target: TARGET,
            "{}: wrote {} bytes {}",
            self.name,
            data.len(),
            state.stats()
        );
        self.log_data("Write", &state);
    }

    fn on_seek(&mut self, result: &BufferResult<u64>, state: Snapshot<'_>) {
        match result {
            Ok(offset) => debug!(
                target: TARGET,
                "{}: seek to {} {}",
                self.name,
                offset,
                state.stats()
            ),
            Err(e) => debug!(target: TARGET, "{}: seek failed: {} {}", self.name, e, state.stats()),
        }
    }
}

/// True for a non-empty slice holding only zero bytes.
fn all_zero(data: &[u8]) -> bool {
    !data.is_empty() && data.iter().all(|&b| b == 0)
}
