use log::debug;

/// Receives "samples processed so far" while a clip is fed. Purely
/// informational; nothing depends on what a sink does.
pub trait ProgressSink {
    fn report_progress(&mut self, processed: usize, total: usize);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn report_progress(&mut self, _processed: usize, _total: usize) {}
}

/// Logs each time another tenth of the clip has been processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgressSink {
    last_step: usize,
}

impl ProgressSink for LogProgressSink {
    fn report_progress(&mut self, processed: usize, total: usize) {
        if total == 0 {
            return;
        }
        let step = processed.min(total) * 10 / total;
        if step > self.last_step {
            self.last_step = step;
            debug!("Processed {}% ({processed}/{total} samples)", step * 10);
        }
    }
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn report_progress(&mut self, processed: usize, total: usize) {
        self(processed, total);
    }
}
