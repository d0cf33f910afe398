//! Stage timing for orchestrated trade flows.

use log::{debug, info};
use std::time::{Duration, Instant};

/// Records named checkpoints for one flow and logs the breakdown when finished.
#[derive(Debug)]
pub struct Timer {
    start_time: Instant,
    operation_name: String,
    checkpoints: Vec<(String, Instant)>,
}

impl Timer {
    pub fn start(operation_name: &str) -> Self {
        debug!("Starting timer for: {}", operation_name);
        Self {
            start_time: Instant::now(),
            operation_name: operation_name.to_string(),
            checkpoints: Vec::new(),
        }
    }

    pub fn checkpoint(&mut self, checkpoint_name: &str) {
        let now = Instant::now();
        self.checkpoints.push((checkpoint_name.to_string(), now));
        debug!(
            "{} - {}: {}ms",
            self.operation_name,
            checkpoint_name,
            now.duration_since(self.start_time).as_millis()
        );
    }

    pub fn checkpoint_names(&self) -> Vec<&str> {
        self.checkpoints.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn finish(self) -> Duration {
        let total_duration = self.start_time.elapsed();
        info!("{} completed in {}ms", self.operation_name, total_duration.as_millis());

        let mut last_time = self.start_time;
        for (name, time) in &self.checkpoints {
            debug!("   {}: {}ms", name, time.duration_since(last_time).as_millis());
            last_time = *time;
        }
        total_duration
    }
}
