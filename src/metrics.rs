//! This module provides a way to gather timing metrics for a machine run
//!

use std::time::Duration;
use std::time::Instant;

use log::debug;

#[derive(Debug)]
struct RawMetrics {
    record_start: Instant,
    cycles_executed: u64,
}

#[derive(Debug)]
pub struct Metrics {
    pub recorded_time: Duration,
    pub cycles_per_second: u64,
}

pub struct Collector {
    collecting: RawMetrics,
}

impl Collector {
    pub fn new() -> Self {
        Self {
            collecting: RawMetrics {
                record_start: Instant::now(),
                cycles_executed: 0,
            },
        }
    }

    pub fn collect(&mut self) -> Metrics {
        debug!("Raw metrics: {:?}", self.collecting);
        let recorded_time = Instant::now() - self.collecting.record_start;
        let cycles_per_second = (self.collecting.cycles_executed as u128) * 1_000_000
            / recorded_time.as_micros().max(1);

        let metrics = Metrics {
            recorded_time,
            cycles_per_second: cycles_per_second as u64,
        };

        self.collecting.record_start = Instant::now();
        self.collecting.cycles_executed = 0;

        metrics
    }

    pub fn observe_cycle(&mut self) {
        self.collecting.cycles_executed += 1;
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
