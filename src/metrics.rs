use std::sync::atomic::{AtomicU64, Ordering};

/// Advisory request counters, shared across workers via `web::Data`
#[derive(Debug, Default)]
pub struct Metrics {
    file_server_hits: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file_server_hit(&self) {
        self.file_server_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn file_server_hits(&self) -> u64 {
        self.file_server_hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.file_server_hits.store(0, Ordering::Relaxed);
    }
}
