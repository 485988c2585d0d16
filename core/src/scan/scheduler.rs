/// A timer deadline that has come due, carrying its scheduled instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Scan(u64),
    Cleanup(u64),
}

impl Tick {
    pub fn at_ms(&self) -> u64 {
        match *self {
            Tick::Scan(at) | Tick::Cleanup(at) => at,
        }
    }
}

/// Tick source for the two periodic timers, driven by an explicit clock.
///
/// The scan timer only runs while armed; the cleanup timer always runs.
#[derive(Debug, Clone)]
pub struct Scheduler {
    scan_period_ms: u64,
    cleanup_period_ms: u64,
    next_scan: Option<u64>,
    next_cleanup: u64,
}

impl Scheduler {
    pub fn new(scan_period_ms: u64, cleanup_period_ms: u64, origin_ms: u64) -> Self {
        let cleanup_period_ms = cleanup_period_ms.max(1);
        Self {
            scan_period_ms: scan_period_ms.max(1),
            cleanup_period_ms,
            next_scan: None,
            next_cleanup: origin_ms + cleanup_period_ms,
        }
    }

    pub fn arm_scan(&mut self, now_ms: u64) {
        self.next_scan = Some(now_ms + self.scan_period_ms);
    }

    pub fn disarm_scan(&mut self) {
        self.next_scan = None;
    }

    pub fn scan_armed(&self) -> bool {
        self.next_scan.is_some()
    }

    /// Returns every tick due at or before `now_ms` in firing order.
    ///
    /// Ties fire the scan tick first.
    pub fn due(&mut self, now_ms: u64) -> Vec<Tick> {
        let mut ticks = Vec::new();
        loop {
            let scan = self.next_scan.filter(|&at| at <= now_ms);
            let cleanup = Some(self.next_cleanup).filter(|&at| at <= now_ms);
            match (scan, cleanup) {
                (Some(scan_at), Some(cleanup_at)) if scan_at <= cleanup_at => {
                    ticks.push(Tick::Scan(scan_at));
                    self.next_scan = Some(scan_at + self.scan_period_ms);
                }
                (_, Some(cleanup_at)) => {
                    ticks.push(Tick::Cleanup(cleanup_at));
                    self.next_cleanup = cleanup_at + self.cleanup_period_ms;
                }
                (Some(scan_at), None) => {
                    ticks.push(Tick::Scan(scan_at));
                    self.next_scan = Some(scan_at + self.scan_period_ms);
                }
                (None, None) => break,
            }
        }
        ticks
    }
}
