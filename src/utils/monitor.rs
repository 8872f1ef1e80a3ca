#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub rows: usize,
    pub memory_usage_mb: u64,
    pub elapsed_time: Duration,
}

/// 記錄每個階段（讀取、比對、輸出）的記憶體與耗時
#[cfg(feature = "cli")]
pub struct RunMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    phases: Mutex<Vec<PhaseStats>>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        let pid = sysinfo::get_current_pid().ok();
        system.refresh_all();

        Self {
            system: Mutex::new(system),
            pid,
            start_time: Instant::now(),
            phases: Mutex::new(Vec::new()),
            enabled,
        }
    }

    fn memory_mb(&self) -> Option<u64> {
        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(self.pid?)?;
        Some(process.memory() / 1024 / 1024)
    }

    pub fn record_phase(&self, phase: &str, rows: usize) {
        if !self.enabled {
            return;
        }

        let stats = PhaseStats {
            phase: phase.to_string(),
            rows,
            memory_usage_mb: self.memory_mb().unwrap_or(0),
            elapsed_time: self.start_time.elapsed(),
        };

        tracing::info!(
            "📊 {} - rows: {}, memory: {}MB, time: {:?}",
            stats.phase,
            stats.rows,
            stats.memory_usage_mb,
            stats.elapsed_time
        );

        if let Ok(mut phases) = self.phases.lock() {
            phases.push(stats);
        }
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self
            .phases()
            .iter()
            .map(|p| p.memory_usage_mb)
            .max()
            .unwrap_or(0);
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
            self.start_time.elapsed(),
            peak
        );
    }

    pub fn phases(&self) -> Vec<PhaseStats> {
        self.phases.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境提供空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct RunMonitor;

#[cfg(not(feature = "cli"))]
impl RunMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn record_phase(&self, _phase: &str, _rows: usize) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
