//! Default process-level metrics.
//!
//! Start time and uptime are tracked everywhere. Memory and fd counts are read
//! from `/proc/self` on Linux and skipped elsewhere or when unreadable.

use std::fmt::Write;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub struct ProcessCollector {
    start_unix_secs: f64,
    started: Instant,
}

impl ProcessCollector {
    pub fn new() -> Self {
        let start_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            start_unix_secs,
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub(crate) fn render(&self, out: &mut String) {
        gauge(
            out,
            "process_start_time_seconds",
            "Start time of the process since unix epoch in seconds.",
            self.start_unix_secs,
        );
        gauge(
            out,
            "process_uptime_seconds",
            "Seconds since the metrics registry was created.",
            self.uptime_secs(),
        );

        let mem = read_memory();
        if let Some(rss) = mem.resident_bytes {
            gauge(out, "process_resident_memory_bytes", "Resident memory size in bytes.", rss as f64);
        }
        if let Some(vsz) = mem.virtual_bytes {
            gauge(out, "process_virtual_memory_bytes", "Virtual memory size in bytes.", vsz as f64);
        }
        if let Some(fds) = open_fds() {
            gauge(out, "process_open_fds", "Number of open file descriptors.", fds as f64);
        }
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn gauge(out: &mut String, name: &str, help: &str, v: f64) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} gauge", name);
    let _ = writeln!(out, "{} {}", name, v);
}

#[derive(Debug, Default, PartialEq, Eq)]
struct MemoryUsage {
    resident_bytes: Option<u64>,
    virtual_bytes: Option<u64>,
}

#[cfg(target_os = "linux")]
fn read_memory() -> MemoryUsage {
    std::fs::read_to_string("/proc/self/status")
        .map(|s| parse_status(&s))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
fn read_memory() -> MemoryUsage {
    MemoryUsage::default()
}

#[cfg(target_os = "linux")]
fn open_fds() -> Option<usize> {
    std::fs::read_dir("/proc/self/fd").ok().map(|d| d.count())
}

#[cfg(not(target_os = "linux"))]
fn open_fds() -> Option<usize> {
    None
}

/// Parse `VmRSS` / `VmSize` (reported in kB) out of `/proc/<pid>/status`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_status(s: &str) -> MemoryUsage {
    let kb = |line: &str| -> Option<u64> {
        line.split_whitespace().nth(1)?.parse::<u64>().ok().map(|v| v * 1024)
    };
    let mut usage = MemoryUsage::default();
    for line in s.lines() {
        if line.starts_with("VmRSS:") {
            usage.resident_bytes = kb(line);
        } else if line.starts_with("VmSize:") {
            usage.virtual_bytes = kb(line);
        }
    }
    usage
}
