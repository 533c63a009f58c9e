//! Lightweight instrumentation for tree mutations.
//!
//! Timing scopes report through `tracing` when enabled. A separate mutation
//! log can be written to a file to replay which editing cases fired. Both
//! are off by default and cost one atomic load per call while off.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static TIMING: AtomicBool = AtomicBool::new(false);
static LOGGING: AtomicBool = AtomicBool::new(false);
static MUTATION_LOG: LazyLock<Mutex<Option<MutationLog>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        tracing::info!(target: "stringtree::perf", "{}: {:.1} us", self.name, elapsed_us);
    }
}

#[derive(Debug)]
struct MutationLog {
    start: Instant,
    writer: BufWriter<File>,
}

fn mutation_log() -> MutexGuard<'static, Option<MutationLog>> {
    MUTATION_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Start writing mutation events to `path`, or stop with `None`.
pub fn set_mutation_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = mutation_log();
    *log = match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "stringtree mutation log start")?;
            writer.flush()?;
            Some(MutationLog {
                start: Instant::now(),
                writer,
            })
        }
        None => None,
    };
    LOGGING.store(log.is_some(), Ordering::Relaxed);
    Ok(())
}

/// Append one event. `detail` is only formatted while a log is open.
pub fn log_event(name: &str, detail: fmt::Arguments<'_>) {
    if !LOGGING.load(Ordering::Relaxed) {
        return;
    }
    if let Some(log) = mutation_log().as_mut() {
        let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
        let _ = writeln!(log.writer, "[{elapsed_ms:>10.3} ms] {name}: {detail}");
        let _ = log.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StringTree;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_mutation_log_records_editing_cases_until_closed() {
        let temp_file = NamedTempFile::new().unwrap();
        set_mutation_log_path(Some(temp_file.path())).unwrap();

        let mut tree = StringTree::from_text("hello");
        tree.insert(5, " world").unwrap();
        tree.delete_range(0, 6).unwrap();
        set_mutation_log_path(None).unwrap();
        log_event("log.after_close", format_args!("dropped"));

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("stringtree mutation log start"));
        assert!(content.contains("insert.end"));
        assert!(content.contains("delete_range.interior"));
        assert!(!content.contains("log.after_close"));
    }
}
