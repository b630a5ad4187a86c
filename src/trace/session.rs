use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::marker::ScopeMarker;
use super::queue::TraceQueue;
use super::writer::write_trace;
use crate::clock::Clock;
use crate::config::TraceConfig;
use crate::error::{ProfilerError, Result};

/// Top-level tracer.
///
/// Opens a marker for itself on creation. When it ends, that marker is
/// closed and every record in the queue is written to
/// `<output_dir>/<file_prefix><YYYY_MM_DD-HH_MM_SS>.json`, leaving the
/// queue empty.
///
/// Call [`finish`](Self::finish) to get the path or the error back.
/// Dropping an unfinished session flushes too, but can only log failures.
pub struct TraceSession {
    config: TraceConfig,
    queue: Arc<TraceQueue>,
    opening: Option<ScopeMarker>,
    start: Instant,
}

impl TraceSession {
    /// Session with a fresh queue of its own.
    pub fn new(config: TraceConfig) -> Self {
        Self::with_queue(config, TraceQueue::shared())
    }

    /// Session that flushes an existing queue.
    pub fn with_queue(config: TraceConfig, queue: Arc<TraceQueue>) -> Self {
        let opening = queue.marker(config.session_name.clone());
        let start = opening.clock().instant();
        tracing::debug!(dir = %config.output_dir.display(), "trace session opened");
        Self {
            config,
            queue,
            opening: Some(opening),
            start,
        }
    }

    /// Queue that markers for this session should push into.
    pub fn queue(&self) -> &Arc<TraceQueue> {
        &self.queue
    }

    /// Origin all event timestamps are relative to.
    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// End the session and write the trace file.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.flush()
    }

    fn flush(&mut self) -> Result<PathBuf> {
        if let Some(opening) = self.opening.take() {
            opening.finish();
        }

        // Drain first: the queue ends up empty whatever happens below
        let records = self.queue.drain();
        let count = records.len();

        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|e| ProfilerError::io(dir, e))?;

        let stem = format!("{}{}", self.config.file_prefix, Clock::current_stamp());
        let (path, file) = create_unique(dir, &stem)?;
        let mut w = BufWriter::new(file);
        write_trace(&mut w, &self.config, records, self.start)?;
        w.flush().map_err(|e| ProfilerError::io(&path, e))?;

        tracing::info!(path = %path.display(), events = count, "trace written");
        Ok(path)
    }
}

/// Most sessions sharing one second and one directory before giving up
const MAX_NAME_SUFFIX: u32 = 1_000;

/// Create `<stem>.json`, or `<stem>-1.json`, `<stem>-2.json`, ... when an
/// earlier trace already holds the name. Never truncates an existing file.
fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File)> {
    for n in 0..=MAX_NAME_SUFFIX {
        let path = match n {
            0 => dir.join(format!("{stem}.json")),
            n => dir.join(format!("{stem}-{n}.json")),
        };
        match File::options().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(ProfilerError::io(path, e)),
        }
    }
    Err(ProfilerError::io(
        dir.join(format!("{stem}-{MAX_NAME_SUFFIX}.json")),
        io::Error::new(ErrorKind::AlreadyExists, "no free trace file name"),
    ))
}

impl Drop for TraceSession {
    fn drop(&mut self) {
        // Already flushed through `finish`
        if self.opening.is_none() {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::error!(error = %e, "failed to write trace on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_writes_file_and_empties_queue() {
        let dir = tempfile::tempdir().unwrap();
        let session = TraceSession::new(TraceConfig::in_dir(dir.path()));
        let queue = session.queue().clone();
        queue.in_scope("work", || {});

        let path = session.finish().unwrap();
        assert!(path.exists());
        assert!(path.starts_with(dir.path()));
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("ProfilerData"));
        assert!(file_name.ends_with(".json"));
        assert!(queue.is_empty());
    }

    #[test]
    fn creates_missing_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = TraceSession::new(TraceConfig::in_dir(&nested)).finish().unwrap();
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn io_failure_is_reported_and_queue_still_drained() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should go
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let session = TraceSession::new(TraceConfig::in_dir(blocker.join("out")));
        let queue = session.queue().clone();
        queue.in_scope("lost", || {});

        let err = session.finish().unwrap_err();
        assert!(matches!(err, ProfilerError::Io { .. }));
        assert!(queue.is_empty());
    }

    #[test]
    fn back_to_back_sessions_keep_both_traces() {
        let dir = tempfile::tempdir().unwrap();

        let first = TraceSession::new(TraceConfig::in_dir(dir.path()));
        first.queue().in_scope("first", || {});
        let a = first.finish().unwrap();

        let second = TraceSession::new(TraceConfig::in_dir(dir.path()));
        second.queue().in_scope("second", || {});
        let b = second.finish().unwrap();

        assert_ne!(a, b);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
        assert!(fs::read_to_string(&a).unwrap().contains("\"first\""));
        assert!(fs::read_to_string(&b).unwrap().contains("\"second\""));
    }

    #[test]
    fn taken_names_get_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stem.json"), b"keep").unwrap();
        fs::write(dir.path().join("stem-1.json"), b"keep").unwrap();

        let (path, _file) = create_unique(dir.path(), "stem").unwrap();
        assert_eq!(path, dir.path().join("stem-2.json"));
        assert_eq!(fs::read(dir.path().join("stem.json")).unwrap(), b"keep");
    }

    #[test]
    fn drop_flushes_unfinished_session() {
        let dir = tempfile::tempdir().unwrap();
        {
            let session = TraceSession::new(TraceConfig::in_dir(dir.path()));
            session.queue().in_scope("dropped", || {});
        }
        let written: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
    }
}
