//! Sink traits and the NDJSON backends.
//!
//! The output directory gets two append-only line streams, created fresh
//! (truncated) per run:
//!
//! - `events.ndjson` — one [`EventRecord`] per line, flushed per batch;
//! - `snapshots.ndjson` — one [`TickSnapshot`] per line, flushed per
//!   snapshot.
//!
//! UTF-8, newline-terminated.  Everything already flushed when a run dies
//! is well-formed NDJSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{EventRecord, OutputResult, TickSnapshot};

/// File name of the event stream.
pub const EVENTS_FILE: &str = "events.ndjson";
/// File name of the snapshot stream.
pub const SNAPSHOTS_FILE: &str = "snapshots.ndjson";

/// Destination for event record batches.
pub trait EventSink: Send {
    /// Write one batch; flush before returning.
    fn write_batch(&mut self, records: &[EventRecord]) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Destination for coalesced snapshots.
pub trait SnapshotSink: Send {
    /// Write one snapshot; flush before returning.
    fn write_snapshot(&mut self, snapshot: &TickSnapshot) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

// ── NDJSON event sink ─────────────────────────────────────────────────────────

/// Writes `events.ndjson` in the given directory.
pub struct NdjsonEventSink {
    writer: BufWriter<File>,
    finished: bool,
}

impl NdjsonEventSink {
    /// Create (truncating any previous run's file) `events.ndjson` in `dir`.
    pub fn create(dir: &Path) -> OutputResult<Self> {
        let file = File::create(dir.join(EVENTS_FILE))?;
        Ok(Self {
            writer: BufWriter::new(file),
            finished: false,
        })
    }
}

impl EventSink for NdjsonEventSink {
    fn write_batch(&mut self, records: &[EventRecord]) -> OutputResult<()> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}

// ── NDJSON snapshot sink ──────────────────────────────────────────────────────

/// Writes `snapshots.ndjson` in the given directory.
pub struct NdjsonSnapshotSink {
    writer: BufWriter<File>,
    finished: bool,
}

impl NdjsonSnapshotSink {
    /// Create (truncating any previous run's file) `snapshots.ndjson` in `dir`.
    pub fn create(dir: &Path) -> OutputResult<Self> {
        let file = File::create(dir.join(SNAPSHOTS_FILE))?;
        Ok(Self {
            writer: BufWriter::new(file),
            finished: false,
        })
    }
}

impl SnapshotSink for NdjsonSnapshotSink {
    fn write_snapshot(&mut self, snapshot: &TickSnapshot) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
