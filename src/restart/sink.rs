//! Telemetry sinks for [`RestartRecord`]s.
//!
//! The scheduler only calls [`RestartSink::append`]; where the records go
//! (memory, a CSV file, nowhere) is decided by the caller.

use super::record::RestartRecord;
use std::io::{self, Write};

/// Receives restart records in the order they are produced.
pub trait RestartSink {
    /// Appends one record.
    fn append(&mut self, record: &RestartRecord);
}

impl RestartSink for Vec<RestartRecord> {
    fn append(&mut self, record: &RestartRecord) {
        self.push(record.clone());
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RestartSink for NullSink {
    fn append(&mut self, _record: &RestartRecord) {}
}

/// Column header written by [`CsvSink`].
pub const CSV_HEADER: &str = "t_ms,run_idx,start_node,greedy_cost,localsearch_cost,improve,\
improve_ratio,already_optimal,best_so_far,best_per_node";

/// Writes records as CSV rows, one line per restart.
///
/// Costs are written with four decimals, the ratio with six. The first
/// I/O error is latched; later appends are ignored and the error is
/// returned by [`finish`](Self::finish).
///
/// # Examples
///
/// ```
/// use u_tsp::restart::{CsvSink, CSV_HEADER};
///
/// let sink = CsvSink::new(Vec::new());
/// let bytes = sink.finish().expect("in-memory writes cannot fail");
/// assert_eq!(String::from_utf8(bytes).unwrap().trim_end(), CSV_HEADER);
/// ```
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    header_written: bool,
    error: Option<io::Error>,
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer. The header is written lazily, at the first append
    /// or at [`finish`](Self::finish).
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            error: None,
        }
    }

    fn write_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{CSV_HEADER}")?;
            self.header_written = true;
        }
        Ok(())
    }

    fn write_record(&mut self, r: &RestartRecord) -> io::Result<()> {
        self.write_header()?;
        writeln!(
            self.writer,
            "{},{},{},{:.4},{:.4},{:.4},{:.6},{},{:.4},{:.4}",
            r.elapsed.as_millis(),
            r.restart,
            r.start_vertex,
            r.cost_before,
            r.cost_after,
            r.improvement,
            r.improvement_ratio,
            u8::from(r.already_optimal),
            r.best_so_far,
            r.best_per_vertex,
        )
    }

    /// Flushes the writer and returns it, or the first error seen.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.write_header()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> RestartSink for CsvSink<W> {
    fn append(&mut self, record: &RestartRecord) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_record(record) {
            tracing::warn!(error = %err, "telemetry write failed; further records dropped");
            self.error = Some(err);
        }
    }
}
