use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use tablesmith_core::{Schema, Table, WorkflowError};

/// A materialized table registered with the in-memory workflow.
///
/// Immutable once registered; operations always produce a new artifact.
#[derive(Debug, Clone)]
pub struct MemArtifact {
    pub label: String,
    pub filename: PathBuf,
    pub schema: Schema,
    pub table: Table,
}

impl MemArtifact {
    pub fn new(
        label: impl Into<String>,
        filename: impl Into<PathBuf>,
        schema: Schema,
        table: Table,
    ) -> Self {
        Self {
            label: label.into(),
            filename: filename.into(),
            schema,
            table,
        }
    }

    pub fn rows(&self) -> usize {
        self.table.num_rows()
    }

    /// Write the artifact as headered CSV; returns bytes written.
    pub fn serialize(&self, path: &Path) -> Result<u64, WorkflowError> {
        let writer = BufWriter::new(File::create(path)?);
        let counting = CountingWriter::new(writer);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(counting);

        let header: Vec<&str> = self.table.labels().collect();
        writer.write_record(&header).map_err(csv_error)?;

        for row in 0..self.table.num_rows() {
            let record: Vec<String> = self
                .table
                .columns()
                .iter()
                .map(|column| column.values[row].to_csv())
                .collect();
            writer.write_record(&record).map_err(csv_error)?;
        }

        writer.flush()?;
        let counting = writer
            .into_inner()
            .map_err(|err| csv_error(err.into_error().into()))?;
        debug!(label = %self.label, bytes = counting.bytes_written(), "artifact written");
        Ok(counting.bytes_written())
    }

    /// Read back a CSV written by `serialize` as text cells.
    pub fn deserialize(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), WorkflowError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_error)?;
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record
                .map_err(csv_error)?
                .iter()
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for record in records {
            rows.push(record.map_err(csv_error)?.iter().map(str::to_string).collect());
        }
        Ok((header, rows))
    }

    /// Remove the artifact's on-disk file if present.
    pub fn destroy(&self) -> Result<(), WorkflowError> {
        if self.filename.exists() {
            std::fs::remove_file(&self.filename)?;
        }
        Ok(())
    }
}

fn csv_error(err: csv::Error) -> WorkflowError {
    WorkflowError::Storage(err.to_string())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
