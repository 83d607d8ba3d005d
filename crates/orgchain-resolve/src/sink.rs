//! Result sinks: where finished runs go.

use crate::assembly::RunReport;
use crate::error::Result;
use std::io::Write;

/// Accepts a finished run.
pub trait ResultSink {
    fn accept(&mut self, report: &RunReport) -> Result<()>;
}

/// Writes the report as JSON.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn accept(&mut self, report: &RunReport) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, report)?;
        } else {
            serde_json::to_writer(&mut self.writer, report)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<RunReport>,
}

impl ResultSink for MemorySink {
    fn accept(&mut self, report: &RunReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}
