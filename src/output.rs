use crate::model::{Finding, OutputConfig, OutputFormat, Section, TargetSpec};
use std::io::{self, BufWriter, Write};

/// jsonl emits one object per accepted entry and nothing else.
pub struct OutputSink<W: Write> {
    cfg: OutputConfig,
    writer: BufWriter<W>,
}

impl OutputSink<io::Stdout> {
    pub fn stdout(cfg: OutputConfig) -> Self {
        Self::new(cfg, io::stdout())
    }
}

impl<W: Write> OutputSink<W> {
    pub fn new(cfg: OutputConfig, writer: W) -> Self {
        Self {
            cfg,
            writer: BufWriter::new(writer),
        }
    }

    pub fn banner(&mut self, target: &TargetSpec) -> io::Result<()> {
        if self.cfg.format == OutputFormat::Pretty {
            writeln!(
                self.writer,
                "Testing TLS configuration of {}:{}...",
                target.host, target.port
            )?;
        }
        Ok(())
    }

    pub fn section(&mut self, section: Section) -> io::Result<()> {
        if self.cfg.format == OutputFormat::Pretty {
            let title = match section {
                Section::Version => "Supported versions of SSL/TLS:",
                Section::Cipher => "Supported cipher suites:",
            };
            writeln!(self.writer)?;
            writeln!(self.writer, "{title}")?;
        }
        Ok(())
    }

    pub fn finding(&mut self, finding: &Finding) -> io::Result<()> {
        match self.cfg.format {
            OutputFormat::Pretty => writeln!(self.writer, "{}", finding.name)?,
            OutputFormat::Jsonl => {
                let line = serde_json::to_string(finding)?;
                writeln!(self.writer, "{line}")?;
            }
        }
        self.writer.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}
