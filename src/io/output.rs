use crate::core::Diagnostic;
use colored::*;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

pub trait OutputWriter {
    fn write_diagnostics(&mut self, diagnostics: &[Diagnostic]) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    count: usize,
    diagnostics: &'a [Diagnostic],
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_diagnostics(&mut self, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        let report = JsonReport {
            count: diagnostics.len(),
            diagnostics,
        };
        let json = serde_json::to_string_pretty(&report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// `path:line:column: message (rule)` lines, the format Go tooling prints.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_diagnostics(&mut self, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        for diagnostic in diagnostics {
            writeln!(
                self.writer,
                "{}: {} {}",
                format!(
                    "{}:{}",
                    diagnostic.file.display(),
                    diagnostic.pos
                )
                .bold(),
                diagnostic.message,
                format!("({})", diagnostic.rule).dimmed()
            )?;
        }

        if !diagnostics.is_empty() {
            let summary = match diagnostics.len() {
                1 => "1 issue found".to_string(),
                n => format!("{n} issues found"),
            };
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", summary.yellow().bold())?;
        }
        Ok(())
    }
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

/// Writer for `--output FILE`, or stdout when no file is given.
pub fn open_destination(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    use anyhow::Context;

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}
