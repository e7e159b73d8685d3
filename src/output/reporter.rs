use super::*;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use super::text::TextGenerator;

pub struct Reporter {
    format: OutputFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    /// Writes to `output_path` (extension added if missing) or to stdout.
    pub fn new(format: &str, output_path: Option<&str>) -> Result<Self> {
        let format = OutputFormat::from(format);
        let output_path = output_path.map(|p| PathBuf::from(super::add_file_extension(p, &format)));

        Ok(Self {
            format,
            output_path,
        })
    }

    pub fn render(&self, report: &RepositoryReport) -> Result<String> {
        match self.format {
            OutputFormat::Text => {
                // colour only makes sense on a terminal
                TextGenerator::new(self.output_path.is_none()).generate(report)
            }
            OutputFormat::Json => JsonGenerator.generate(report),
        }
    }

    pub fn generate_report(&self, report: &RepositoryReport) -> Result<()> {
        let content = self.render(report)?;

        match &self.output_path {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!("Report saved to {}", path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}
