//! PDF rendering through a headless Chromium-family browser.

use super::{RenderOutput, Renderer};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

/// Default browser executable.
pub const DEFAULT_BINARY: &str = "chromium";

/// Default time allowed for one render.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Prints HTML to PDF with `--headless --print-to-pdf`.
///
/// The page size comes from the document's `@page` rule and backgrounds are
/// printed because the template sets `print-color-adjust: exact`.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    binary: PathBuf,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl ChromiumRenderer {
    /// Create a renderer using the default executable.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            timeout: DEFAULT_TIMEOUT,
            extra_args: Vec::new(),
        }
    }

    /// Set the browser executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the render timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pass an additional command-line argument (e.g. `--no-sandbox`).
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// The browser executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-pdf-header-footer".to_string(),
            format!("--print-to-pdf={}", output.display()),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(format!("file://{}", input.display()));
        args
    }
}

impl Default for ChromiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn render(&self, markup: &str) -> Result<RenderOutput> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");
        tokio::fs::write(&input, markup).await?;

        let args = self.args(&input, &output);
        log::debug!("Running {} {}", self.binary.display(), args.join(" "));

        let run = tokio::process::Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                Error::Conversion(format!(
                    "{} did not finish within {}s",
                    self.binary.display(),
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                Error::Conversion(format!("could not start {}: {}", self.binary.display(), e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::Conversion(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                result.status,
                stderr.trim()
            )));
        }

        let pdf = tokio::fs::read(&output)
            .await
            .map_err(|_| Error::Conversion("renderer did not produce a PDF".to_string()))?;
        if !pdf.starts_with(b"%PDF") {
            return Err(Error::Conversion(
                "renderer output is not a PDF document".to_string(),
            ));
        }

        log::info!("Rendered PDF ({} bytes)", pdf.len());
        Ok(RenderOutput::Pdf(pdf))
    }
}
