//! Ordered conversion stages.

use super::{ConvertOptions, ConvertReport, OutputFormat};
use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::docx::{ContainerRewriter, InjectionReport};
use crate::error::{Error, Result};
use crate::html::ColumnStyleTemplate;
use crate::load::LoaderRegistry;
use crate::render::{ChromiumRenderer, PassThroughRenderer, RenderOutput, Renderer};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs one conversion at a time with fixed options.
pub struct Converter {
    options: ConvertOptions,
    loaders: LoaderRegistry,
    pdf_renderer: Arc<dyn Renderer>,
}

impl Converter {
    /// Create a converter with the built-in loaders and a Chromium PDF renderer.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            loaders: LoaderRegistry::with_defaults(),
            pdf_renderer: Arc::new(ChromiumRenderer::new()),
        }
    }

    /// Replace the renderer used for PDF output.
    pub fn with_pdf_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.pdf_renderer = renderer;
        self
    }

    /// Replace the loader registry used for HTML and PDF output.
    pub fn with_loaders(mut self, loaders: LoaderRegistry) -> Self {
        self.loaders = loaders;
        self
    }

    /// Conversion options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one file and write the result.
    pub async fn convert<P: AsRef<Path>>(&self, input: P) -> Result<ConvertReport> {
        let input = input.as_ref();
        let format = self.options.output_format;
        let output = self
            .options
            .output_path
            .clone()
            .unwrap_or_else(|| default_output_path(input, format, self.options.layout.columns.count));

        let data = read_input(input).await?;
        log::info!("Read {} ({:.2} KB)", input.display(), kb(data.len() as u64));

        let input_format = detect_format_from_bytes(&data)?;
        if input_format == InputFormat::LegacyDoc {
            return Err(Error::Conversion(
                "legacy .doc files are not supported; save the document as .docx".to_string(),
            ));
        }

        let (bytes, sections) = match format {
            OutputFormat::Docx => {
                let (bytes, report) = self.rewrite_package(input_format, &data)?;
                (bytes, Some(report))
            }
            OutputFormat::Html | OutputFormat::Pdf => {
                let rendered = self.render_markup(input, input_format, &data).await?;
                (rendered.into_bytes(), None)
            }
        };

        write_output(&output, &bytes).await?;
        let output_size = verify_output(&output).await?;

        Ok(ConvertReport {
            input: input.to_path_buf(),
            output,
            format,
            input_size: data.len() as u64,
            output_size,
            sections,
            finished_at: chrono::Utc::now(),
        })
    }

    fn rewrite_package(
        &self,
        input_format: InputFormat,
        data: &[u8],
    ) -> Result<(Vec<u8>, InjectionReport)> {
        if !input_format.is_structured() {
            return Err(Error::Conversion(format!(
                "{} input has no section model; choose HTML or PDF output",
                input_format
            )));
        }
        ContainerRewriter::new(&self.options.layout.columns).rewrite_bytes(data)
    }

    async fn render_markup(
        &self,
        input: &Path,
        input_format: InputFormat,
        data: &[u8],
    ) -> Result<RenderOutput> {
        let loader_name = match input_format {
            InputFormat::Docx => "docx",
            _ => "html",
        };
        let loader = self
            .loaders
            .get_by_name(loader_name)
            .ok_or_else(|| Error::Conversion(format!("no loader for {} input", input_format)))?;

        let flat = loader.flatten(data).await?;
        let title = flat.title.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let layout = &self.options.layout;
        let template = ColumnStyleTemplate::new(layout.page.clone(), layout.columns.count);
        let html = template.wrap_titled(&flat.markup, &title);

        match self.options.output_format {
            OutputFormat::Pdf => self.pdf_renderer.render(&html).await,
            _ => PassThroughRenderer.render(&html).await,
        }
    }
}

/// Default output path: `<stem>-<N>columns.<ext>` next to the input.
pub fn default_output_path(input: &Path, format: OutputFormat, columns: u32) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{}-{}columns.{}", stem, columns, format.extension());
    input.with_file_name(name)
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingInput(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if metadata.len() == 0 {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }

    let data = tokio::fs::read(path).await?;
    if data.is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }
    Ok(data)
}

/// Write through a sibling temporary file so a failed write never leaves a
/// truncated output behind.
async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::OutputWrite(path.to_path_buf()))?
        .to_string_lossy();
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        log::warn!("Failed to write {}: {}", tmp.display(), e);
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::OutputWrite(path.to_path_buf()));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        log::warn!("Failed to move output into place: {}", e);
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::OutputWrite(path.to_path_buf()));
    }
    Ok(())
}

async fn verify_output(path: &Path) -> Result<u64> {
    match tokio::fs::metadata(path).await {
        Ok(m) if m.is_file() && m.len() > 0 => Ok(m.len()),
        _ => Err(Error::OutputWrite(path.to_path_buf())),
    }
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}
