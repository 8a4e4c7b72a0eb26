use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use ga_ascii::Compositor;
use ga_core::color::Rgb;
use ga_core::config::Settings;
use ga_core::frame::{ArtResult, PixelGrid};
use ga_export::{ansi, html, png, share, text};
use ga_source::{Resizer, SamplingSpec, prepare};

use crate::cli::OutputFormat;

/// Sampling grid + conversion, with the buffers reused across renders.
///
/// Held by whoever renders repeatedly (the watch loop), like the compositor
/// it wraps.
#[derive(Default)]
pub struct Renderer {
    resizer: Resizer,
    compositor: Compositor,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `source` with one settings snapshot.
    ///
    /// Settings are validated before any pixel work.
    ///
    /// # Errors
    /// Returns an error if the settings are invalid or the source exceeds the size limit.
    pub fn render(&mut self, source: &PixelGrid, settings: &Settings) -> Result<ArtResult> {
        let config = settings
            .to_render_config()
            .context("Réglages invalides")?;
        let spec = SamplingSpec::from_settings(settings);
        let grid = prepare(source, spec, &mut self.resizer)?;
        Ok(self.compositor.process(&grid, &config))
    }
}

/// Destination d'un rendu : format + fichier ou stdout.
#[derive(Clone, Debug)]
pub struct Sink {
    format: OutputFormat,
    output: Option<PathBuf>,
    /// Efface le terminal avant chaque trame ANSI sur stdout.
    redraw: bool,
    /// Police TrueType/OpenType du rendu PNG.
    font: Option<Arc<[u8]>>,
    /// Page devant `?art=` dans un lien de partage.
    share_base: String,
}

impl Sink {
    #[must_use]
    pub fn new(format: OutputFormat, output: Option<PathBuf>) -> Self {
        Self {
            format,
            output,
            redraw: false,
            font: None,
            share_base: String::new(),
        }
    }

    /// Same sink, redrawing in place (watch mode).
    #[must_use]
    pub fn redrawing(mut self) -> Self {
        self.redraw = true;
        self
    }

    /// Font bytes used by the PNG format.
    #[must_use]
    pub fn with_font(mut self, font: impl Into<Arc<[u8]>>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Base URL of share links.
    #[must_use]
    pub fn with_share_base(mut self, base: impl Into<String>) -> Self {
        self.share_base = base.into();
        self
    }

    /// Resolved output file; a directory gets the format's default file name.
    #[must_use]
    pub fn target(&self) -> Option<PathBuf> {
        let path = self.output.as_deref()?;
        if path.is_dir() {
            Some(path.join(default_file_name(self.format)))
        } else {
            Some(path.to_path_buf())
        }
    }

    /// Write `art` in the sink's format. `zoom` is the HTML/PNG font size.
    ///
    /// # Errors
    /// Returns an error if the destination cannot be written, or the PNG
    /// format has no usable font.
    pub fn emit(&self, art: &ArtResult, zoom: u32) -> Result<()> {
        match self.target() {
            Some(path) => self.emit_file(&path, art, zoom),
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                self.emit_to(&mut out, art, zoom)
            }
        }
    }

    fn emit_file(&self, path: &Path, art: &ArtResult, zoom: u32) -> Result<()> {
        if self.format == OutputFormat::Text {
            return text::write_text(path, art);
        }
        let file =
            File::create(path).with_context(|| format!("Impossible de créer {}", path.display()))?;
        let mut out = BufWriter::new(file);
        match self.format {
            OutputFormat::Ansi => ansi::write_ansi(&mut out, art)?,
            _ => self.emit_to(&mut out, art, zoom)?,
        }
        out.flush()
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!("Export {:?} : {}", self.format, path.display());
        Ok(())
    }

    fn emit_to<W: Write>(&self, out: &mut W, art: &ArtResult, zoom: u32) -> Result<()> {
        match self.format {
            OutputFormat::Text => out.write_all(art.text.as_bytes())?,
            OutputFormat::Html => {
                let page = html::to_document(art, zoom, Rgb::BLACK);
                out.write_all(page.as_bytes())?;
            }
            OutputFormat::Ansi if self.redraw => ansi::write_ansi_frame(out, art)?,
            OutputFormat::Ansi => ansi::write_ansi(out, art)?,
            OutputFormat::Png => {
                let font = self
                    .font
                    .as_deref()
                    .context("Le format png exige une police (--font)")?;
                out.write_all(&png::to_png(art, font, zoom, Rgb::BLACK)?)?;
            }
            OutputFormat::ShareUrl => {
                writeln!(out, "{}", share::share_url(&self.share_base, art))?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn default_file_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => text::DEFAULT_TEXT_FILE,
        OutputFormat::Html => html::DEFAULT_HTML_FILE,
        OutputFormat::Ansi => ansi::DEFAULT_ANSI_FILE,
        OutputFormat::Png => png::DEFAULT_PNG_FILE,
        OutputFormat::ShareUrl => share::DEFAULT_SHARE_FILE,
    }
}
