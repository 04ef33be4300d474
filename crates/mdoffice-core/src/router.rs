//! Content router
//!
//! Dispatches a finished [`Conversion`] to the renderers registered for the
//! requested output formats. Renderers live outside this crate; they only
//! need to implement [`Renderer`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::RenderOptions;
use crate::pipeline::Conversion;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Word,
    PowerPoint,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Word,
        OutputFormat::PowerPoint,
        OutputFormat::Pdf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Word => "word",
            OutputFormat::PowerPoint => "powerpoint",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    /// Accepts format names and file extensions, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "word" | "docx" => Ok(OutputFormat::Word),
            "powerpoint" | "pptx" => Ok(OutputFormat::PowerPoint),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(Error::unsupported_format(s)),
        }
    }
}

/// A document renderer for one output format
pub trait Renderer: Send + Sync {
    /// Format this renderer produces
    fn format(&self) -> OutputFormat;

    /// File extension for rendered output, without the dot
    fn file_extension(&self) -> &str;

    /// Render a conversion to bytes
    fn render(&self, conversion: &Conversion, options: &RenderOptions) -> anyhow::Result<Vec<u8>>;
}

/// Maps output formats to renderers
#[derive(Default)]
pub struct ContentRouter {
    renderers: HashMap<OutputFormat, Box<dyn Renderer>>,
}

impl ContentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer under its own format
    ///
    /// Returns the renderer it replaced, if any.
    pub fn register(&mut self, renderer: Box<dyn Renderer>) -> Option<Box<dyn Renderer>> {
        let format = renderer.format();
        log::debug!("Registering {} renderer (.{})", format, renderer.file_extension());
        self.renderers.insert(format, renderer)
    }

    /// Whether a renderer is registered for `format`
    pub fn supports(&self, format: OutputFormat) -> bool {
        self.renderers.contains_key(&format)
    }

    /// Formats with a registered renderer, in declaration order
    pub fn supported_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::ALL
            .into_iter()
            .filter(|f| self.supports(*f))
            .collect()
    }

    /// File extension of the renderer for `format`
    pub fn file_extension(&self, format: OutputFormat) -> Option<&str> {
        self.renderers.get(&format).map(|r| r.file_extension())
    }

    /// Render `conversion` to every requested format
    ///
    /// All formats are checked before any renderer runs, so a missing
    /// renderer never leaves partial output behind.
    pub fn route(
        &self,
        conversion: &Conversion,
        formats: &[OutputFormat],
        options: &RenderOptions,
    ) -> Result<BTreeMap<OutputFormat, Vec<u8>>> {
        let renderers = formats
            .iter()
            .map(|&format| {
                self.renderers
                    .get(&format)
                    .map(|r| (format, r))
                    .ok_or_else(|| Error::renderer_not_registered(format))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut outputs = BTreeMap::new();
        for (format, renderer) in renderers {
            let bytes = renderer
                .render(conversion, options)
                .map_err(|e| Error::render(format, e))?;
            log::debug!("Rendered {}: {} bytes", format, bytes.len());
            outputs.insert(format, bytes);
        }
        Ok(outputs)
    }
}

impl fmt::Debug for ContentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRouter")
            .field("formats", &self.supported_formats())
            .finish()
    }
}
