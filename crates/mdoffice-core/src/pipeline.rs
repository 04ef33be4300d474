//! Conversion pipeline
//!
//! Runs the stages in order: tokenize, validate, build, analyze. Validation
//! diagnostics at warning level or above stop the conversion with a
//! [`ParseError`] unless the pipeline was told to ignore them.
//!
//! # Example
//!
//! ```
//! use mdoffice_core::Pipeline;
//!
//! let pipeline = Pipeline::new();
//! let conversion = pipeline.convert("# Notes\n\nSome *text*.").unwrap();
//! assert_eq!(conversion.title(), Some("Notes"));
//!
//! // H1 straight to H3 is a warning, which is blocking by default
//! assert!(pipeline.convert("# A\n### B").is_err());
//! assert!(Pipeline::new().ignore_errors(true).convert("# A\n### B").is_ok());
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mdoffice_analyze::Report;
use mdoffice_ast::Ast;

use crate::builder::AstBuilder;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, ParseError, Result};
use crate::options::RenderOptions;
use crate::router::{ContentRouter, OutputFormat, Renderer};
use crate::tokenizer::Tokenizer;

/// Result of converting one document
#[derive(Debug, Clone)]
pub struct Conversion {
    pub ast: Ast,
    pub report: Report,
    /// Every diagnostic validation produced, blocking or not
    pub diagnostics: Diagnostics,
}

impl Conversion {
    /// Document title: the first H1, else the front-matter title
    pub fn title(&self) -> Option<&str> {
        self.report.title()
    }
}

/// Outcome for one file of a batch
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<Conversion>,
}

/// Markdown conversion pipeline
pub struct Pipeline {
    tokenizer: Tokenizer,
    builder: AstBuilder,
    router: ContentRouter,
    ignore_errors: bool,
    continue_on_error: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a pipeline with the default validators and no renderers
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            builder: AstBuilder::new(),
            router: ContentRouter::new(),
            ignore_errors: false,
            continue_on_error: false,
        }
    }

    /// Build the tree even when validation reports warnings
    pub fn ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    /// Keep going after a failed file in [`convert_batch`](Self::convert_batch)
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Use a custom tokenizer (e.g., with a different validation engine)
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Use a preconfigured router
    pub fn with_router(mut self, router: ContentRouter) -> Self {
        self.router = router;
        self
    }

    /// Register a renderer with the pipeline's router
    pub fn register_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.router.register(renderer);
    }

    pub fn router(&self) -> &ContentRouter {
        &self.router
    }

    /// Convert Markdown text to a tree and structure report
    pub fn convert(&self, text: &str) -> Result<Conversion> {
        let tokens = self.tokenizer.parse(text);
        log::debug!("Tokenized {} bytes into {} tokens", text.len(), tokens.len());

        let diagnostics = Diagnostics::from(self.tokenizer.validate(&tokens));
        log::debug!("Validation produced {} diagnostics", diagnostics.len());

        if let Some(blocking) = diagnostics.first_blocking() {
            if !self.ignore_errors {
                return Err(ParseError::from(blocking).into());
            }
        }
        for diagnostic in diagnostics.iter() {
            if diagnostic.is_blocking() {
                log::warn!("Ignoring {}", diagnostic);
            } else {
                log::debug!("{}", diagnostic);
            }
        }

        let ast = self.builder.build(tokens);
        log::debug!("Built tree with {} nodes", ast.len());

        let report = mdoffice_analyze::analyze(&ast);
        log::debug!(
            "Analyzed {} headings in {} sections",
            report.heading_hierarchy.total_headings,
            report.statistics.total_sections
        );

        Ok(Conversion {
            ast,
            report,
            diagnostics,
        })
    }

    /// Read and convert a Markdown file
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<Conversion> {
        let path = path.as_ref();
        log::debug!("Reading {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(path))?;
        self.convert(&text)
    }

    /// Convert several files in order
    ///
    /// Stops at the first failure unless `continue_on_error` is set, in
    /// which case each entry carries its own result.
    pub fn convert_batch<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<BatchEntry>> {
        let mut entries = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let result = match self.convert_file(path) {
                Err(e) if !self.continue_on_error => return Err(e),
                result => result,
            };
            if let Err(e) = &result {
                log::warn!("Skipping {}: {}", path.display(), e);
            }
            entries.push(BatchEntry {
                path: path.to_path_buf(),
                result,
            });
        }

        Ok(entries)
    }

    /// Render a conversion through the registered renderers
    pub fn render(
        &self,
        conversion: &Conversion,
        formats: &[OutputFormat],
        options: &RenderOptions,
    ) -> Result<BTreeMap<OutputFormat, Vec<u8>>> {
        self.router.route(conversion, formats, options)
    }

    /// Convert Markdown text and render it in one step
    pub fn convert_to(
        &self,
        text: &str,
        formats: &[OutputFormat],
        options: &RenderOptions,
    ) -> Result<BTreeMap<OutputFormat, Vec<u8>>> {
        let conversion = self.convert(text)?;
        self.render(&conversion, formats, options)
    }
}
