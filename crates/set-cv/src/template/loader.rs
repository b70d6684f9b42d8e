//! Template loading utilities

use super::{SymbolTemplates, Template};
use crate::Result;
use anyhow::Context;
use image::GrayImage;
use log::info;
use set_core::Symbol;
use std::path::{Path, PathBuf};

/// Loads reference symbol templates from configured directories.
pub struct TemplateLoader {
    template_dirs: Vec<PathBuf>,
    supported_extensions: Vec<String>,
}

impl TemplateLoader {
    pub fn new() -> Self {
        Self {
            template_dirs: Vec::new(),
            supported_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
            ],
        }
    }

    /// Add template directory
    pub fn add_template_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.template_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Add supported extension
    pub fn add_extension(mut self, ext: String) -> Self {
        self.supported_extensions.push(ext);
        self
    }

    /// Load a single template by stem name, trying every directory and
    /// extension. The image is grayscaled and binarized at 128 so the L2
    /// comparison runs on clean 0/255 masks.
    pub fn load_template(&self, name: &str) -> Result<Option<Template>> {
        for dir in &self.template_dirs {
            for ext in &self.supported_extensions {
                let path = dir.join(format!("{name}.{ext}"));
                if !path.exists() {
                    continue;
                }
                let grey = image::open(&path)
                    .with_context(|| format!("Failed to load template: {path:?}"))?
                    .to_luma8();
                return Ok(Some(Template::new(name.to_string(), binarize(&grey))));
            }
        }
        Ok(None)
    }

    /// Load the full reference set, one template per symbol shape.
    /// Missing templates are a hard startup error.
    pub fn load_symbol_templates(&self) -> Result<SymbolTemplates> {
        Ok(SymbolTemplates::new(
            self.require(Symbol::Oval)?,
            self.require(Symbol::Diamond)?,
            self.require(Symbol::Wave)?,
        ))
    }

    fn require(&self, symbol: Symbol) -> Result<Template> {
        let template = self.load_template(symbol.name())?.with_context(|| {
            format!(
                "missing reference template '{}' in {:?}",
                symbol.name(),
                self.template_dirs
            )
        })?;
        info!(
            "loaded template '{}' ({}x{})",
            template.name,
            template.mask.width(),
            template.mask.height()
        );
        Ok(template)
    }
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn binarize(grey: &GrayImage) -> GrayImage {
    let mut mask = GrayImage::new(grey.width(), grey.height());
    for (out, p) in mask.pixels_mut().zip(grey.pixels()) {
        out.0[0] = if p.0[0] >= 128 { 255 } else { 0 };
    }
    mask
}
