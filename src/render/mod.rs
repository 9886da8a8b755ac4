//! HTML rendering for web pages and the daily digest email.
//!
//! Uses Handlebars templates embedded at compile time. Strict mode is on, so
//! a context missing a referenced field fails the render instead of silently
//! printing nothing. Values are HTML-escaped by default, which keeps
//! upstream-controlled text (team names, transaction descriptions) from
//! injecting markup into rendered output.

use handlebars::Handlebars;
use include_dir::{include_dir, Dir};
use serde::Serialize;

use crate::error::{DugoutError, Result};

// Embed all templates at compile time
static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Template engine shared by the web layer and the digest job.
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Creates a renderer with every embedded template registered.
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        register_templates(&mut registry, &TEMPLATES_DIR)?;

        Ok(Self { registry })
    }

    /// Render a template by name with the given context.
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String> {
        if !self.registry.has_template(template_name) {
            return Err(DugoutError::template(format!(
                "Template not found: {template_name}"
            )));
        }
        let html = self.registry.render(template_name, data)?;
        Ok(html)
    }

    /// Check if a template exists
    pub fn has_template(&self, template_name: &str) -> bool {
        self.registry.has_template(template_name)
    }
}

/// Recursively register templates from the embedded directory. Template
/// names are the file paths with the `.hbs` extension removed, so
/// `partials/header.hbs` registers as `partials/header`.
fn register_templates(registry: &mut Handlebars<'static>, dir: &'static Dir<'static>) -> Result<()> {
    for entry in dir.entries() {
        match entry {
            include_dir::DirEntry::Dir(subdir) => {
                register_templates(registry, subdir)?;
            }
            include_dir::DirEntry::File(file) => {
                let path = file.path();
                if path.extension().map_or(false, |ext| ext == "hbs") {
                    let name = path.with_extension("");
                    let content = file.contents_utf8().ok_or_else(|| {
                        DugoutError::template(format!(
                            "Template is not valid UTF-8: {}",
                            path.display()
                        ))
                    })?;
                    registry.register_template_string(&name.to_string_lossy(), content)?;
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Renderer tests
// ============================================================================
