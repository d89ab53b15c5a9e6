//! Rasterization of delimited formulas

use super::{split_segments, Segment};
use crate::config::ExportConfig;
use crate::error::{Result, StudyDeskError};
use crate::export::png::PngInfo;
use std::path::Path;
use std::process::Command;

/// A formula rasterized to PNG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFormula {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    /// Delimited source, used when a writer cannot embed the image
    pub source: String,
}

/// Ordered export content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBlock {
    Text(String),
    Image(RenderedFormula),
}

/// Turns a LaTeX expression into PNG bytes
pub trait FormulaRenderer {
    fn render(&self, latex: &str) -> Result<Vec<u8>>;
}

/// Typesets with a LaTeX compiler and converts the DVI with dvipng
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    latex_command: String,
    dvipng_command: String,
    dpi: u32,
}

impl LatexRenderer {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            latex_command: config.latex_command.clone(),
            dvipng_command: config.dvipng_command.clone(),
            dpi: config.dpi,
        }
    }

    fn document(expression: &str) -> String {
        // A blank line inside math mode is a LaTeX error.
        let flattened = expression
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "\\documentclass{{article}}\n\\usepackage{{amsmath,amssymb}}\n\\pagestyle{{empty}}\n\\begin{{document}}\n$\\displaystyle {}$\n\\end{{document}}\n",
            flattened
        )
    }

    fn run(&self, program: &str, args: &[&str], dir: &Path) -> Result<()> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| StudyDeskError::Render(format!("cannot run {}: {}", program, e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = stdout
            .lines()
            .find(|l| l.starts_with('!'))
            .map(str::to_string)
            .unwrap_or_else(|| String::from_utf8_lossy(&output.stderr).trim().to_string());
        Err(StudyDeskError::Render(format!(
            "{} failed ({}): {}",
            program, output.status, detail
        )))
    }
}

impl FormulaRenderer for LatexRenderer {
    fn render(&self, latex: &str) -> Result<Vec<u8>> {
        let expression = latex.trim();
        if expression.is_empty() {
            return Err(StudyDeskError::Render("empty formula".to_string()));
        }

        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join("formula.tex"), Self::document(expression))?;

        self.run(
            &self.latex_command,
            &["-interaction=nonstopmode", "-halt-on-error", "formula.tex"],
            dir.path(),
        )?;

        let dpi = self.dpi.to_string();
        self.run(
            &self.dvipng_command,
            &[
                "-q", "-T", "tight", "-D", &dpi, "-bg", "Transparent", "-o", "formula.png",
                "formula.dvi",
            ],
            dir.path(),
        )?;

        let png = std::fs::read(dir.path().join("formula.png"))?;

        if let Err(e) = dir.close() {
            tracing::debug!("Could not remove formula scratch directory: {}", e);
        }

        Ok(png)
    }
}

/// Renderer that always fails, so every formula stays as text
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRenderer;

impl FormulaRenderer for DisabledRenderer {
    fn render(&self, _latex: &str) -> Result<Vec<u8>> {
        Err(StudyDeskError::Render(
            "formula rendering disabled".to_string(),
        ))
    }
}

fn rasterize(renderer: &dyn FormulaRenderer, latex: &str) -> Result<RenderedFormula> {
    let png = renderer.render(latex)?;
    let info = PngInfo::parse(&png)?;
    Ok(RenderedFormula {
        width_px: info.width,
        height_px: info.height,
        png,
        source: Segment::Formula {
            latex: latex.to_string(),
        }
        .source(),
    })
}

/// Split text and rasterize every formula.
///
/// A formula that fails to render becomes literal text, delimiters
/// included. Adjacent text blocks are merged.
pub fn render_for_export(text: &str, renderer: &dyn FormulaRenderer) -> Vec<ExportBlock> {
    let mut blocks: Vec<ExportBlock> = Vec::new();

    for segment in split_segments(text) {
        let block = match segment {
            Segment::Text(text) => ExportBlock::Text(text),
            Segment::Formula { ref latex } => match rasterize(renderer, latex) {
                Ok(image) => ExportBlock::Image(image),
                Err(e) => {
                    tracing::debug!("Formula kept as text: {}", e);
                    ExportBlock::Text(segment.source())
                }
            },
        };

        if let ExportBlock::Text(ref text) = block {
            if let Some(ExportBlock::Text(previous)) = blocks.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        blocks.push(block);
    }

    blocks
}
