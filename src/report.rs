//! Human-readable rendering of driver reports.
//!
//! Drivers return plain data; this module only formats it. Colors follow
//! usage thresholds: categories with no commands in red, under 5% in yellow,
//! and a categorization rate under 75% in red, under 90% in yellow.

use crate::drivers::{Distribution, MigrationReport, RecategorizeReport, ValidationReport, percent};
use crate::legacy::ImportReport;
use crate::sources::SearchHit;
use owo_colors::{OwoColorize, Stream, Style};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorMode {
    Never,
    Always,
    Auto,
}

/// Styling switch shared by the reporter and the review prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    mode: ColorMode,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            mode: ColorMode::Never,
        }
    }

    pub fn colored() -> Self {
        Self {
            mode: ColorMode::Always,
        }
    }

    /// Color only when stdout is a terminal that supports it and `NO_COLOR`
    /// is unset.
    pub fn auto() -> Self {
        Self {
            mode: ColorMode::Auto,
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        match self.mode {
            ColorMode::Never => text.to_string(),
            ColorMode::Always => text.style(style).to_string(),
            ColorMode::Auto => text
                .if_supports_color(Stream::Stdout, |t| t.style(style))
                .to_string(),
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, Style::new().bold())
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(&format!("=== {text} ==="), Style::new().cyan().bold())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(&format!("❌ {text}"), Style::new().red())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(&format!("⚠️  {text}"), Style::new().yellow())
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(&format!("✓ {text}"), Style::new().green())
    }

    fn usage_line(&self, text: &str, pct: f64) -> String {
        let style = if pct == 0.0 {
            Style::new().red()
        } else if pct < 5.0 {
            Style::new().yellow()
        } else {
            Style::new().green()
        };
        self.paint(text, style)
    }
}

fn header(out: &mut dyn Write, palette: Palette, text: &str) -> io::Result<()> {
    writeln!(out, "\n{}\n", palette.header(text))
}

fn distribution(out: &mut dyn Write, dist: &Distribution) -> io::Result<()> {
    for (cat, count, pct) in dist.rows() {
        writeln!(out, "• {cat}: {count} commands ({pct:.1}%)")?;
    }
    Ok(())
}

pub fn render_migration(
    out: &mut dyn Write,
    palette: Palette,
    report: &MigrationReport,
) -> io::Result<()> {
    if !report.has_changes() {
        return writeln!(out, "{}", palette.success("No changes needed"));
    }
    header(out, palette, "Changes Made")?;
    for change in &report.changes {
        writeln!(out, "• {change}")?;
    }
    let summary = format!(
        "Updated {} of {} commands",
        report.changes.len(),
        report.total()
    );
    if report.persisted {
        writeln!(out, "\n{}", palette.success(&summary))?;
    } else {
        writeln!(
            out,
            "\n{}",
            palette.warning(&format!("Dry run: {summary} (store not written)"))
        )?;
    }
    header(out, palette, "Category Distribution")?;
    distribution(out, &report.distribution)
}

pub fn render_recategorize(
    out: &mut dyn Write,
    palette: Palette,
    report: &RecategorizeReport,
) -> io::Result<()> {
    if !report.has_changes() {
        return writeln!(
            out,
            "{}",
            palette.success(&format!(
                "No changes needed ({} of {} commands reviewed)",
                report.reviewed,
                report.total()
            ))
        );
    }
    header(out, palette, "Changes Made")?;
    for change in &report.changes {
        writeln!(out, "• {change}")?;
    }
    writeln!(
        out,
        "\n{}",
        palette.success(&format!(
            "Updated {} of {} commands",
            report.changes.len(),
            report.total()
        ))
    )?;
    header(out, palette, "Category Distribution")?;
    distribution(out, &report.distribution)
}

pub fn render_validation(
    out: &mut dyn Write,
    palette: Palette,
    report: &ValidationReport,
) -> io::Result<()> {
    header(out, palette, "Category Validation Report")?;

    if report.error_count() > 0 {
        header(out, palette, "Errors")?;
        for error in report.errors() {
            writeln!(out, "{}", palette.error(&error.to_string()))?;
        }
    }

    if report.warnings().next().is_some() {
        header(out, palette, "Warnings")?;
        for warning in report.warnings() {
            writeln!(out, "{}", palette.warning(&warning.to_string()))?;
        }
    }

    header(out, palette, "Category Usage")?;
    for usage in &report.usage {
        let pct = percent(usage.count, report.total);
        let line = format!("• {}: {} commands ({pct:.1}%)", usage.name, usage.count);
        writeln!(out, "{}", palette.usage_line(&line, pct))?;
    }

    header(out, palette, "Statistics")?;
    writeln!(out, "{} {}", palette.bold("Total commands:"), report.total)?;
    writeln!(
        out,
        "{} {}",
        palette.bold("Properly categorized:"),
        report.properly_categorized
    )?;
    let rate = report.categorization_rate();
    let line = format!("Categorization rate: {rate:.1}%");
    if rate >= 90.0 {
        writeln!(out, "{}", palette.success(&line))?;
    } else if rate >= 75.0 {
        writeln!(out, "{}", palette.warning(&line))?;
    } else {
        writeln!(out, "{}", palette.error(&line))?;
    }

    if report.passed() {
        writeln!(out, "\n{}", palette.success("Validation passed"))
    } else {
        writeln!(
            out,
            "\n{}",
            palette.error(&format!(
                "Validation failed with {} error(s)",
                report.error_count()
            ))
        )
    }
}

pub fn render_import(out: &mut dyn Write, palette: Palette, report: &ImportReport) -> io::Result<()> {
    for key in &report.duplicates {
        writeln!(
            out,
            "{}",
            palette.warning(&format!("Duplicate command '{key}' skipped"))
        )?;
    }
    writeln!(
        out,
        "{}",
        palette.success(&format!(
            "Imported {} commands into {}",
            report.imported,
            report.store_path.display()
        ))
    )?;
    writeln!(out, "Source file: {}", report.source_path.display())?;
    header(out, palette, "Category Distribution")?;
    distribution(out, &report.distribution)
}

/// One line per hit, the format the fuzzy picker consumes.
pub fn render_search(out: &mut dyn Write, hits: &[SearchHit]) -> io::Result<()> {
    for hit in hits {
        writeln!(out, "{}\t{}\t[{}]", hit.command, hit.description, hit.source)?;
    }
    Ok(())
}
