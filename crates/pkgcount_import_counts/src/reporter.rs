use std::io::{self, Write};

use colored::Colorize;
use log::{debug, trace};

use pkgcount_core::{PackageCount, PackageReport};

use crate::config::OutputFormat;

const MIN_PACKAGE_WIDTH: usize = 8;
const COUNT_WIDTH: usize = 5;

/// Row shown in place of an empty section
fn placeholder() -> PackageCount {
    PackageCount { package: "-".to_string(), count: 0 }
}

pub fn write_report<W: Write>(
    writer: &mut W,
    report: &PackageReport,
    format: OutputFormat,
) -> io::Result<()> {
    debug!("Writing report as {:?}", format);
    match format {
        OutputFormat::Table => write_table(writer, report),
        OutputFormat::Markdown => write_markdown(writer, report),
        OutputFormat::Json => write_json(writer, report),
    }
}

pub fn write_markdown<W: Write>(writer: &mut W, report: &PackageReport) -> io::Result<()> {
    write_markdown_section(writer, "Internal", &report.internal)?;
    writeln!(writer)?;
    write_markdown_section(writer, "External", &report.external)?;
    writer.flush()
}

fn write_markdown_section<W: Write>(
    writer: &mut W,
    kind: &str,
    packages: &[PackageCount],
) -> io::Result<()> {
    writeln!(writer, "**{} Package Counts**", kind)?;
    writeln!(writer)?;
    writeln!(writer, "| Package | Count |")?;
    writeln!(writer, "| :--- | ---: |")?;
    if packages.is_empty() {
        writeln!(writer, "| - | 0 |")?;
    }
    for pc in packages {
        writeln!(writer, "| {} | {} |", pc.package, pc.count)?;
    }
    Ok(())
}

pub fn write_table<W: Write>(writer: &mut W, report: &PackageReport) -> io::Result<()> {
    write_table_section(writer, "Internal", &report.internal)?;
    writeln!(writer)?;
    write_table_section(writer, "External", &report.external)?;
    writer.flush()
}

fn write_table_section<W: Write>(
    writer: &mut W,
    kind: &str,
    packages: &[PackageCount],
) -> io::Result<()> {
    let fallback = [placeholder()];
    let rows = if packages.is_empty() { &fallback[..] } else { packages };

    let width = rows
        .iter()
        .map(|pc| pc.package.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_PACKAGE_WIDTH);
    trace!("Rendering {} {} rows at width {}", rows.len(), kind, width);

    let rule = |left: &str, fill: &str, mid: &str, right: &str| {
        format!("{left}{}{mid}{}{right}", fill.repeat(width + 2), fill.repeat(COUNT_WIDTH))
    };

    writeln!(writer, "{}", format!("{} Package Counts", kind).bold())?;
    writeln!(writer, "{}", rule("┌", "─", "┬", "┐"))?;
    writeln!(writer, "│{:<w$}│Count│", "Package", w = width + 2)?;
    writeln!(writer, "{}", rule("╞", "═", "╪", "╡"))?;
    for (idx, pc) in rows.iter().enumerate() {
        writeln!(writer, "│ {:<width$} │ {:>4}│", pc.package, pc.count)?;
        if idx + 1 < rows.len() {
            writeln!(writer, "{}", rule("├", "─", "┼", "┤"))?;
        }
    }
    writeln!(writer, "{}", rule("└", "─", "┴", "┘"))?;
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, report: &PackageReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()
}
