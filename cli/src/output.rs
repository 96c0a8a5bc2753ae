//! Output formatting for parse results and option listings.

use modopts_cmdline::{CommandLine, OptionTable};
use modopts_core::{ParamKind, VariableStore};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// What a `parse` run produced.
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub variables: &'a VariableStore,
    pub positionals: &'a [String],
    pub first_positional: usize,
    pub argv: &'a [String],
}

impl<'a> ParseReport<'a> {
    pub fn new(variables: &'a VariableStore, cmdline: &'a CommandLine) -> Self {
        Self {
            variables,
            positionals: cmdline.positionals(),
            first_positional: cmdline.first_positional,
            argv: &cmdline.argv,
        }
    }
}

/// One long-option spelling as the parser sees it.
#[derive(Debug, Serialize)]
pub struct OptionRow<'t> {
    pub option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
    pub takes_value: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub obsolete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'t str>,
}

/// Lists every table row in registration order.
///
/// A short flag is shown on the positive row of the parameter that owns it
/// in the short index, so a flag dropped as a duplicate is not listed.
pub fn option_rows<'t>(table: &'t OptionTable<'_>) -> Vec<OptionRow<'t>> {
    table
        .entries()
        .iter()
        .map(|entry| {
            let param = table.param(entry.param);
            let short = param
                .short
                .filter(|&flag| {
                    !entry.negated && table.short(flag).is_some_and(|s| s.param == entry.param)
                })
                .map(|flag| format!("-{flag}"));
            OptionRow {
                option: format!("--{}", entry.name),
                short,
                kind: param.kind,
                negated: entry.negated,
                takes_value: entry.takes_value,
                obsolete: entry.obsolete,
                description: param.description.as_deref(),
            }
        })
        .collect()
}

/// Formats a parse report in the requested output format.
pub fn format_report(report: &ParseReport<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats an option listing in the requested output format.
pub fn format_options(rows: &[OptionRow<'_>], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(rows).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(options_to_table(rows)),
    }
}

fn report_to_table(report: &ParseReport<'_>) -> String {
    let rows: Vec<Vec<String>> = report
        .variables
        .iter()
        .map(|(name, var)| {
            let range = var
                .range
                .as_ref()
                .map(|r| format!("[{}, {}]", r.min, r.max))
                .unwrap_or_default();
            vec![name.to_string(), var.value.to_string(), range]
        })
        .collect();

    let mut out = render_columns(&["VARIABLE", "VALUE", "RANGE"], &rows);
    out.push('\n');
    if report.positionals.is_empty() {
        out.push_str("No positional arguments.\n");
    } else {
        out.push_str(&format!(
            "Positional arguments (argv[{}..]):\n",
            report.first_positional
        ));
        for arg in report.positionals {
            out.push_str(&format!("  {arg}\n"));
        }
    }
    out
}

fn options_to_table(rows: &[OptionRow<'_>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut desc = row.description.unwrap_or("").to_string();
            if row.obsolete {
                desc = format!("(obsolete) {desc}").trim_end().to_string();
            }
            let option = if row.takes_value {
                format!("{} <{}>", row.option, row.kind)
            } else {
                row.option.clone()
            };
            vec![option, row.short.clone().unwrap_or_default(), desc]
        })
        .collect();
    render_columns(&["OPTION", "SHORT", "DESCRIPTION"], &cells)
}

/// Left-aligns cells into columns separated by two spaces.
fn render_columns(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header_cells).chain(rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
