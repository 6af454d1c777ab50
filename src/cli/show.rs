//! Show command - print the stored pairing table.
//!
//! Three views are offered: `tiny` (names only), `short` (names, score and
//! each person's interests) and `full` (all eight stored columns). Row
//! numbers are 1-based, matching swap directives.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::cli::OutputFormat;
use crate::core::pairing::{PairingTable, COLUMN_HEADERS};
use crate::store::{JsonFileStore, PairingStore, TableSnapshot};

#[derive(Args)]
pub struct ShowArgs {
    /// Directory holding the pairing table
    #[arg(long, required = true)]
    pub store: PathBuf,

    /// Which columns to show
    #[arg(long, default_value = "short")]
    pub view: TableView,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TableView {
    /// Names only
    Tiny,
    /// Names, score and interests
    #[default]
    Short,
    /// Every stored column
    Full,
}

impl TableView {
    /// Stored column indices shown by this view
    pub fn columns(self) -> &'static [usize] {
        match self {
            Self::Tiny => &[0, 1],
            Self::Short => &[0, 1, 2, 3, 4],
            Self::Full => &[0, 1, 2, 3, 4, 5, 6, 7],
        }
    }
}

/// Execute the show command
///
/// # Errors
///
/// Returns an error if no table is stored or it cannot be parsed.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ShowArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&args.store);
    let snapshot = store.load_table()?;

    if verbose {
        eprintln!(
            "Table created {} ({} rows{})",
            snapshot.created_at,
            snapshot.rows.len(),
            snapshot
                .fingerprint
                .as_deref()
                .map(|fp| format!(", fingerprint {fp}"))
                .unwrap_or_default()
        );
    }

    print_snapshot(&snapshot, args.view, format)
}

/// Print a table in the requested view and format
pub(crate) fn print_snapshot(
    snapshot: &TableSnapshot,
    view: TableView,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(&snapshot.rows, view)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json(snapshot, view))?);
        }
        OutputFormat::Tsv => print!("{}", render_tsv(&snapshot.rows, view)),
    }
    Ok(())
}

fn render_text(table: &PairingTable, view: TableView) -> String {
    if table.is_empty() {
        return "No pairs.\n".to_string();
    }

    let columns = view.columns();
    let mut header = vec!["#".to_string()];
    header.extend(columns.iter().map(|&c| COLUMN_HEADERS[c].to_string()));

    let body: Vec<Vec<String>> = table
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![(i + 1).to_string()];
            cells.extend(columns.iter().map(|&c| row.cell(c)));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&header);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&line(&rule));
    for cells in &body {
        out.push_str(&line(cells));
    }
    out
}

fn render_tsv(table: &PairingTable, view: TableView) -> String {
    let columns = view.columns();
    let header: Vec<&str> = columns.iter().map(|&c| COLUMN_HEADERS[c]).collect();
    let mut out = format!("row\t{}\n", header.join("\t"));
    for (i, row) in table.iter().enumerate() {
        let cells: Vec<String> = columns
            .iter()
            .map(|&c| row.cell(c).replace(['\t', '\n'], " "))
            .collect();
        out.push_str(&format!("{}\t{}\n", i + 1, cells.join("\t")));
    }
    out
}

fn render_json(snapshot: &TableSnapshot, view: TableView) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = snapshot
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut object = serde_json::Map::new();
            object.insert("row".to_string(), serde_json::json!(i + 1));
            for &c in view.columns() {
                let value = if c == 2 {
                    serde_json::json!(row.score)
                } else {
                    serde_json::json!(row.cell(c))
                };
                object.insert(COLUMN_HEADERS[c].to_string(), value);
            }
            serde_json::Value::Object(object)
        })
        .collect();

    serde_json::json!({
        "created_at": snapshot.created_at,
        "fingerprint": snapshot.fingerprint,
        "total_score": snapshot.rows.total_score(),
        "rows": rows,
    })
}
