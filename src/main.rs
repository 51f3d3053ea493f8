use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use report_hub::data::cache::TableCache;
use report_hub::data::loader::DataSource;
use report_hub::data::model::Value;
use report_hub::narrative;
use report_hub::report::{self, ReportOutput};
use report_hub::state::ReportState;

/// Headless renderer for the report hub: loads a dataset, applies the
/// default (full-domain) filter selection, and prints KPIs and derived
/// tables as text or JSON.
#[derive(Parser, Debug)]
#[command(name = "report-hub", version, about)]
struct Args {
    /// Report to run; omit to list available reports.
    report: Option<String>,

    /// Load the dataset from a CSV file instead of the bundled copy.
    #[arg(long, conflicts_with = "upload")]
    path: Option<PathBuf>,

    /// Simulate the upload variant: read bytes from FILE, or pass the flag
    /// without a value to see the waiting state.
    #[arg(long, num_args = 0..=1)]
    upload: Option<Option<PathBuf>>,

    /// Emit the report output as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let Some(key) = args.report.as_deref() else {
        println!("Available reports:");
        for spec in report::all() {
            println!("  {:<16} {}", spec.key, spec.title);
        }
        return Ok(());
    };

    let Some(spec) = report::by_key(key) else {
        bail!(
            "unknown report '{key}' (expected one of: {})",
            report::all()
                .iter()
                .map(|r| r.key)
                .collect::<Vec<_>>()
                .join(", ")
        );
    };

    let source = match (&args.path, &args.upload) {
        (Some(path), _) => DataSource::Path(path.clone()),
        (None, Some(Some(file))) => {
            let bytes = std::fs::read(file)
                .with_context(|| format!("reading upload {}", file.display()))?;
            DataSource::Upload {
                name: file.display().to_string(),
                bytes: Some(bytes),
            }
        }
        (None, Some(None)) => DataSource::Upload {
            name: "stdin".into(),
            bytes: None,
        },
        (None, None) => spec.bundled_source(),
    };

    let mut cache = TableCache::new();
    let mut state = ReportState::new(spec);
    state.load_from(&mut cache, &source);

    if let Some(message) = &state.status_message {
        bail!("{message}");
    }

    let Some(output) = state.output() else {
        // Upload variant with no bytes: neutral waiting state, nothing runs.
        println!("{}", state.spec.title);
        println!("Awaiting upload. Provide a CSV file to begin.");
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&output);
    }
    Ok(())
}

fn print_text(output: &ReportOutput) {
    println!("{}", output.title);
    println!("{}", "=".repeat(output.title.len()));
    println!();

    for kpi in &output.kpis {
        match kpi.value {
            Some(v) => println!("  {:<36} {v:.2}", kpi.label),
            None => println!("  {:<36} no data", kpi.label),
        }
    }

    for section in &output.sections {
        println!();
        println!("{}", section.title);
        println!("{}", "-".repeat(section.title.len()));
        if section.table.is_empty() {
            println!("  (no data)");
        } else {
            print_table(&section.table);
        }
        if let Some(trend) = section.trend {
            println!(
                "  trend: y = {:.3}x + {:.3}",
                trend.slope, trend.intercept
            );
        }
        if let Some(lines) = narrative::observations(&output.report, &section.key) {
            println!("  Observations:");
            for line in lines {
                println!("  - {line}");
            }
        }
    }
}

fn print_table(table: &report_hub::DerivedTable) {
    // Scatter tables can be large; the headline view trims them.
    const MAX_ROWS: usize = 20;

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(MAX_ROWS)
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(col.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    println!("  {}", header.join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        println!("  {}", line.join("  "));
    }
    if table.rows.len() > MAX_ROWS {
        println!("  ... {} more rows", table.rows.len() - MAX_ROWS);
    }
}
