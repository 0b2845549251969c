//! Process command - scan a build sheet and an optional pick list.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use picksheet_core::aggregate::{
    global_appearances, group_by_order, pickup_orders, relations_in_category, sorted_relations,
    OrderMap,
};
use picksheet_core::models::order::{Category, DocumentKind, ParsedDocument, RelationRecord};
use picksheet_core::pdf::{PageSource, PdfExtractor, PlainTextPages};
use picksheet_core::report::{build_report, ReportInput};
use picksheet_core::{classify, scan_document, DocumentParser};

use super::{load_catalog, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Build sheet (PDF, or a plain-text page dump)
    #[arg(required = true)]
    build_sheet: PathBuf,

    /// Shipment pick list to merge with the build sheet
    #[arg(short, long)]
    pick_list: Option<PathBuf>,

    /// Part catalog file (JSON or CSV), overrides the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Only show relations in this category
    #[arg(long)]
    category: Option<Category>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the PDF report to this file
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Relations grouped by category
    Table,
    /// One row per relation
    Csv,
    /// Full scan result
    Json,
}

/// JSON output document.
#[derive(Serialize)]
struct ScanSummary<'a> {
    relations: Vec<RelationRecord>,
    orders: Vec<OrderSummary<'a>>,
    appearances: &'a BTreeMap<String, u32>,
    two_day_shipments: Vec<&'a str>,
    pickup_orders: &'a [String],
}

#[derive(Serialize)]
struct OrderSummary<'a> {
    order_id: &'a str,
    pages: usize,
    pickup: bool,
    part_counts: &'a BTreeMap<String, u32>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    for input in std::iter::once(&args.build_sheet).chain(args.pick_list.as_ref()) {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
    }

    let catalog = Arc::new(load_catalog(args.catalog.as_deref(), &config)?);
    let parser = DocumentParser::from_config(Arc::clone(&catalog), &config.extraction);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    let mut document = scan_file(&args.build_sheet, DocumentKind::BuildSheet, &parser, &pb)?;
    if let Some(pick_list) = &args.pick_list {
        let pick = scan_file(pick_list, DocumentKind::PickList, &parser, &pb)?;
        document = document.merge(pick);
    }

    pb.finish_and_clear();

    let orders = group_by_order(&document.pages, config.extraction.classify_pickup);
    let pickups = pickup_orders(&orders);
    info!(
        "{} orders, {} relations, {} two-day shipments, {} pickup orders",
        orders.len(),
        document.relations.len(),
        document.two_day_shipments.len(),
        pickups.len()
    );

    if orders.is_empty() && document.relations.is_empty() {
        eprintln!(
            "{} No orders or part codes were found in the input.",
            style("ℹ").blue()
        );
        return Ok(());
    }

    let relations = match args.category {
        Some(category) => relations_in_category(&document.relations, category),
        None => document.relations.clone(),
    };
    let relations = sorted_relations(&relations);
    let appearances = global_appearances(&orders);

    let output = match args.format {
        OutputFormat::Table => format_table(&relations, &appearances, &document, &pickups, args.category),
        OutputFormat::Csv => format_csv(&relations, &appearances)?,
        OutputFormat::Json => format_json(relations, &orders, &appearances, &document, &pickups)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if let Some(report_path) = &args.report {
        let input = ReportInput {
            relations: &document.relations,
            orders: &orders,
            catalog: &catalog,
            two_day_shipments: &document.two_day_shipments,
            pickup_orders: &pickups,
        };
        match build_report(&input, &config.report) {
            Some(report) => {
                fs::write(report_path, report.to_bytes()?)?;
                eprintln!(
                    "{} Report written to {} ({} pages)",
                    style("✓").green(),
                    report_path.display(),
                    report.page_count()
                );
            }
            None => eprintln!(
                "{} No report generated: nothing to report in the input.",
                style("ℹ").blue()
            ),
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Pick the page source from the file extension.
fn page_source(path: &Path) -> anyhow::Result<Box<dyn PageSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Ok(Box::new(PdfExtractor::new())),
        "txt" => Ok(Box::new(PlainTextPages::new())),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn scan_file(
    path: &Path,
    kind: DocumentKind,
    parser: &DocumentParser,
    pb: &ProgressBar,
) -> anyhow::Result<ParsedDocument> {
    let source = page_source(path)?;

    pb.set_message(format!("Reading {}...", path.display()));
    pb.tick();
    let data = fs::read(path)?;

    info!("Processing file: {} ({})", path.display(), source.backend_name());
    scan_document(&data, source.as_ref(), parser, kind)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn format_table(
    relations: &[RelationRecord],
    appearances: &BTreeMap<String, u32>,
    document: &ParsedDocument,
    pickups: &[String],
    filter: Option<Category>,
) -> String {
    let mut output = String::new();
    let categories: Vec<Category> = match filter {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        let rows: Vec<&RelationRecord> = relations
            .iter()
            .filter(|r| classify(&r.code, &r.description) == category)
            .collect();

        output.push_str(&format!("{}\n", style(category.label()).bold().cyan()));
        if rows.is_empty() {
            output.push_str(&format!("  {}\n\n", style("no relations").dim()));
            continue;
        }

        output.push_str(&format!(
            "  {:<12} {:<28} {:<44} {:<12} {:>5}\n",
            "Order", "Code", "Description", "Shipment", "Count"
        ));
        for row in rows {
            output.push_str(&format!(
                "  {:<12} {:<28} {:<44} {:<12} {:>5}\n",
                row.order_id,
                row.code,
                row.description,
                row.shipment_id,
                appearances.get(&row.code).copied().unwrap_or(0)
            ));
        }
        output.push('\n');
    }

    if !document.two_day_shipments.is_empty() {
        let shipments: Vec<&str> = document.two_day_shipments.iter().map(String::as_str).collect();
        output.push_str(&format!(
            "{} {}\n",
            style("2-day shipping:").bold(),
            shipments.join(", ")
        ));
    }
    if !pickups.is_empty() {
        output.push_str(&format!(
            "{} {}\n",
            style("Customer pickup:").bold(),
            pickups.join(", ")
        ));
    }

    output
}

fn format_csv(
    relations: &[RelationRecord],
    appearances: &BTreeMap<String, u32>,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "order_id",
        "code",
        "description",
        "shipment_id",
        "category",
        "appearances",
    ])?;

    for row in relations {
        let category = classify(&row.code, &row.description);
        let count = appearances.get(&row.code).copied().unwrap_or(0);
        wtr.write_record([
            row.order_id.as_str(),
            row.code.as_str(),
            row.description.as_str(),
            row.shipment_id.as_str(),
            category.label(),
            count.to_string().as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_json(
    relations: Vec<RelationRecord>,
    orders: &OrderMap,
    appearances: &BTreeMap<String, u32>,
    document: &ParsedDocument,
    pickups: &[String],
) -> anyhow::Result<String> {
    let summary = ScanSummary {
        relations,
        orders: orders
            .values()
            .map(|o| OrderSummary {
                order_id: &o.order_id,
                pages: o.pages.len(),
                pickup: o.pickup,
                part_counts: &o.part_counts,
            })
            .collect(),
        appearances,
        two_day_shipments: document.two_day_shipments.iter().map(String::as_str).collect(),
        pickup_orders: pickups,
    };

    let mut json = serde_json::to_string_pretty(&summary)?;
    json.push('\n');
    Ok(json)
}
