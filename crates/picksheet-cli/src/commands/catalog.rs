//! Catalog command - inspect and validate part catalogs.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use picksheet_core::catalog::Catalog;
use picksheet_core::classify;
use picksheet_core::models::order::Category;

use super::{load_catalog, load_config};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List catalog entries
    List {
        /// Only list entries in this category
        #[arg(long)]
        category: Option<Category>,
    },

    /// Check a catalog file for duplicate or empty codes
    Validate {
        /// Catalog file (default: the configured catalog)
        file: Option<PathBuf>,
    },

    /// Show the category a code falls into
    Classify {
        /// Part code
        code: String,

        /// Description (default: looked up in the catalog)
        #[arg(short, long)]
        description: Option<String>,
    },
}

pub fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        CatalogCommand::List { category } => list_catalog(category, config_path),
        CatalogCommand::Validate { file } => validate_catalog(file, config_path),
        CatalogCommand::Classify { code, description } => {
            classify_code(&code, description.as_deref(), config_path)
        }
    }
}

fn list_catalog(filter: Option<Category>, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(None, &config)?;

    let mut shown = 0;
    for entry in catalog.iter() {
        let category = entry.category();
        if filter.is_some_and(|f| f != category) {
            continue;
        }
        println!(
            "{:<28} {:<12} {}",
            entry.code,
            category.label(),
            entry.description
        );
        shown += 1;
    }

    println!();
    println!("{} {} entries", style("ℹ").blue(), shown);

    Ok(())
}

fn validate_catalog(file: Option<PathBuf>, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let path = match file.or(config.catalog.path) {
        Some(path) => path,
        None => {
            println!(
                "{} No catalog file configured, the builtin catalog is in use ({} entries).",
                style("ℹ").blue(),
                Catalog::builtin().len()
            );
            return Ok(());
        }
    };

    if !path.exists() {
        anyhow::bail!("Catalog file not found: {}", path.display());
    }

    let (catalog, warnings) = Catalog::from_path(&path)?;
    for warning in &warnings {
        println!("{} {}", style("⚠").yellow(), warning);
    }

    let status = if warnings.is_empty() {
        style("✓").green()
    } else {
        style("⚠").yellow()
    };
    println!(
        "{} {}: {} entries, {} warnings",
        status,
        path.display(),
        catalog.len(),
        warnings.len()
    );

    Ok(())
}

fn classify_code(
    code: &str,
    description: Option<&str>,
    config_path: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(None, &config)?;

    let known = catalog.description(code);
    let description = description.or(known).unwrap_or("");

    println!("{}", classify(code, description).label());
    if known.is_none() {
        eprintln!("{} {} is not in the catalog", style("ℹ").blue(), code);
    }

    Ok(())
}
