//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

/// Main configuration for the picksheet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Page extraction configuration.
    pub extraction: ExtractionConfig,

    /// Part catalog configuration.
    pub catalog: CatalogConfig,

    /// PDF report layout configuration.
    pub report: ReportConfig,
}

/// How shorter catalog codes yield to longer ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shadowing {
    /// A match is dropped only when a longer code extending it matches
    /// at the same position.
    #[default]
    Prefix,
    /// A match is also dropped when it overlaps any span already
    /// claimed by a longer accepted match.
    Overlap,
}

/// Page extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reuse the last seen identifiers on pages that have none.
    pub carry_forward: bool,

    /// Flag orders whose pages mention a customer pickup.
    pub classify_pickup: bool,

    /// Shadowing rule used by the part code matcher.
    pub shadowing: Shadowing,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            carry_forward: true,
            classify_pickup: true,
            shadowing: Shadowing::Prefix,
        }
    }
}

/// Part catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// External catalog file (JSON or CSV). The builtin catalog is used when unset.
    pub path: Option<PathBuf>,
}

/// PDF report layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Page width in points.
    pub page_width: f32,

    /// Page height in points.
    pub page_height: f32,

    /// Rows are moved to a new page once the cursor passes this y offset.
    pub fill_threshold: f32,

    /// Descriptions longer than this are truncated in relation tables.
    pub description_limit: usize,

    /// Descriptions longer than this are wrapped in summaries.
    pub summary_wrap: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            fill_threshold: 750.0,
            description_limit: 30,
            summary_wrap: 55,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject report layouts that cannot place a single row.
    pub fn validate(&self) -> Result<()> {
        let report = &self.report;
        if report.page_width <= 0.0 || report.page_height <= 0.0 {
            return Err(ScanError::Config(format!(
                "page size must be positive, got {}x{}",
                report.page_width, report.page_height
            )));
        }
        if report.fill_threshold <= 0.0 || report.fill_threshold >= report.page_height {
            return Err(ScanError::Config(format!(
                "fill_threshold {} must lie inside the page height {}",
                report.fill_threshold, report.page_height
            )));
        }
        if report.summary_wrap == 0 {
            return Err(ScanError::Config("summary_wrap must be at least 1".to_string()));
        }
        Ok(())
    }
}
