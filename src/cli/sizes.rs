//! Track size chart commands: `sizes`, `convert` and `fits`.

use crate::cli::common::{print_json, CatalogSource, CliError, CliResult};
use crate::models::{SizeCode, TrackSize};
use crate::track_sizes::{convert, BucketRule, DisplaySize, Unit, WidthGroups};
use clap::Args;
use serde::Serialize;

fn parse_unit(value: &str) -> CliResult<Unit> {
    value.parse().map_err(|e| CliError::validation(format!("{e}")))
}

// ============================================================================
// sizes
// ============================================================================

/// Show track sizes grouped by width
#[derive(Debug, Clone, Args)]
pub struct SizesArgs {
    /// Display unit: mm or inches
    #[arg(short, long, default_value = "mm")]
    pub unit: String,

    /// Only show this width bucket
    #[arg(short, long, value_name = "BUCKET")]
    pub width: Option<i64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SizesResponse {
    unit: Unit,
    bucket_rule: BucketRule,
    groups: Vec<GroupOutput>,
    skipped: usize,
}

#[derive(Debug, Serialize)]
struct GroupOutput {
    bucket: i64,
    sizes: Vec<DisplaySize>,
}

impl SizesArgs {
    /// Execute the sizes command
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        let unit = parse_unit(&self.unit)?;
        let ctx = source.load()?;
        let rule = ctx.config.catalog.bucket_rule;
        let groups = WidthGroups::build(&ctx.catalog.track_sizes, rule);

        let buckets: Vec<i64> = match self.width {
            Some(bucket) if groups.sizes_in(unit, bucket).is_empty() => {
                return Err(CliError::validation(format!(
                    "No track sizes in the {bucket} {unit} bucket"
                )));
            }
            Some(bucket) => vec![bucket],
            None => groups.buckets(unit),
        };

        let response = SizesResponse {
            unit,
            bucket_rule: rule,
            groups: buckets
                .into_iter()
                .map(|bucket| GroupOutput {
                    bucket,
                    sizes: groups
                        .sizes_in(unit, bucket)
                        .iter()
                        .filter_map(|size| convert(size, unit))
                        .collect(),
                })
                .collect(),
            skipped: groups.skipped(),
        };

        if self.json {
            return print_json(&response);
        }

        if response.groups.is_empty() {
            println!("No track sizes in the catalog");
        }

        let suffix = match unit {
            Unit::Mm => "mm",
            Unit::Inches => "\"",
        };
        for group in &response.groups {
            println!("{}{}:", group.bucket, suffix);
            for size in &group.sizes {
                if unit == Unit::Mm {
                    println!("  {}", size.size);
                } else {
                    println!("  {:<16} ({})", size.size, size.original_size);
                }
            }
        }

        if response.skipped > 0 {
            println!(
                "\n{} track size(s) without a known width were left out",
                response.skipped
            );
        }

        Ok(())
    }
}

// ============================================================================
// convert
// ============================================================================

/// Convert a track size code to another unit
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Size code in millimeters (e.g., 300x55x82)
    #[arg(value_name = "SIZE_CODE")]
    pub code: String,

    /// Target unit: inches or mm
    #[arg(short, long, default_value = "inches")]
    pub unit: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConvertArgs {
    /// Execute the convert command
    ///
    /// Works on the code alone, no catalog needed.
    pub fn execute(&self) -> CliResult<()> {
        let unit = parse_unit(&self.unit)?;
        let code = SizeCode::parse(&self.code)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        let size = TrackSize::new(
            SizeCode::normalize(&self.code),
            code.width,
            code.pitch,
            code.links,
        );
        let display = convert(&size, unit).ok_or_else(|| {
            CliError::validation(format!("Cannot convert {}", self.code))
        })?;

        if self.json {
            return print_json(&display);
        }

        println!("{}", display.size);
        Ok(())
    }
}

// ============================================================================
// fits
// ============================================================================

/// List machines compatible with a track size
#[derive(Debug, Clone, Args)]
pub struct FitsArgs {
    /// Size code in millimeters (e.g., 450x86x56)
    #[arg(value_name = "SIZE_CODE")]
    pub code: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FitsResponse {
    size: String,
    listed: bool,
    machines: Vec<String>,
}

impl FitsArgs {
    /// Execute the fits command
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        let ctx = source.load()?;

        let response = FitsResponse {
            size: self.code.clone(),
            listed: ctx.catalog.track_size(&self.code).is_some(),
            machines: ctx
                .catalog
                .compatible_machines(&self.code)
                .into_iter()
                .map(|record| record.machine_name())
                .collect(),
        };

        if self.json {
            return print_json(&response);
        }

        if !response.listed {
            println!("Note: {} is not in the track size catalog", response.size);
        }
        if response.machines.is_empty() {
            println!("No machines list {}", response.size);
        } else {
            for machine in &response.machines {
                println!("{machine}");
            }
        }

        Ok(())
    }
}
