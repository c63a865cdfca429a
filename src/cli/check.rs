//! Catalog integrity check command.

use crate::catalog::{IntegrityReport, LoadReport};
use crate::cli::common::{print_json, CatalogSource, CliError, CliResult};
use clap::Args;
use serde::Serialize;

/// Check the catalog for dangling size references and other problems
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    clean: bool,
    report: IntegrityReport,
    load: LoadReport,
}

impl CheckArgs {
    /// Execute the check command
    ///
    /// Exits non-zero when a machine lists a size that is not in the catalog.
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        let ctx = source.load()?;
        let report = ctx.catalog.integrity_report();
        let response = CheckResponse {
            clean: report.is_clean(),
            load: ctx.catalog.report,
            report,
        };

        if self.json {
            print_json(&response)?;
        } else {
            print_human_readable(&response);
        }

        if response.clean {
            Ok(())
        } else {
            Err(CliError::validation(format!(
                "{} dangling size reference(s)",
                response.report.dangling_references.len()
            )))
        }
    }
}

fn print_human_readable(response: &CheckResponse) {
    let report = &response.report;
    let load = &response.load;

    println!(
        "Checked {} products, {} track sizes, {} machines",
        report.products, report.track_sizes, report.machines
    );

    let rejected = load.products.rejected
        + load.track_sizes.rejected
        + load.compatibility.rejected
        + load.redirects.rejected;
    if rejected > 0 {
        println!("⚠ {rejected} invalid record(s) skipped while loading (run with --verbose)");
    }

    if response.clean {
        println!("✓ Every machine size resolves");
    } else {
        println!("✗ Dangling size references:");
        for dangling in &report.dangling_references {
            println!("  {}: {}", dangling.machine, dangling.size);
        }
    }

    print_list("Sizes without a known width", &report.unmeasured_sizes);
    print_list("Duplicate sizes", &report.duplicate_sizes);
    print_list("Sizes no machine uses", &report.unused_sizes);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("⚠ {title}: {}", items.join(", "));
}
