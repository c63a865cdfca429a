//! Machine search command.

use crate::cli::common::{print_json, CatalogSource, CliResult};
use crate::search::{MachineSearch, MatchStrategy};
use clap::Args;
use serde::Serialize;

/// Search machines by make and model
#[derive(Debug, Clone, Args)]
pub struct MachinesArgs {
    /// Search text (e.g., "bobcat t190", "cat 299d"). Omit to list every machine.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Show which match strategy accepted each machine
    #[arg(long)]
    pub explain: bool,

    /// Maximum number of machines to print (defaults to search.max_results)
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct MachinesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    total: usize,
    shown: usize,
    machines: Vec<MachineRow>,
}

#[derive(Debug, Serialize)]
struct MachineRow {
    make: String,
    model: String,
    track_sizes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_by: Option<MatchStrategy>,
}

impl MachinesArgs {
    /// Execute the machines command
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        let ctx = source.load()?;
        let search = MachineSearch::new(&ctx.aliases);

        let rows: Vec<MachineRow> = match self.query.as_deref() {
            Some(query) => search
                .search_explained(query, &ctx.catalog.compatibility)
                .into_iter()
                .map(|found| MachineRow {
                    make: found.record.make.clone(),
                    model: found.record.model.clone(),
                    track_sizes: found.record.track_sizes.clone(),
                    matched_by: Some(found.strategy),
                })
                .collect(),
            None => search
                .filter_or_all(None, &ctx.catalog.compatibility)
                .into_iter()
                .map(|record| MachineRow {
                    make: record.make.clone(),
                    model: record.model.clone(),
                    track_sizes: record.track_sizes.clone(),
                    matched_by: None,
                })
                .collect(),
        };

        let total = rows.len();
        let limit = self.limit.unwrap_or(ctx.config.search.max_results);
        let mut machines = rows;
        machines.truncate(limit);

        let response = MachinesResponse {
            query: self.query.clone(),
            total,
            shown: machines.len(),
            machines,
        };

        if self.json {
            return print_json(&response);
        }

        if response.machines.is_empty() {
            match &response.query {
                Some(query) => println!("No machines match '{query}'"),
                None => println!("No machines in the catalog"),
            }
            return Ok(());
        }

        for row in &response.machines {
            let sizes = if row.track_sizes.is_empty() {
                "(no sizes listed)".to_string()
            } else {
                row.track_sizes.join(", ")
            };
            match (&row.matched_by, self.explain) {
                (Some(strategy), true) => {
                    println!("{} {}  [{}]  {}", row.make, row.model, strategy, sizes);
                }
                _ => println!("{} {}  {}", row.make, row.model, sizes),
            }
        }

        if response.shown < response.total {
            println!(
                "\nShowing {} of {} machines (use --limit to see more)",
                response.shown, response.total
            );
        }

        Ok(())
    }
}
