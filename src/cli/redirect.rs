//! Redirect lookup command.

use crate::cli::common::{print_json, CatalogSource, CliError, CliResult};
use clap::Args;
use serde::Serialize;

/// Resolve a request path against the redirect table
#[derive(Debug, Clone, Args)]
pub struct RedirectArgs {
    /// Request path (e.g., /products/old-t190)
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RedirectOutput {
    from: String,
    to: String,
    status: u16,
    hops: usize,
}

impl RedirectArgs {
    /// Execute the redirect command
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        let ctx = source.load()?;
        let redirects = &ctx.catalog.redirects;

        let Some(first) = redirects.resolve(&self.path) else {
            return Err(CliError::validation(format!("No redirect for {}", self.path)));
        };
        let Some(last) = redirects.resolve_chain(&self.path) else {
            return Err(CliError::validation(format!(
                "Redirect chain for {} loops back on itself",
                self.path
            )));
        };

        let output = RedirectOutput {
            from: first.from_url.clone(),
            to: last.to_url.clone(),
            status: first.kind().status_code(),
            hops: redirects.chain_length(&self.path),
        };

        if self.json {
            return print_json(&output);
        }

        println!("{} -> {} ({})", output.from, output.to, output.status);
        Ok(())
    }
}
