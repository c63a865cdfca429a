//! Brand alias commands.

use crate::cli::common::{load_aliases, print_json, CliResult};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Brand alias lookups
#[derive(Args, Debug)]
pub struct BrandArgs {
    #[command(subcommand)]
    command: BrandCommand,
}

#[derive(Subcommand, Debug)]
enum BrandCommand {
    /// Normalize a brand token to its canonical name
    Normalize(BrandNormalizeArgs),
    /// List every spelling that refers to a brand
    Variations(BrandVariationsArgs),
    /// List canonical brands and their aliases
    List(BrandListArgs),
}

/// Normalize a brand token
#[derive(Args, Debug)]
pub struct BrandNormalizeArgs {
    /// Token to normalize (e.g., "cat", "Caterpillar")
    #[arg(value_name = "TOKEN")]
    token: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// List spellings of a brand
#[derive(Args, Debug)]
pub struct BrandVariationsArgs {
    /// Canonical brand name (e.g., "CAT")
    #[arg(value_name = "NAME")]
    name: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// List canonical brands
#[derive(Args, Debug)]
pub struct BrandListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct NormalizeOutput {
    input: String,
    normalized: String,
    known: bool,
}

#[derive(Serialize, Debug)]
struct VariationsOutput {
    brand: String,
    variations: Vec<String>,
}

#[derive(Serialize, Debug)]
struct BrandEntry {
    brand: String,
    aliases: Vec<String>,
}

impl BrandArgs {
    /// Execute brand subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            BrandCommand::Normalize(args) => args.execute(),
            BrandCommand::Variations(args) => args.execute(),
            BrandCommand::List(args) => args.execute(),
        }
    }
}

impl BrandNormalizeArgs {
    /// Execute normalize command
    pub fn execute(&self) -> CliResult<()> {
        let aliases = load_aliases()?;
        let output = NormalizeOutput {
            normalized: aliases.normalize(&self.token),
            known: aliases.canonical(&self.token).is_some(),
            input: self.token.clone(),
        };

        if self.json {
            return print_json(&output);
        }

        println!("{}", output.normalized);
        Ok(())
    }
}

impl BrandVariationsArgs {
    /// Execute variations command
    pub fn execute(&self) -> CliResult<()> {
        let aliases = load_aliases()?;
        let output = VariationsOutput {
            brand: self.name.clone(),
            variations: aliases.variations_of(&self.name).into_iter().collect(),
        };

        if self.json {
            return print_json(&output);
        }

        for variation in &output.variations {
            println!("{variation}");
        }
        Ok(())
    }
}

impl BrandListArgs {
    /// Execute list command
    pub fn execute(&self) -> CliResult<()> {
        let aliases = load_aliases()?;
        let brands: Vec<BrandEntry> = aliases
            .canonical_brands()
            .into_iter()
            .map(|brand| BrandEntry {
                brand: brand.to_string(),
                aliases: aliases
                    .entries()
                    .filter(|(_, canonical)| *canonical == brand)
                    .map(|(alias, _)| alias.to_string())
                    .collect(),
            })
            .collect();

        if self.json {
            return print_json(&brands);
        }

        for entry in &brands {
            println!("{}: {}", entry.brand, entry.aliases.join(", "));
        }
        println!("\n{} brands, {} aliases", brands.len(), aliases.alias_count());
        Ok(())
    }
}
