//! Product listing command.

use crate::cli::common::{print_json, CatalogSource, CliError, CliResult};
use crate::constants::MAX_PAGE_LIMIT;
use crate::models::Product;
use crate::products::{paginate, ProductFilterSort, ProductFilters, SortOrder};
use clap::Args;
use serde::Serialize;

/// List products with search, brand and category filters
#[derive(Debug, Clone, Args)]
pub struct ProductsArgs {
    /// Free-text search over title, SKU, part number and size
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact brand name ("all" for every brand)
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Exact category name ("all" for every category)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Sort order: featured, price-low, price-high or name
    #[arg(long, default_value = "featured")]
    pub sort: String,

    /// Number of products to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Page size (at most 100)
    #[arg(long, default_value_t = MAX_PAGE_LIMIT)]
    pub limit: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ProductsResponse<'a> {
    sort: SortOrder,
    total: usize,
    skip: usize,
    products: Vec<&'a Product>,
}

impl ProductsArgs {
    /// Execute the products command
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        let sort: SortOrder = self
            .sort
            .parse()
            .map_err(|e| CliError::validation(format!("{e}")))?;

        let ctx = source.load()?;
        let filters = ProductFilters {
            search: self.search.clone().unwrap_or_default(),
            brand: self.brand.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
        };

        let listed =
            ProductFilterSort::new(&ctx.aliases).apply(&ctx.catalog.products, &filters, sort);
        let response = ProductsResponse {
            sort,
            total: listed.len(),
            skip: self.skip,
            products: paginate(&listed, self.skip, self.limit),
        };

        if self.json {
            return print_json(&response);
        }

        if response.products.is_empty() {
            println!("No products found");
            return Ok(());
        }

        for product in &response.products {
            let stock = if product.in_stock { "" } else { "  (out of stock)" };
            println!(
                "{:<16} {:>10.2}  {}  [{} / {}]{}",
                product.sku, product.price, product.title, product.brand, product.category, stock
            );
        }

        if response.products.len() < response.total {
            println!(
                "\nShowing {} of {} products",
                response.products.len(),
                response.total
            );
        }

        Ok(())
    }
}
