//! The `region` subcommand: free-text district-code lookup.

use anyhow::Result;
use clap::Args;
use krestate_lib::region::search_region_code;

use crate::output::{self, OutputFormat, RegionRow};

#[derive(Args)]
pub struct RegionArgs {
    /// Region name, e.g. "마포구" or "서울 마포구 합정동"
    pub query: Vec<String>,
}

pub fn run(args: &RegionArgs, format: &OutputFormat) -> Result<()> {
    let query = args.query.join(" ");
    let result = search_region_code(&query).map_err(output::tool_error)?;

    match format {
        OutputFormat::Json => output::print_json(&result),
        OutputFormat::Csv => {
            let rows: Vec<RegionRow> = result.matches.iter().map(RegionRow::from).collect();
            output::print_csv(&rows)
        }
        OutputFormat::Table => {
            let rows: Vec<RegionRow> = result.matches.iter().map(RegionRow::from).collect();
            output::print_region_table(&rows, &result.region_code, &result.full_name);
            Ok(())
        }
    }
}
