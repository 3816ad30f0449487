//! The `rent` subcommand: lease records with deposit statistics.

use anyhow::{bail, Result};
use clap::Args;
use krestate_lib::OpenDataTools;

use super::PropertyType;
use crate::output::{self, OutputFormat, RentRow};

#[derive(Args)]
pub struct RentArgs {
    /// Property family (commercial has no rent dataset)
    #[arg(long, value_enum, default_value_t = PropertyType::Apt)]
    pub property_type: PropertyType,

    /// 5-digit legal district code (see the region command)
    #[arg(long)]
    pub region: String,

    /// Target month in YYYYMM format
    #[arg(long)]
    pub month: String,

    /// Maximum number of records to fetch
    #[arg(long, default_value_t = 100)]
    pub rows: u32,
}

pub async fn run(args: &RentArgs, tools: &OpenDataTools, format: &OutputFormat) -> Result<()> {
    match args.property_type {
        PropertyType::Apt => {
            let report = tools
                .apartment_rent(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<RentRow> = report.items.iter().map(RentRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::Officetel => {
            let report = tools
                .officetel_rent(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<RentRow> = report.items.iter().map(RentRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::Villa => {
            let report = tools
                .villa_rent(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<RentRow> = report.items.iter().map(RentRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::SingleHouse => {
            let report = tools
                .single_house_rent(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<RentRow> = report.items.iter().map(RentRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::Commercial => {
            bail!("commercial buildings have no rent dataset; use --property-type apt|officetel|villa|single-house")
        }
    }
}

fn print<T: serde::Serialize>(
    format: &OutputFormat,
    report: &krestate_lib::tools::RentReport<T>,
    rows: Vec<RentRow>,
) -> Result<()> {
    match format {
        OutputFormat::Json => output::print_json(report),
        OutputFormat::Csv => output::print_csv(&rows),
        OutputFormat::Table => {
            output::print_rent_table(&rows, &report.summary, report.total_count);
            Ok(())
        }
    }
}
