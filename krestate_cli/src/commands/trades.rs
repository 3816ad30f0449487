//! The `trades` subcommand: sale records with summary statistics.

use anyhow::Result;
use clap::Args;
use krestate_lib::OpenDataTools;

use super::PropertyType;
use crate::output::{self, OutputFormat, TradeRow};

#[derive(Args)]
pub struct TradesArgs {
    /// Property family
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

pub async fn run(args: &TradesArgs, tools: &OpenDataTools, format: &OutputFormat) -> Result<()> {
    match args.property_type {
        PropertyType::Apt => {
            let report = tools
                .apartment_trades(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<TradeRow> = report.items.iter().map(TradeRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::Officetel => {
            let report = tools
                .officetel_trades(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<TradeRow> = report.items.iter().map(TradeRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::Villa => {
            let report = tools
                .villa_trades(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<TradeRow> = report.items.iter().map(TradeRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::SingleHouse => {
            let report = tools
                .single_house_trades(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<TradeRow> = report.items.iter().map(TradeRow::from).collect();
            print(format, &report, rows)
        }
        PropertyType::Commercial => {
            let report = tools
                .commercial_trades(&args.region, &args.month, args.rows)
                .await
                .map_err(output::tool_error)?;
            let rows: Vec<TradeRow> = report.items.iter().map(TradeRow::from).collect();
            print(format, &report, rows)
        }
    }
}

fn print<T: serde::Serialize>(
    format: &OutputFormat,
    report: &krestate_lib::tools::TradeReport<T>,
    rows: Vec<TradeRow>,
) -> Result<()> {
    match format {
        OutputFormat::Json => output::print_json(report),
        OutputFormat::Csv => output::print_csv(&rows),
        OutputFormat::Table => {
            output::print_trade_table(&rows, &report.summary, report.total_count);
            Ok(())
        }
    }
}
