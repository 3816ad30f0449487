//! The `collect` subcommand: month-range bulk collection to JSON files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::Value;

use krestate_lib::{OpenDataTools, ToolError};

use super::PropertyType;

#[derive(Args)]
pub struct CollectArgs {
    /// Property family
    #[arg(long, value_enum, default_value_t = PropertyType::Apt)]
    pub property_type: PropertyType,

    /// Collect lease records instead of sales
    #[arg(long)]
    pub rent: bool,

    /// 5-digit legal district code
    #[arg(long)]
    pub region: String,

    /// First month to collect (YYYYMM)
    #[arg(long)]
    pub from: String,

    /// Last month to collect (YYYYMM, inclusive)
    #[arg(long)]
    pub to: String,

    /// Records per month
    #[arg(long, default_value_t = 1000)]
    pub rows: u32,

    /// Output directory for per-month JSON files and the manifest
    #[arg(long, default_value = "collected")]
    pub out: PathBuf,
}

/// Collection outcome for one YYYYMM period, written to the manifest.
#[derive(Debug, Serialize)]
struct MonthResult {
    year_month: String,
    ok: bool,
    total_count: Option<i64>,
    sample_count: Option<usize>,
    error: Option<String>,
    message: Option<String>,
    file: Option<String>,
}

pub async fn run(args: &CollectArgs, tools: &OpenDataTools) -> Result<()> {
    let months = iter_year_months(&args.from, &args.to)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let kind = if args.rent { "rent" } else { "trades" };
    let bar = ProgressBar::new(months.len() as u64);
    let mut results = Vec::with_capacity(months.len());

    for month in &months {
        bar.set_message(month.clone());
        let outcome = collect_month(tools, args, month).await;
        results.push(record_outcome(args, kind, month, outcome)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    write_manifest(&args.out, &results)?;

    let collected = results.iter().filter(|r| r.ok).count();
    println!(
        "collected {collected}/{} months into {} (manifest.csv written)",
        months.len(),
        args.out.display()
    );
    Ok(())
}

fn record_outcome(
    args: &CollectArgs,
    kind: &str,
    month: &str,
    outcome: Result<(Value, i64, usize), ToolError>,
) -> Result<MonthResult> {
    match outcome {
        Ok((payload, total_count, sample_count)) => {
            let file_name = format!(
                "{}_{kind}_{}_{month}.json",
                property_slug(args.property_type),
                args.region
            );
            let path = args.out.join(&file_name);
            std::fs::write(&path, serde_json::to_vec_pretty(&payload)?)
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(MonthResult {
                year_month: month.to_string(),
                ok: true,
                total_count: Some(total_count),
                sample_count: Some(sample_count),
                error: None,
                message: None,
                file: Some(file_name),
            })
        }
        Err(err) => Ok(MonthResult {
            year_month: month.to_string(),
            ok: false,
            total_count: None,
            sample_count: None,
            error: Some(err.error.as_str().to_string()),
            message: Some(err.message),
            file: None,
        }),
    }
}

async fn collect_month(
    tools: &OpenDataTools,
    args: &CollectArgs,
    month: &str,
) -> Result<(Value, i64, usize), ToolError> {
    let region = &args.region;
    let rows = args.rows;
    match (args.property_type, args.rent) {
        (PropertyType::Apt, false) => {
            let report = tools.apartment_trades(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Officetel, false) => {
            let report = tools.officetel_trades(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Villa, false) => {
            let report = tools.villa_trades(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::SingleHouse, false) => {
            let report = tools.single_house_trades(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Commercial, false) => {
            let report = tools.commercial_trades(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Apt, true) => {
            let report = tools.apartment_rent(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Officetel, true) => {
            let report = tools.officetel_rent(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Villa, true) => {
            let report = tools.villa_rent(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::SingleHouse, true) => {
            let report = tools.single_house_rent(region, month, rows).await?;
            Ok((to_value(&report)?, report.total_count, report.summary.sample_count))
        }
        (PropertyType::Commercial, true) => Err(ToolError::invalid_input(
            "commercial buildings have no rent dataset",
        )),
    }
}

fn to_value<T: Serialize>(report: &T) -> Result<Value, ToolError> {
    serde_json::to_value(report).map_err(ToolError::internal_error)
}

fn property_slug(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Apt => "apt",
        PropertyType::Officetel => "officetel",
        PropertyType::Villa => "villa",
        PropertyType::SingleHouse => "single_house",
        PropertyType::Commercial => "commercial",
    }
}

fn write_manifest(out: &Path, results: &[MonthResult]) -> Result<()> {
    let path = out.join("manifest.csv");
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

/// Expand an inclusive YYYYMM range into each month it covers.
fn iter_year_months(start: &str, end: &str) -> Result<Vec<String>> {
    let parse = |value: &str| -> Result<(i32, u32)> {
        if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
            bail!("'{value}' is not in YYYYMM format");
        }
        let year = value[..4].parse()?;
        let month: u32 = value[4..].parse()?;
        if !(1..=12).contains(&month) {
            bail!("'{value}' has an invalid month");
        }
        Ok((year, month))
    };

    let (start_year, start_month) = parse(start)?;
    let (end_year, end_month) = parse(end)?;
    if (start_year, start_month) > (end_year, end_month) {
        bail!("start month {start} is after end month {end}");
    }

    let mut months = Vec::new();
    let (mut year, mut month) = (start_year, start_month);
    while (year, month) <= (end_year, end_month) {
        months.push(format!("{year:04}{month:02}"));
        month += 1;
        if month == 13 {
            year += 1;
            month = 1;
        }
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_within_one_year() {
        let months = iter_year_months("202501", "202503").unwrap();
        assert_eq!(months, vec!["202501", "202502", "202503"]);
    }

    #[test]
    fn expands_across_year_boundary() {
        let months = iter_year_months("202411", "202502").unwrap();
        assert_eq!(months, vec!["202411", "202412", "202501", "202502"]);
    }

    #[test]
    fn single_month_range() {
        assert_eq!(iter_year_months("202501", "202501").unwrap(), vec!["202501"]);
    }

    #[test]
    fn rejects_reversed_range() {
        assert!(iter_year_months("202503", "202501").is_err());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(iter_year_months("2025", "202503").is_err());
        assert!(iter_year_months("202500", "202503").is_err());
        assert!(iter_year_months("2025ab", "202503").is_err());
    }

    #[test]
    fn property_slugs() {
        assert_eq!(property_slug(PropertyType::SingleHouse), "single_house");
        assert_eq!(property_slug(PropertyType::Apt), "apt");
    }
}
