use anyhow::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use krestate_lib::parsers::rent::{AptRent, OffiRent, SingleHouseRent, VillaRent};
use krestate_lib::parsers::trade::{
    AptTrade, CommercialTrade, OffiTrade, SingleHouseTrade, VillaTrade,
};
use krestate_lib::region::RegionMatch;
use krestate_lib::summary::{RentSummary, TradeSummary};
use krestate_lib::ToolError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print serializable rows as CSV on stdout.
pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Convert a tool-layer error payload into the process exit error,
/// keeping the serializable wire shape visible to the user.
pub fn tool_error(err: ToolError) -> anyhow::Error {
    match serde_json::to_string_pretty(&err) {
        Ok(payload) => anyhow::anyhow!(payload),
        Err(_) => anyhow::anyhow!(err.to_string()),
    }
}

#[derive(Tabled, Serialize)]
pub struct TradeRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Dong")]
    pub dong: String,
    #[tabled(rename = "Area m2")]
    pub area_sqm: f64,
    #[tabled(rename = "Floor")]
    pub floor: i64,
    #[tabled(rename = "Price 10k")]
    pub price_10k: i64,
}

#[derive(Tabled, Serialize)]
pub struct RentRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Dong")]
    pub dong: String,
    #[tabled(rename = "Area m2")]
    pub area_sqm: f64,
    #[tabled(rename = "Floor")]
    pub floor: i64,
    #[tabled(rename = "Deposit 10k")]
    pub deposit_10k: i64,
    #[tabled(rename = "Rent 10k")]
    pub monthly_rent_10k: i64,
}

#[derive(Tabled, Serialize)]
pub struct RegionRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&AptTrade> for TradeRow {
    fn from(r: &AptTrade) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.apt_name.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            price_10k: r.price_10k,
        }
    }
}

impl From<&OffiTrade> for TradeRow {
    fn from(r: &OffiTrade) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.unit_name.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            price_10k: r.price_10k,
        }
    }
}

impl From<&VillaTrade> for TradeRow {
    fn from(r: &VillaTrade) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.unit_name.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            price_10k: r.price_10k,
        }
    }
}

impl From<&SingleHouseTrade> for TradeRow {
    fn from(r: &SingleHouseTrade) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.house_type.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            price_10k: r.price_10k,
        }
    }
}

impl From<&CommercialTrade> for TradeRow {
    fn from(r: &CommercialTrade) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.building_type.clone(),
            dong: r.dong.clone(),
            area_sqm: r.building_ar,
            floor: r.floor,
            price_10k: r.price_10k,
        }
    }
}

impl From<&AptRent> for RentRow {
    fn from(r: &AptRent) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.unit_name.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            deposit_10k: r.deposit_10k,
            monthly_rent_10k: r.monthly_rent_10k,
        }
    }
}

impl From<&OffiRent> for RentRow {
    fn from(r: &OffiRent) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.unit_name.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            deposit_10k: r.deposit_10k,
            monthly_rent_10k: r.monthly_rent_10k,
        }
    }
}

impl From<&VillaRent> for RentRow {
    fn from(r: &VillaRent) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.unit_name.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            deposit_10k: r.deposit_10k,
            monthly_rent_10k: r.monthly_rent_10k,
        }
    }
}

impl From<&SingleHouseRent> for RentRow {
    fn from(r: &SingleHouseRent) -> Self {
        Self {
            date: r.trade_date.clone(),
            name: r.house_type.clone(),
            dong: r.dong.clone(),
            area_sqm: r.area_sqm,
            floor: r.floor,
            deposit_10k: r.deposit_10k,
            monthly_rent_10k: r.monthly_rent_10k,
        }
    }
}

impl From<&RegionMatch> for RegionRow {
    fn from(m: &RegionMatch) -> Self {
        Self {
            code: m.code.clone(),
            name: m.name.clone(),
        }
    }
}

pub fn print_trade_table(rows: &[TradeRow], summary: &TradeSummary, total_count: i64) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{} of {} records | median {} / min {} / max {} (10k KRW)",
        summary.sample_count,
        total_count,
        summary.median_price_10k,
        summary.min_price_10k,
        summary.max_price_10k
    );
}

pub fn print_rent_table(rows: &[RentRow], summary: &RentSummary, total_count: i64) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{} of {} records | deposit median {} / min {} / max {}, monthly rent avg {} (10k KRW)",
        summary.sample_count,
        total_count,
        summary.median_deposit_10k,
        summary.min_deposit_10k,
        summary.max_deposit_10k,
        summary.monthly_rent_avg_10k
    );
}

pub fn print_region_table(rows: &[RegionRow], best_code: &str, best_name: &str) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("best match: {best_name} (API code {best_code})");
}
