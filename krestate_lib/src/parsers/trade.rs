//! Normalizers for the MOLIT sale (trade) XML responses.
//!
//! The five families share one skeleton but differ in which source fields
//! map to unit name, area, and floor. Some families have no floor concept
//! and always report 0; the detached-house family has no unit name and
//! reports an empty string. This is deliberate and mirrors the upstream
//! schemas field by field.

use serde::Serialize;

use super::{parse_xml_document, ParseError, Parsed, RawItem};
use crate::summary::SalePriced;

/// Sentinel marking a retroactively cancelled transaction.
const CANCELLED: &str = "O";
/// MOLIT success result code.
const SUCCESS_CODE: &str = "000";

/// Apartment sale record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AptTrade {
    pub apt_name: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub price_10k: i64,
    pub trade_date: String,
    pub build_year: i64,
    pub deal_type: String,
}

/// Officetel sale record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffiTrade {
    pub unit_name: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub price_10k: i64,
    pub trade_date: String,
    pub build_year: i64,
    pub deal_type: String,
}

/// Row-house / multi-family (villa) sale record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillaTrade {
    pub unit_name: String,
    pub house_type: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub price_10k: i64,
    pub trade_date: String,
    pub build_year: i64,
    pub deal_type: String,
}

/// Detached / single house sale record. The upstream schema has no unit
/// name or floor; `unit_name` is always empty and `floor` always 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleHouseTrade {
    pub unit_name: String,
    pub house_type: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub price_10k: i64,
    pub trade_date: String,
    pub build_year: i64,
    pub deal_type: String,
}

/// Commercial building sale record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommercialTrade {
    pub building_type: String,
    pub building_use: String,
    pub land_use: String,
    pub dong: String,
    pub building_ar: f64,
    pub floor: i64,
    pub price_10k: i64,
    pub trade_date: String,
    pub build_year: i64,
    pub deal_type: String,
}

impl SalePriced for AptTrade {
    fn sale_price_10k(&self) -> i64 {
        self.price_10k
    }
}
impl SalePriced for OffiTrade {
    fn sale_price_10k(&self) -> i64 {
        self.price_10k
    }
}
impl SalePriced for VillaTrade {
    fn sale_price_10k(&self) -> i64 {
        self.price_10k
    }
}
impl SalePriced for SingleHouseTrade {
    fn sale_price_10k(&self) -> i64 {
        self.price_10k
    }
}
impl SalePriced for CommercialTrade {
    fn sale_price_10k(&self) -> i64 {
        self.price_10k
    }
}

/// Shared skeleton: check the result code, drop cancelled items, require a
/// parsable sale amount, then delegate field mapping to the family.
fn parse_trade_family<T>(
    xml: &str,
    cancel_tag: &str,
    build: impl Fn(&RawItem, i64) -> T,
) -> Result<Parsed<T>, ParseError> {
    let doc = parse_xml_document(xml)?;
    if doc.result_code != SUCCESS_CODE {
        return Ok(Parsed::error(doc.result_code, doc.total_count));
    }

    let mut records = Vec::new();
    for item in &doc.items {
        if item.text(cancel_tag) == CANCELLED {
            continue;
        }
        let Some(price) = item.amount("dealAmount") else {
            continue;
        };
        records.push(build(item, price));
    }
    Ok(Parsed {
        records,
        error_code: None,
        total_count: doc.total_count,
    })
}

pub fn parse_apt_trades(xml: &str) -> Result<Parsed<AptTrade>, ParseError> {
    parse_trade_family(xml, "cdealType", |item, price| AptTrade {
        apt_name: item.text("aptNm").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("excluUseAr"),
        floor: item.int("floor"),
        price_10k: price,
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
        deal_type: item.text("dealingGbn").to_owned(),
    })
}

pub fn parse_officetel_trades(xml: &str) -> Result<Parsed<OffiTrade>, ParseError> {
    parse_trade_family(xml, "cdealType", |item, price| OffiTrade {
        unit_name: item.text("offiNm").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("excluUseAr"),
        floor: item.int("floor"),
        price_10k: price,
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
        deal_type: item.text("dealingGbn").to_owned(),
    })
}

pub fn parse_villa_trades(xml: &str) -> Result<Parsed<VillaTrade>, ParseError> {
    parse_trade_family(xml, "cdealType", |item, price| VillaTrade {
        unit_name: item.text("mhouseNm").to_owned(),
        house_type: item.text("houseType").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("excluUseAr"),
        floor: item.int("floor"),
        price_10k: price,
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
        deal_type: item.text("dealingGbn").to_owned(),
    })
}

pub fn parse_single_house_trades(xml: &str) -> Result<Parsed<SingleHouseTrade>, ParseError> {
    parse_trade_family(xml, "cdealType", |item, price| SingleHouseTrade {
        unit_name: String::new(),
        house_type: item.text("houseType").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("totalFloorAr"),
        floor: 0,
        price_10k: price,
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
        deal_type: item.text("dealingGbn").to_owned(),
    })
}

/// Commercial responses spell the cancelled flag in lowercase.
pub fn parse_commercial_trade(xml: &str) -> Result<Parsed<CommercialTrade>, ParseError> {
    parse_trade_family(xml, "cdealtype", |item, price| CommercialTrade {
        building_type: item.text("buildingType").to_owned(),
        building_use: item.text("buildingUse").to_owned(),
        land_use: item.text("landUse").to_owned(),
        dong: item.text("umdNm").to_owned(),
        building_ar: item.float("buildingAr"),
        floor: item.int("floor"),
        price_10k: price,
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
        deal_type: item.text("dealingGbn").to_owned(),
    })
}
