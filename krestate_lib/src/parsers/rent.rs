//! Normalizers for the MOLIT lease/rent XML responses.
//!
//! Rent families require a parsable deposit and default the monthly rent
//! to 0 (a pure-deposit jeonse lease reports no monthly rent).

use serde::Serialize;

use super::{parse_xml_document, ParseError, Parsed, RawItem};
use crate::summary::RentPriced;

const CANCELLED: &str = "O";
const SUCCESS_CODE: &str = "000";

/// Apartment lease record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AptRent {
    pub unit_name: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub deposit_10k: i64,
    pub monthly_rent_10k: i64,
    pub contract_type: String,
    pub trade_date: String,
    pub build_year: i64,
}

/// Officetel lease record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffiRent {
    pub unit_name: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub deposit_10k: i64,
    pub monthly_rent_10k: i64,
    pub contract_type: String,
    pub trade_date: String,
    pub build_year: i64,
}

/// Row-house / multi-family (villa) lease record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillaRent {
    pub unit_name: String,
    pub house_type: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub deposit_10k: i64,
    pub monthly_rent_10k: i64,
    pub contract_type: String,
    pub trade_date: String,
    pub build_year: i64,
}

/// Detached / single house lease record. No unit name or floor upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleHouseRent {
    pub unit_name: String,
    pub house_type: String,
    pub dong: String,
    pub area_sqm: f64,
    pub floor: i64,
    pub deposit_10k: i64,
    pub monthly_rent_10k: i64,
    pub contract_type: String,
    pub trade_date: String,
    pub build_year: i64,
}

impl RentPriced for AptRent {
    fn deposit_10k(&self) -> i64 {
        self.deposit_10k
    }
    fn monthly_rent_10k(&self) -> i64 {
        self.monthly_rent_10k
    }
}
impl RentPriced for OffiRent {
    fn deposit_10k(&self) -> i64 {
        self.deposit_10k
    }
    fn monthly_rent_10k(&self) -> i64 {
        self.monthly_rent_10k
    }
}
impl RentPriced for VillaRent {
    fn deposit_10k(&self) -> i64 {
        self.deposit_10k
    }
    fn monthly_rent_10k(&self) -> i64 {
        self.monthly_rent_10k
    }
}
impl RentPriced for SingleHouseRent {
    fn deposit_10k(&self) -> i64 {
        self.deposit_10k
    }
    fn monthly_rent_10k(&self) -> i64 {
        self.monthly_rent_10k
    }
}

fn parse_rent_family<T>(
    xml: &str,
    build: impl Fn(&RawItem, i64, i64) -> T,
) -> Result<Parsed<T>, ParseError> {
    let doc = parse_xml_document(xml)?;
    if doc.result_code != SUCCESS_CODE {
        return Ok(Parsed::error(doc.result_code, doc.total_count));
    }

    let mut records = Vec::new();
    for item in &doc.items {
        if item.text("cdealType") == CANCELLED {
            continue;
        }
        let Some(deposit) = item.amount("deposit") else {
            continue;
        };
        let monthly_rent = item.amount_or_zero("monthlyRent");
        records.push(build(item, deposit, monthly_rent));
    }
    Ok(Parsed {
        records,
        error_code: None,
        total_count: doc.total_count,
    })
}

pub fn parse_apt_rent(xml: &str) -> Result<Parsed<AptRent>, ParseError> {
    parse_rent_family(xml, |item, deposit, monthly_rent| AptRent {
        unit_name: item.text("aptNm").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("excluUseAr"),
        floor: item.int("floor"),
        deposit_10k: deposit,
        monthly_rent_10k: monthly_rent,
        contract_type: item.text("contractType").to_owned(),
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
    })
}

pub fn parse_officetel_rent(xml: &str) -> Result<Parsed<OffiRent>, ParseError> {
    parse_rent_family(xml, |item, deposit, monthly_rent| OffiRent {
        unit_name: item.text("offiNm").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("excluUseAr"),
        floor: item.int("floor"),
        deposit_10k: deposit,
        monthly_rent_10k: monthly_rent,
        contract_type: item.text("contractType").to_owned(),
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
    })
}

pub fn parse_villa_rent(xml: &str) -> Result<Parsed<VillaRent>, ParseError> {
    parse_rent_family(xml, |item, deposit, monthly_rent| VillaRent {
        unit_name: item.text("mhouseNm").to_owned(),
        house_type: item.text("houseType").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("excluUseAr"),
        floor: item.int("floor"),
        deposit_10k: deposit,
        monthly_rent_10k: monthly_rent,
        contract_type: item.text("contractType").to_owned(),
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
    })
}

pub fn parse_single_house_rent(xml: &str) -> Result<Parsed<SingleHouseRent>, ParseError> {
    parse_rent_family(xml, |item, deposit, monthly_rent| SingleHouseRent {
        unit_name: String::new(),
        house_type: item.text("houseType").to_owned(),
        dong: item.text("umdNm").to_owned(),
        area_sqm: item.float("totalFloorAr"),
        floor: 0,
        deposit_10k: deposit,
        monthly_rent_10k: monthly_rent,
        contract_type: item.text("contractType").to_owned(),
        trade_date: item.deal_date(),
        build_year: item.int("buildYear"),
    })
}
