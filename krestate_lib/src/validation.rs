//! Input validation for the tool operations.
//!
//! All validators run before any network call so invalid parameters never
//! consume upstream quota.

use chrono::{Datelike, Utc};

use crate::error::ToolError;
use crate::region;

/// The MOLIT datasets start in January 2006.
const MIN_DEAL_YM: i32 = 200_601;
/// Upstream page-size ceiling.
const MAX_NUM_OF_ROWS: u32 = 1000;

/// Validate a 5-digit legal district code against the embedded table.
pub fn validate_region_code(code: &str) -> Result<(), ToolError> {
    if code.is_empty() {
        return Err(ToolError::invalid_input(
            "Region code must not be empty. Example: '11440' (Mapo-gu)",
        ));
    }
    if code.len() != 5 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ToolError::invalid_input(format!(
            "Region code must be a 5-digit number. Got: '{code}'. Example: '11440' (Mapo-gu)"
        )));
    }
    if !region::is_valid_lawd_code(code) {
        return Err(ToolError::invalid_input(format!(
            "Region code '{code}' is not a valid legal district code. \
             Use the region lookup to find the correct code."
        )));
    }
    Ok(())
}

/// Validate a YYYYMM period between 2006-01 and the current month.
pub fn validate_deal_ymd(ymd: &str) -> Result<(), ToolError> {
    if ymd.is_empty() {
        return Err(ToolError::invalid_input(
            "Year-month must not be empty. Example: '202501' (January 2025)",
        ));
    }
    if ymd.len() != 6 || !ymd.chars().all(|c| c.is_ascii_digit()) {
        return Err(ToolError::invalid_input(format!(
            "Year-month must be in YYYYMM format. Got: '{ymd}'. Example: '202501' (January 2025)"
        )));
    }

    let year: i32 = ymd[..4].parse().unwrap_or(0);
    let month: u32 = ymd[4..].parse().unwrap_or(0);
    if !(1..=12).contains(&month) {
        return Err(ToolError::invalid_input(format!(
            "Month must be between 01 and 12. Got: '{month:02}'. Example: '202501' (January 2025)"
        )));
    }

    let value = year * 100 + month as i32;
    if value < MIN_DEAL_YM {
        return Err(ToolError::invalid_input(format!(
            "Year-month must be 2006-01 or later. Got: '{ymd}'. \
             The API provides data starting from January 2006."
        )));
    }

    let now = Utc::now();
    let max = now.year() * 100 + now.month() as i32;
    if value > max {
        return Err(ToolError::invalid_input(format!(
            "Year-month cannot be in the future. Got: '{ymd}'. Current period: {max}"
        )));
    }

    Ok(())
}

/// Validate a page size against the upstream ceiling.
pub fn validate_num_of_rows(num_of_rows: u32) -> Result<(), ToolError> {
    if num_of_rows < 1 {
        return Err(ToolError::invalid_input(format!(
            "num_of_rows must be at least 1. Got: {num_of_rows}. Example: 100"
        )));
    }
    if num_of_rows > MAX_NUM_OF_ROWS {
        return Err(ToolError::invalid_input(format!(
            "num_of_rows cannot exceed {MAX_NUM_OF_ROWS}. Got: {num_of_rows}. \
             Use multiple requests for more data."
        )));
    }
    Ok(())
}

/// Validate a 1-based page number.
pub fn validate_page_no(page_no: u32) -> Result<(), ToolError> {
    if page_no < 1 {
        return Err(ToolError::invalid_input(format!(
            "page_no must be >= 1. Got: {page_no}. Example: 1"
        )));
    }
    Ok(())
}

/// Validate a required identifier-like string argument.
pub fn validate_required(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_input(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_known_region_code() {
        assert!(validate_region_code("11440").is_ok());
    }

    #[test]
    fn rejects_malformed_region_codes() {
        for code in ["", "1144", "114400", "1144a", "abcde"] {
            let err = validate_region_code(code).unwrap_err();
            assert_eq!(err.error, ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn rejects_unknown_region_code() {
        let err = validate_region_code("99999").unwrap_err();
        assert!(err.message.contains("not a valid legal district code"));
    }

    #[test]
    fn accepts_valid_period() {
        assert!(validate_deal_ymd("202501").is_ok());
        assert!(validate_deal_ymd("200601").is_ok());
    }

    #[test]
    fn rejects_malformed_periods() {
        for ymd in ["", "2025", "2025011", "20251a", "202500", "202513"] {
            assert!(validate_deal_ymd(ymd).is_err(), "accepted {ymd:?}");
        }
    }

    #[test]
    fn rejects_periods_before_dataset_start() {
        let err = validate_deal_ymd("200512").unwrap_err();
        assert!(err.message.contains("2006-01 or later"));
    }

    #[test]
    fn rejects_future_periods() {
        let next_year = Utc::now().year() + 1;
        let err = validate_deal_ymd(&format!("{next_year}01")).unwrap_err();
        assert!(err.message.contains("cannot be in the future"));
    }

    #[test]
    fn pagination_bounds() {
        assert!(validate_num_of_rows(1).is_ok());
        assert!(validate_num_of_rows(1000).is_ok());
        assert!(validate_num_of_rows(0).is_err());
        assert!(validate_num_of_rows(1001).is_err());

        assert!(validate_page_no(1).is_ok());
        assert!(validate_page_no(0).is_err());
    }

    #[test]
    fn required_fields() {
        assert!(validate_required("cltr_mng_no", "1111000001").is_ok());
        let err = validate_required("cltr_mng_no", "  ").unwrap_err();
        assert_eq!(err.message, "cltr_mng_no is required");
    }
}
