//! Legal district code lookup backed by an embedded table.
//!
//! Follows the compile-time `include_str!` seed-data pattern. The table
//! holds 10-digit legal district codes; the MOLIT APIs take the 5-digit
//! prefix. Gu/gun-level rows (trailing `00000`) are preferred as the
//! representative match.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::ToolError;

const REGION_TABLE: &str = include_str!("../seed_data/region_codes.tsv");

/// One matching district: 10-digit source code plus full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionMatch {
    pub code: String,
    pub name: String,
}

/// Result of a region search: the 5-digit API code of the best match,
/// its full name, and every match for disambiguation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionResult {
    pub region_code: String,
    pub full_name: String,
    pub matches: Vec<RegionMatch>,
}

fn region_rows() -> &'static [(String, String)] {
    static ROWS: OnceLock<Vec<(String, String)>> = OnceLock::new();
    ROWS.get_or_init(|| {
        REGION_TABLE
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut parts = line.split('\t');
                let code = parts.next()?;
                let name = parts.next()?;
                let status = parts.next()?;
                (status == "존재").then(|| (code.to_string(), name.to_string()))
            })
            .collect()
    })
}

/// Whether a 5-digit code appears in the district table.
pub fn is_valid_lawd_code(code: &str) -> bool {
    static CODES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    CODES
        .get_or_init(|| region_rows().iter().map(|(code, _)| &code[..5]).collect())
        .contains(code)
}

fn is_gu_gun(code: &str) -> bool {
    code.len() == 10 && code.ends_with("00000")
}

/// Convert a free-form region name into a legal district code.
///
/// Every whitespace-separated token must appear in the district name.
/// Gu/gun-level matches sort first and provide the representative code.
pub fn search_region_code(query: &str) -> Result<RegionResult, ToolError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ToolError::invalid_input("Region name must not be empty."));
    }

    let tokens: Vec<&str> = query.split_whitespace().collect();
    let mut matched: Vec<&(String, String)> = region_rows()
        .iter()
        .filter(|(_, name)| tokens.iter().all(|token| name.contains(token)))
        .collect();

    if matched.is_empty() {
        tracing::info!(query, "region search found no match");
        return Err(ToolError::invalid_input(format!(
            "No region found for: {query}"
        )));
    }

    matched.sort_by(|(a_code, _), (b_code, _)| {
        (!is_gu_gun(a_code), a_code).cmp(&(!is_gu_gun(b_code), b_code))
    });

    let (best_code, best_name) = matched
        .iter()
        .find(|(code, _)| is_gu_gun(code))
        .unwrap_or(&matched[0]);

    tracing::debug!(
        query,
        region_code = &best_code[..5],
        match_count = matched.len(),
        "region search success"
    );

    Ok(RegionResult {
        region_code: best_code[..5].to_string(),
        full_name: best_name.clone(),
        matches: matched
            .iter()
            .map(|(code, name)| RegionMatch {
                code: code.clone(),
                name: name.clone(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_finds_gu() {
        let result = search_region_code("마포구").unwrap();
        assert_eq!(result.region_code, "11440");
        assert_eq!(result.full_name, "서울특별시 마포구");
        assert!(result.matches.len() > 1);
    }

    #[test]
    fn multi_token_narrows_to_dong() {
        let result = search_region_code("마포구 합정동").unwrap();
        assert_eq!(result.region_code, "11440");
        assert!(result
            .matches
            .iter()
            .any(|m| m.name == "서울특별시 마포구 합정동"));
    }

    #[test]
    fn gu_level_match_sorts_first() {
        let result = search_region_code("해운대구").unwrap();
        assert_eq!(result.full_name, "부산광역시 해운대구");
        assert_eq!(result.matches[0].code, "2635000000");
    }

    #[test]
    fn empty_query_is_invalid() {
        let err = search_region_code("   ").unwrap_err();
        assert_eq!(err.error, crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn unknown_region_reports_no_match() {
        let err = search_region_code("아무데도없는구").unwrap_err();
        assert!(err.message.contains("No region found"));
    }

    #[test]
    fn abolished_rows_are_excluded() {
        // 공릉1동 is marked abolished in the table.
        assert!(search_region_code("공릉1동").is_err());
    }

    #[test]
    fn lawd_code_membership() {
        assert!(is_valid_lawd_code("11440"));
        assert!(is_valid_lawd_code("26350"));
        assert!(!is_valid_lawd_code("00000"));
        assert!(!is_valid_lawd_code("99999"));
    }
}
