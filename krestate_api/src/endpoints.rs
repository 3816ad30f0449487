//! Upstream endpoint URLs and URL builders.

use url::Url;

use crate::errors::FetchError;

// MOLIT RTMS (국토교통부 실거래가) XML endpoints.
pub const APT_TRADE_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcAptTrade/getRTMSDataSvcAptTrade";
pub const APT_RENT_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcAptRent/getRTMSDataSvcAptRent";
pub const OFFI_TRADE_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcOffiTrade/getRTMSDataSvcOffiTrade";
pub const OFFI_RENT_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcOffiRent/getRTMSDataSvcOffiRent";
pub const VILLA_TRADE_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcRHTrade/getRTMSDataSvcRHTrade";
pub const VILLA_RENT_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcRHRent/getRTMSDataSvcRHRent";
pub const SINGLE_TRADE_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcSHTrade/getRTMSDataSvcSHTrade";
pub const SINGLE_RENT_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcSHRent/getRTMSDataSvcSHRent";
pub const COMMERCIAL_TRADE_URL: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcNrgTrade/getRTMSDataSvcNrgTrade";

// odcloud (공공데이터포털) JSON endpoints.
pub const ODCLOUD_BASE_URL: &str = "https://api.odcloud.kr/api";
pub const APT_SUBSCRIPTION_INFO_PATH: &str =
    "/15101046/v1/uddi:14a46595-03dd-47d3-a418-d64e52820598";
pub const APPLYHOME_STAT_BASE_URL: &str = "https://api.odcloud.kr/api/ApplyhomeStatSvc/v1";

// Onbid (공매) endpoints.
pub const ONBID_BID_RESULT_LIST_URL: &str =
    "http://apis.data.go.kr/B010003/OnbidCltrBidRsltListSrvc/getCltrBidRsltList";
pub const ONBID_BID_RESULT_DETAIL_URL: &str =
    "http://apis.data.go.kr/B010003/OnbidCltrBidRsltDtlSrvc/getCltrBidRsltDtl";
pub const ONBID_THING_INFO_LIST_URL: &str =
    "http://openapi.onbid.co.kr/openapi/services/ThingInfoInquireSvc/getUnifyUsageCltr";

pub const ONBID_CODE_INFO_BASE_URL: &str =
    "http://openapi.onbid.co.kr/openapi/services/OnbidCodeInfoInquireSvc";

/// Build a MOLIT RTMS URL for one (region, month) query page.
pub fn build_molit_url(
    base: &str,
    service_key: &str,
    region_code: &str,
    year_month: &str,
    num_of_rows: u32,
) -> Result<String, FetchError> {
    let mut url = parse_base(base)?;
    url.query_pairs_mut()
        .append_pair("serviceKey", service_key)
        .append_pair("LAWD_CD", region_code)
        .append_pair("DEAL_YMD", year_month)
        .append_pair("numOfRows", &num_of_rows.to_string())
        .append_pair("pageNo", "1");
    Ok(url.into())
}

/// Build a service URL with the serviceKey followed by arbitrary query
/// parameters, in the order given.
pub fn build_service_url(
    base: &str,
    service_key: &str,
    params: &[(String, String)],
) -> Result<String, FetchError> {
    let mut url = parse_base(base)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("serviceKey", service_key);
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url.into())
}

fn parse_base(base: &str) -> Result<Url, FetchError> {
    Url::parse(base).map_err(|e| FetchError::Network(format!("invalid URL {base}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molit_url_carries_all_query_parameters() {
        let url = build_molit_url(APT_TRADE_URL, "my-key", "11440", "202501", 100).unwrap();
        assert!(url.starts_with(APT_TRADE_URL));
        assert!(url.contains("serviceKey=my-key"));
        assert!(url.contains("LAWD_CD=11440"));
        assert!(url.contains("DEAL_YMD=202501"));
        assert!(url.contains("numOfRows=100"));
        assert!(url.contains("pageNo=1"));
    }

    #[test]
    fn service_key_is_percent_encoded_once() {
        // data.go.kr issues keys containing '+' and '=' characters.
        let url = build_molit_url(APT_TRADE_URL, "abc+def==", "11440", "202501", 10).unwrap();
        assert!(url.contains("serviceKey=abc%2Bdef%3D%3D"));
    }

    #[test]
    fn service_url_preserves_parameter_order() {
        let params = vec![
            ("pageNo".to_string(), "1".to_string()),
            ("numOfRows".to_string(), "20".to_string()),
            ("CTGR_ID".to_string(), "10000".to_string()),
        ];
        let url = build_service_url(ONBID_CODE_INFO_BASE_URL, "key", &params).unwrap();
        let query = url.split_once('?').unwrap().1;
        assert_eq!(query, "serviceKey=key&pageNo=1&numOfRows=20&CTGR_ID=10000");
    }

    #[test]
    fn invalid_base_is_reported_as_network_error() {
        let err = build_service_url("not a url", "key", &[]).unwrap_err();
        assert_eq!(err.kind(), "network_error");
    }
}
