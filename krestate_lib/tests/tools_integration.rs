use std::time::Duration;

use krestate_api::{BreakerConfig, FetchConfig, OpenDataClient, RetryPolicy};
use krestate_lib::cache::ApiCache;
use krestate_lib::error::ErrorKind;
use krestate_lib::tools::{AuctionFilter, CodeLookup, ListingFilter, ServiceUrls, StatKind};
use krestate_lib::{CachedClient, Config, OpenDataTools};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APT_TRADES_XML: &str = include_str!("fixtures/apt_trades.xml");
const APT_RENT_XML: &str = include_str!("fixtures/apt_rent.xml");
const NO_DATA_XML: &str = include_str!("fixtures/no_data.xml");
const THING_INFO_XML: &str = include_str!("fixtures/onbid_thing_info.xml");

fn test_config() -> Config {
    Config {
        data_go_kr: Some("test-molit-key".to_string()),
        onbid: Some("test-onbid-key".to_string()),
        odcloud_api: Some("test-odcloud-key".to_string()),
        odcloud_service: None,
    }
}

fn tools_for(server: &MockServer, config: Config) -> OpenDataTools {
    let inner = OpenDataClient::with_config(FetchConfig {
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(500),
        slow_response_threshold: Duration::from_secs(10),
        retry: RetryPolicy {
            max_attempts: 2,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
        },
        breaker: BreakerConfig::default(),
    })
    .unwrap();
    let client = CachedClient::with_client(inner, ApiCache::new(Duration::from_secs(60), 100));
    OpenDataTools::with_urls(client, config, ServiceUrls::with_base(&server.uri()))
}

#[tokio::test]
async fn apartment_trades_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apt-trade"))
        .and(query_param("serviceKey", "test-molit-key"))
        .and(query_param("LAWD_CD", "11440"))
        .and(query_param("DEAL_YMD", "202501"))
        .respond_with(ResponseTemplate::new(200).set_body_string(APT_TRADES_XML))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let report = tools.apartment_trades("11440", "202501", 100).await.unwrap();

    assert_eq!(report.total_count, 3);
    // The cancelled record is excluded from items and statistics.
    assert_eq!(report.items.len(), 2);
    assert!(!report.items.iter().any(|r| r.apt_name == "Voided Deal"));
    assert_eq!(report.summary.sample_count, 2);
    assert_eq!(report.summary.median_price_10k, 117_500);
    assert_eq!(report.summary.min_price_10k, 100_000);
    assert_eq!(report.summary.max_price_10k, 135_000);
}

#[tokio::test]
async fn apartment_trades_second_call_uses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apt-trade"))
        .respond_with(ResponseTemplate::new(200).set_body_string(APT_TRADES_XML))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    tools.apartment_trades("11440", "202501", 100).await.unwrap();
    tools.apartment_trades("11440", "202501", 100).await.unwrap();

    let stats = tools.client().cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn apartment_rent_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apt-rent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(APT_RENT_XML))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let report = tools.apartment_rent("11440", "202501", 100).await.unwrap();

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.summary.median_deposit_10k, 35_000);
    assert_eq!(report.summary.monthly_rent_avg_10k, 40);
    assert_eq!(report.summary.jeonse_ratio_pct, None);
}

#[tokio::test]
async fn api_error_code_maps_to_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apt-trade"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NO_DATA_XML))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let err = tools
        .apartment_trades("11440", "202501", 100)
        .await
        .unwrap_err();

    assert_eq!(err.error, ErrorKind::ApiError);
    assert_eq!(err.code.as_deref(), Some("03"));
    assert!(err.message.contains("No trade records"));
}

#[tokio::test]
async fn invalid_inputs_never_reach_the_network() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would fail the test via connect error
    // assertions below.
    let tools = tools_for(&server, test_config());

    let err = tools.apartment_trades("1", "202501", 100).await.unwrap_err();
    assert_eq!(err.error, ErrorKind::InvalidInput);

    let err = tools
        .apartment_trades("11440", "209901", 100)
        .await
        .unwrap_err();
    assert_eq!(err.error, ErrorKind::InvalidInput);

    let err = tools.apartment_trades("11440", "202501", 0).await.unwrap_err();
    assert_eq!(err.error, ErrorKind::InvalidInput);

    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn missing_key_is_a_config_error() {
    let server = MockServer::start().await;
    let tools = tools_for(&server, Config::default());

    let err = tools
        .apartment_trades("11440", "202501", 100)
        .await
        .unwrap_err();
    assert_eq!(err.error, ErrorKind::ConfigError);
    assert!(err.message.contains("DATA_GO_KR_API_KEY"));
}

#[tokio::test]
async fn subscription_info_uses_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscription-info"))
        .and(wiremock::matchers::header(
            "authorization",
            "Infuser test-odcloud-key",
        ))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"currentCount": 2, "data": [{"HOUSE_NM": "A-1"}, {"HOUSE_NM": "A-2"}],
                "matchCount": 2, "page": 1, "perPage": 100, "totalCount": 2}"#,
        ))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let page = tools.subscription_info(1, 100).await.unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 100);
}

#[tokio::test]
async fn subscription_info_falls_back_to_service_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscription-info"))
        .and(query_param("serviceKey", "test-service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"currentCount": 0, "data": [], "matchCount": 0,
                "page": 1, "perPage": 100, "totalCount": 0}"#,
        ))
        .mount(&server)
        .await;

    let config = Config {
        data_go_kr: None,
        onbid: None,
        odcloud_api: None,
        odcloud_service: Some("test-service-key".to_string()),
    };
    let tools = tools_for(&server, config);
    let page = tools.subscription_info(1, 100).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn subscription_results_reqst_area() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applyhome-stat/getAPTReqstAreaStat"))
        .and(query_param("cond[STAT_DE::EQ]", "202501"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"currentCount": 1,
                "data": [{"STAT_DE": "202501", "SUBSCRPT_AREA_CODE": "01", "AGE_30": 10}],
                "matchCount": 1, "page": 1, "perPage": 10, "totalCount": 1}"#,
        ))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let report = tools
        .subscription_results(StatKind::ReqstArea, Some("202501"), Some("01"), None, 1, 10)
        .await
        .unwrap();
    assert_eq!(report.stat_kind, "reqst_area");
    assert_eq!(report.page.total_count, 1);
    assert_eq!(report.page.items[0]["STAT_DE"], "202501");
}

#[tokio::test]
async fn auction_bid_results_parses_wrapped_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onbid/bid-result-list"))
        .and(query_param("serviceKey", "test-onbid-key"))
        .and(query_param("resultType", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response": {"header": {"resultCode": "00"},
                "body": {"items": {"item": [{"CLTR_NM": "Lot 1"}, {"CLTR_NM": "Lot 2"}]},
                         "totalCount": 2, "pageNo": 1, "numOfRows": 20}}}"#,
        ))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let page = tools
        .auction_bid_results(&AuctionFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page_no, 1);
    assert_eq!(page.num_of_rows, 20);
}

#[tokio::test]
async fn auction_error_code_carries_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onbid/bid-result-list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response": {"header": {"resultCode": "22", "resultMsg": "LIMITED NUMBER OF SERVICE REQUESTS EXCEEDS"}, "body": {}}}"#,
        ))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let err = tools
        .auction_bid_results(&AuctionFilter::default(), 1, 20)
        .await
        .unwrap_err();
    assert_eq!(err.error, ErrorKind::ApiError);
    assert_eq!(err.code.as_deref(), Some("22"));
    assert!(err.message.contains("LIMITED NUMBER"));
}

#[tokio::test]
async fn auction_detail_requires_identifiers() {
    let server = MockServer::start().await;
    let tools = tools_for(&server, test_config());

    let err = tools
        .auction_bid_result_detail("", "1", 1, 20)
        .await
        .unwrap_err();
    assert_eq!(err.error, ErrorKind::InvalidInput);
    assert!(err.message.contains("cltr_mng_no"));
}

#[tokio::test]
async fn auction_listings_pass_raw_items_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onbid/thing-info"))
        .and(query_param("SIDO", "서울특별시"))
        .respond_with(ResponseTemplate::new(200).set_body_string(THING_INFO_XML))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let filter = ListingFilter {
        sido: Some("서울특별시".to_string()),
        ..ListingFilter::default()
    };
    let report = tools.auction_listings(&filter, 1, 20).await.unwrap();
    assert_eq!(report.total_count, 1);
    assert_eq!(
        report.items[0].get("CLTR_NM").map(String::as_str),
        Some("Auction Lot")
    );
}

#[tokio::test]
async fn code_info_requires_parent_scope_argument() {
    let server = MockServer::start().await;
    let tools = tools_for(&server, test_config());

    let err = tools
        .code_info(CodeLookup::MiddleCategory, None, 1, 100)
        .await
        .unwrap_err();
    assert_eq!(err.error, ErrorKind::InvalidInput);
    assert!(err.message.contains("CTGR_ID"));
}

#[tokio::test]
async fn code_info_fetches_category_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onbid/code-info/getOnbidMiddleCodeInfo"))
        .and(query_param("CTGR_ID", "10000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <header>
    <resultCode>00</resultCode>
    <resultMsg>NORMAL SERVICE</resultMsg>
  </header>
  <body>
    <items>
      <item>
        <CTGR_ID>10100</CTGR_ID>
        <CTGR_NM>Land</CTGR_NM>
        <CTGR_HIRK_ID>10000</CTGR_HIRK_ID>
      </item>
    </items>
    <TotalCount>1</TotalCount>
  </body>
</response>"#,
        ))
        .mount(&server)
        .await;

    let tools = tools_for(&server, test_config());
    let report = tools
        .code_info(CodeLookup::MiddleCategory, Some("10000"), 1, 100)
        .await
        .unwrap();
    assert_eq!(report.items.len(), 1);
    assert_eq!(
        report.items[0].get("CTGR_ID").map(String::as_str),
        Some("10100")
    );
}
