//! Tool-level operations over the open-data endpoint families.
//!
//! Each operation validates its inputs, resolves the required credential,
//! fetches through the cached resilient client, normalizes the payload,
//! and reduces record sets to summary statistics. Every failure comes back
//! as a [`ToolError`] payload value.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use krestate_api::endpoints;

use crate::client::CachedClient;
use crate::config::{Config, OdcloudAuth};
use crate::error::ToolError;
use crate::parsers::onbid;
use crate::parsers::rent::{self, AptRent, OffiRent, SingleHouseRent, VillaRent};
use crate::parsers::subscription::{parse_subscription_page, SubscriptionPage};
use crate::parsers::trade::{
    self, AptTrade, CommercialTrade, OffiTrade, SingleHouseTrade, VillaTrade,
};
use crate::parsers::{ParseError, Parsed};
use crate::summary::{
    build_rent_summary, build_trade_summary, RentPriced, RentSummary, SalePriced, TradeSummary,
};
use crate::validation;

/// Sale records plus summary statistics for one (region, month).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeReport<T> {
    pub total_count: i64,
    pub items: Vec<T>,
    pub summary: TradeSummary,
}

/// Lease records plus summary statistics for one (region, month).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentReport<T> {
    pub total_count: i64,
    pub items: Vec<T>,
    pub summary: RentSummary,
}

/// One page of Onbid JSON records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionPage {
    pub total_count: i64,
    pub items: Vec<Value>,
    pub page_no: u32,
    pub num_of_rows: u32,
}

/// One page of Onbid XML records, passed through as raw tag → text maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnbidXmlReport {
    pub total_count: i64,
    pub items: Vec<BTreeMap<String, String>>,
    pub page_no: u32,
    pub num_of_rows: u32,
}

/// Applyhome statistics page tagged with the dataset kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionStatsReport {
    pub stat_kind: &'static str,
    #[serde(flatten)]
    pub page: SubscriptionPage,
}

/// Applyhome statistics datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Subscription requests by area.
    ReqstArea,
    /// Winner score statistics.
    ApsPrzwner,
}

impl StatKind {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "reqst_area" => Some(Self::ReqstArea),
            "aps_przwner" => Some(Self::ApsPrzwner),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReqstArea => "reqst_area",
            Self::ApsPrzwner => "aps_przwner",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::ReqstArea => "/getAPTReqstAreaStat",
            Self::ApsPrzwner => "/getAPTApsPrzwnerStat",
        }
    }
}

/// Filters for the Onbid bid-result list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuctionFilter {
    pub cltr_type_cd: Option<String>,
    pub prpt_div_cd: Option<String>,
    pub dsps_mthod_cd: Option<String>,
    pub bid_div_cd: Option<String>,
    pub lctn_sdnm: Option<String>,
    pub lctn_sggnm: Option<String>,
    pub lctn_emd_nm: Option<String>,
    pub opbd_dt_start: Option<String>,
    pub opbd_dt_end: Option<String>,
    pub apsl_evl_amt_start: Option<i64>,
    pub apsl_evl_amt_end: Option<i64>,
    pub lowst_bid_prc_start: Option<i64>,
    pub lowst_bid_prc_end: Option<i64>,
    pub pbct_stat_cd: Option<String>,
    pub onbid_cltr_nm: Option<String>,
}

impl AuctionFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>) {
        push_opt(params, "cltrTypeCd", &self.cltr_type_cd);
        push_opt(params, "prptDivCd", &self.prpt_div_cd);
        push_opt(params, "dspsMthodCd", &self.dsps_mthod_cd);
        push_opt(params, "bidDivCd", &self.bid_div_cd);
        push_opt(params, "lctnSdnm", &self.lctn_sdnm);
        push_opt(params, "lctnSggnm", &self.lctn_sggnm);
        push_opt(params, "lctnEmdNm", &self.lctn_emd_nm);
        push_opt(params, "opbdDtStart", &self.opbd_dt_start);
        push_opt(params, "opbdDtEnd", &self.opbd_dt_end);
        push_opt_num(params, "apslEvlAmtStart", self.apsl_evl_amt_start);
        push_opt_num(params, "apslEvlAmtEnd", self.apsl_evl_amt_end);
        push_opt_num(params, "lowstBidPrcStart", self.lowst_bid_prc_start);
        push_opt_num(params, "lowstBidPrcEnd", self.lowst_bid_prc_end);
        push_opt(params, "pbctStatCd", &self.pbct_stat_cd);
        push_opt(params, "onbidCltrNm", &self.onbid_cltr_nm);
    }
}

/// Filters for the Onbid thing-info (물건정보) list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub dpsl_mtd_cd: Option<String>,
    pub ctgr_hirk_id: Option<String>,
    pub ctgr_hirk_id_mid: Option<String>,
    pub sido: Option<String>,
    pub sgk: Option<String>,
    pub emd: Option<String>,
    pub goods_price_from: Option<i64>,
    pub goods_price_to: Option<i64>,
    pub open_price_from: Option<i64>,
    pub open_price_to: Option<i64>,
    pub pbct_begn_dtm: Option<String>,
    pub pbct_cls_dtm: Option<String>,
    pub cltr_nm: Option<String>,
}

impl ListingFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>) {
        push_opt(params, "DPSL_MTD_CD", &self.dpsl_mtd_cd);
        push_opt(params, "CTGR_HIRK_ID", &self.ctgr_hirk_id);
        push_opt(params, "CTGR_HIRK_ID_MID", &self.ctgr_hirk_id_mid);
        push_opt(params, "SIDO", &self.sido);
        push_opt(params, "SGK", &self.sgk);
        push_opt(params, "EMD", &self.emd);
        push_opt_num(params, "GOODS_PRICE_FROM", self.goods_price_from);
        push_opt_num(params, "GOODS_PRICE_TO", self.goods_price_to);
        push_opt_num(params, "OPEN_PRICE_FROM", self.open_price_from);
        push_opt_num(params, "OPEN_PRICE_TO", self.open_price_to);
        push_opt(params, "PBCT_BEGN_DTM", &self.pbct_begn_dtm);
        push_opt(params, "PBCT_CLS_DTM", &self.pbct_cls_dtm);
        push_opt(params, "CLTR_NM", &self.cltr_nm);
    }
}

/// Onbid code/address lookup services, collapsed into one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLookup {
    TopCategory,
    MiddleCategory,
    BottomCategory,
    Addr1,
    Addr2,
    Addr3,
    DetailAddr,
}

impl CodeLookup {
    fn path(self) -> &'static str {
        match self {
            Self::TopCategory => "/getOnbidTopCodeInfo",
            Self::MiddleCategory => "/getOnbidMiddleCodeInfo",
            Self::BottomCategory => "/getOnbidBottomCodeInfo",
            Self::Addr1 => "/getOnbidAddr1Info",
            Self::Addr2 => "/getOnbidAddr2Info",
            Self::Addr3 => "/getOnbidAddr3Info",
            Self::DetailAddr => "/getOnbidDtlAddrInfo",
        }
    }

    /// The required parent-scope parameter, when the service takes one.
    fn arg_name(self) -> Option<&'static str> {
        match self {
            Self::TopCategory | Self::Addr1 => None,
            Self::MiddleCategory | Self::BottomCategory => Some("CTGR_ID"),
            Self::Addr2 => Some("ADDR1"),
            Self::Addr3 => Some("ADDR2"),
            Self::DetailAddr => Some("ADDR3"),
        }
    }
}

/// Base URLs for every upstream service. Defaults to the production
/// endpoints; tests point the whole set at a mock server.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub apt_trade: String,
    pub apt_rent: String,
    pub offi_trade: String,
    pub offi_rent: String,
    pub villa_trade: String,
    pub villa_rent: String,
    pub single_trade: String,
    pub single_rent: String,
    pub commercial_trade: String,
    pub subscription_info: String,
    pub applyhome_stat_base: String,
    pub onbid_bid_result_list: String,
    pub onbid_bid_result_detail: String,
    pub onbid_thing_info_list: String,
    pub onbid_code_info_base: String,
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            apt_trade: endpoints::APT_TRADE_URL.to_string(),
            apt_rent: endpoints::APT_RENT_URL.to_string(),
            offi_trade: endpoints::OFFI_TRADE_URL.to_string(),
            offi_rent: endpoints::OFFI_RENT_URL.to_string(),
            villa_trade: endpoints::VILLA_TRADE_URL.to_string(),
            villa_rent: endpoints::VILLA_RENT_URL.to_string(),
            single_trade: endpoints::SINGLE_TRADE_URL.to_string(),
            single_rent: endpoints::SINGLE_RENT_URL.to_string(),
            commercial_trade: endpoints::COMMERCIAL_TRADE_URL.to_string(),
            subscription_info: format!(
                "{}{}",
                endpoints::ODCLOUD_BASE_URL,
                endpoints::APT_SUBSCRIPTION_INFO_PATH
            ),
            applyhome_stat_base: endpoints::APPLYHOME_STAT_BASE_URL.to_string(),
            onbid_bid_result_list: endpoints::ONBID_BID_RESULT_LIST_URL.to_string(),
            onbid_bid_result_detail: endpoints::ONBID_BID_RESULT_DETAIL_URL.to_string(),
            onbid_thing_info_list: endpoints::ONBID_THING_INFO_LIST_URL.to_string(),
            onbid_code_info_base: endpoints::ONBID_CODE_INFO_BASE_URL.to_string(),
        }
    }
}

impl ServiceUrls {
    /// Point every service at one base URL. Used for testing with a mock
    /// server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            apt_trade: format!("{base}/apt-trade"),
            apt_rent: format!("{base}/apt-rent"),
            offi_trade: format!("{base}/offi-trade"),
            offi_rent: format!("{base}/offi-rent"),
            villa_trade: format!("{base}/villa-trade"),
            villa_rent: format!("{base}/villa-rent"),
            single_trade: format!("{base}/single-trade"),
            single_rent: format!("{base}/single-rent"),
            commercial_trade: format!("{base}/commercial-trade"),
            subscription_info: format!("{base}/subscription-info"),
            applyhome_stat_base: format!("{base}/applyhome-stat"),
            onbid_bid_result_list: format!("{base}/onbid/bid-result-list"),
            onbid_bid_result_detail: format!("{base}/onbid/bid-result-detail"),
            onbid_thing_info_list: format!("{base}/onbid/thing-info"),
            onbid_code_info_base: format!("{base}/onbid/code-info"),
        }
    }
}

/// Validated operations over every endpoint family, sharing one cached
/// resilient client and one credential set.
pub struct OpenDataTools {
    client: CachedClient,
    config: Config,
    urls: ServiceUrls,
}

impl OpenDataTools {
    pub fn new(client: CachedClient, config: Config) -> Self {
        Self::with_urls(client, config, ServiceUrls::default())
    }

    /// Create tools with custom service URLs. Used for testing.
    pub fn with_urls(client: CachedClient, config: Config, urls: ServiceUrls) -> Self {
        Self {
            client,
            config,
            urls,
        }
    }

    /// The underlying cached client (cache statistics, breaker state).
    pub fn client(&self) -> &CachedClient {
        &self.client
    }

    // ----- MOLIT sale (trade) families -------------------------------

    pub async fn apartment_trades(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<TradeReport<AptTrade>, ToolError> {
        self.trade_report(
            &self.urls.apt_trade,
            region_code,
            year_month,
            num_of_rows,
            trade::parse_apt_trades,
        )
        .await
    }

    pub async fn officetel_trades(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<TradeReport<OffiTrade>, ToolError> {
        self.trade_report(
            &self.urls.offi_trade,
            region_code,
            year_month,
            num_of_rows,
            trade::parse_officetel_trades,
        )
        .await
    }

    pub async fn villa_trades(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<TradeReport<VillaTrade>, ToolError> {
        self.trade_report(
            &self.urls.villa_trade,
            region_code,
            year_month,
            num_of_rows,
            trade::parse_villa_trades,
        )
        .await
    }

    pub async fn single_house_trades(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<TradeReport<SingleHouseTrade>, ToolError> {
        self.trade_report(
            &self.urls.single_trade,
            region_code,
            year_month,
            num_of_rows,
            trade::parse_single_house_trades,
        )
        .await
    }

    pub async fn commercial_trades(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<TradeReport<CommercialTrade>, ToolError> {
        self.trade_report(
            &self.urls.commercial_trade,
            region_code,
            year_month,
            num_of_rows,
            trade::parse_commercial_trade,
        )
        .await
    }

    // ----- MOLIT lease (rent) families --------------------------------

    pub async fn apartment_rent(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<RentReport<AptRent>, ToolError> {
        self.rent_report(
            &self.urls.apt_rent,
            region_code,
            year_month,
            num_of_rows,
            rent::parse_apt_rent,
        )
        .await
    }

    pub async fn officetel_rent(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<RentReport<OffiRent>, ToolError> {
        self.rent_report(
            &self.urls.offi_rent,
            region_code,
            year_month,
            num_of_rows,
            rent::parse_officetel_rent,
        )
        .await
    }

    pub async fn villa_rent(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<RentReport<VillaRent>, ToolError> {
        self.rent_report(
            &self.urls.villa_rent,
            region_code,
            year_month,
            num_of_rows,
            rent::parse_villa_rent,
        )
        .await
    }

    pub async fn single_house_rent(
        &self,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<RentReport<SingleHouseRent>, ToolError> {
        self.rent_report(
            &self.urls.single_rent,
            region_code,
            year_month,
            num_of_rows,
            rent::parse_single_house_rent,
        )
        .await
    }

    // ----- odcloud subscription ---------------------------------------

    /// Apartment subscription notices.
    pub async fn subscription_info(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<SubscriptionPage, ToolError> {
        validation::validate_page_no(page)?;
        validation::validate_num_of_rows(per_page)?;

        let base = self.urls.subscription_info.clone();
        let mut params = vec![
            ("page".to_string(), page.to_string()),
            ("perPage".to_string(), per_page.to_string()),
        ];
        let headers = self.odcloud_headers(&mut params)?;
        let url = build_url(&base, &params)?;

        let payload = self.client.fetch_json(&url, &headers, None).await?;
        Ok(parse_subscription_page(&payload)?)
    }

    /// Applyhome subscription statistics for one dataset kind.
    pub async fn subscription_results(
        &self,
        kind: StatKind,
        stat_year_month: Option<&str>,
        area_code: Option<&str>,
        reside_secd: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<SubscriptionStatsReport, ToolError> {
        validation::validate_page_no(page)?;
        validation::validate_num_of_rows(per_page)?;
        if let Some(ym) = stat_year_month {
            validation::validate_deal_ymd(ym)?;
        }

        let base = format!("{}{}", self.urls.applyhome_stat_base, kind.path());
        let mut params = vec![
            ("page".to_string(), page.to_string()),
            ("perPage".to_string(), per_page.to_string()),
        ];
        if let Some(ym) = stat_year_month {
            params.push(("cond[STAT_DE::EQ]".to_string(), ym.to_string()));
        }
        match kind {
            StatKind::ReqstArea => {
                if let Some(area) = area_code {
                    params.push(("cond[SUBSCRPT_AREA_CODE::EQ]".to_string(), area.to_string()));
                }
            }
            StatKind::ApsPrzwner => {
                if let Some(reside) = reside_secd {
                    params.push(("cond[RESIDE_SECD::EQ]".to_string(), reside.to_string()));
                }
            }
        }
        let headers = self.odcloud_headers(&mut params)?;
        let url = build_url(&base, &params)?;

        let payload = self.client.fetch_json(&url, &headers, None).await?;
        Ok(SubscriptionStatsReport {
            stat_kind: kind.as_str(),
            page: parse_subscription_page(&payload)?,
        })
    }

    // ----- Onbid public auction ---------------------------------------

    /// Bid-result list from the next-gen Onbid service.
    pub async fn auction_bid_results(
        &self,
        filter: &AuctionFilter,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<AuctionPage, ToolError> {
        validation::validate_page_no(page_no)?;
        validation::validate_num_of_rows(num_of_rows)?;
        let key = self.config.onbid_key()?;

        let mut params = vec![
            ("pageNo".to_string(), page_no.to_string()),
            ("numOfRows".to_string(), num_of_rows.to_string()),
            ("resultType".to_string(), "json".to_string()),
        ];
        filter.append_params(&mut params);

        let url = endpoints::build_service_url(&self.urls.onbid_bid_result_list, key, &params)?;
        self.auction_json_page(&url, page_no, num_of_rows).await
    }

    /// Bid-result detail for a single auction item.
    pub async fn auction_bid_result_detail(
        &self,
        cltr_mng_no: &str,
        pbct_cdtn_no: &str,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<AuctionPage, ToolError> {
        validation::validate_required("cltr_mng_no", cltr_mng_no)?;
        validation::validate_required("pbct_cdtn_no", pbct_cdtn_no)?;
        validation::validate_page_no(page_no)?;
        validation::validate_num_of_rows(num_of_rows)?;
        let key = self.config.onbid_key()?;

        let params = vec![
            ("pageNo".to_string(), page_no.to_string()),
            ("numOfRows".to_string(), num_of_rows.to_string()),
            ("resultType".to_string(), "json".to_string()),
            ("cltrMngNo".to_string(), cltr_mng_no.to_string()),
            ("pbctCdtnNo".to_string(), pbct_cdtn_no.to_string()),
        ];
        let url =
            endpoints::build_service_url(&self.urls.onbid_bid_result_detail, key, &params)?;
        self.auction_json_page(&url, page_no, num_of_rows).await
    }

    /// Unified usage listing from the thing-info XML service.
    pub async fn auction_listings(
        &self,
        filter: &ListingFilter,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<OnbidXmlReport, ToolError> {
        validation::validate_page_no(page_no)?;
        validation::validate_num_of_rows(num_of_rows)?;
        let key = self.config.onbid_key()?;

        let mut params = vec![
            ("pageNo".to_string(), page_no.to_string()),
            ("numOfRows".to_string(), num_of_rows.to_string()),
        ];
        filter.append_params(&mut params);

        let url =
            endpoints::build_service_url(&self.urls.onbid_thing_info_list, key, &params)?;
        let xml = self.client.fetch_text(&url, None).await?;
        let page = onbid::parse_thing_info_list(&xml)?;
        onbid_xml_report(page, page_no, num_of_rows)
    }

    /// Code/address lookup. `arg` is the parent scope identifier required
    /// by all but the top-level services.
    pub async fn code_info(
        &self,
        lookup: CodeLookup,
        arg: Option<&str>,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<OnbidXmlReport, ToolError> {
        validation::validate_page_no(page_no)?;
        validation::validate_num_of_rows(num_of_rows)?;
        let key = self.config.onbid_key()?;

        let mut params = vec![
            ("pageNo".to_string(), page_no.to_string()),
            ("numOfRows".to_string(), num_of_rows.to_string()),
        ];
        if let Some(name) = lookup.arg_name() {
            let value = arg.unwrap_or("");
            validation::validate_required(name, value)?;
            params.push((name.to_string(), value.trim().to_string()));
        }

        let base = format!("{}{}", self.urls.onbid_code_info_base, lookup.path());
        let url = endpoints::build_service_url(&base, key, &params)?;
        let xml = self.client.fetch_text(&url, None).await?;
        let page = onbid::parse_code_info(&xml)?;
        onbid_xml_report(page, page_no, num_of_rows)
    }

    // ----- shared plumbing --------------------------------------------

    async fn molit_fetch(
        &self,
        base: &str,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
    ) -> Result<String, ToolError> {
        validation::validate_region_code(region_code)?;
        validation::validate_deal_ymd(year_month)?;
        validation::validate_num_of_rows(num_of_rows)?;
        let key = self.config.molit_key()?;

        let url = endpoints::build_molit_url(base, key, region_code, year_month, num_of_rows)?;
        Ok(self.client.fetch_text(&url, None).await?)
    }

    async fn trade_report<T: SalePriced>(
        &self,
        base: &str,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
        parse: impl Fn(&str) -> Result<Parsed<T>, ParseError>,
    ) -> Result<TradeReport<T>, ToolError> {
        let xml = self
            .molit_fetch(base, region_code, year_month, num_of_rows)
            .await?;
        let parsed = parse(&xml)?;
        if let Some(code) = parsed.error_code {
            return Err(ToolError::api_error(&code));
        }
        let summary = build_trade_summary(&parsed.records);
        Ok(TradeReport {
            total_count: parsed.total_count,
            items: parsed.records,
            summary,
        })
    }

    async fn rent_report<T: RentPriced>(
        &self,
        base: &str,
        region_code: &str,
        year_month: &str,
        num_of_rows: u32,
        parse: impl Fn(&str) -> Result<Parsed<T>, ParseError>,
    ) -> Result<RentReport<T>, ToolError> {
        let xml = self
            .molit_fetch(base, region_code, year_month, num_of_rows)
            .await?;
        let parsed = parse(&xml)?;
        if let Some(code) = parsed.error_code {
            return Err(ToolError::api_error(&code));
        }
        let summary = build_rent_summary(&parsed.records);
        Ok(RentReport {
            total_count: parsed.total_count,
            items: parsed.records,
            summary,
        })
    }

    async fn auction_json_page(
        &self,
        url: &str,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<AuctionPage, ToolError> {
        let payload = self.client.fetch_json(url, &[], None).await?;
        let extracted = onbid::extract_onbid_json(&payload)?;
        if !onbid::is_success_code(&extracted.result_code) {
            let message = if extracted.result_msg.is_empty() {
                "Onbid API error".to_string()
            } else {
                extracted.result_msg.clone()
            };
            return Err(ToolError::api_error_with_message(
                &extracted.result_code,
                message,
            ));
        }
        Ok(AuctionPage {
            total_count: onbid::body_int(&extracted.body, "totalCount"),
            page_no: int_or(onbid::body_int(&extracted.body, "pageNo"), page_no),
            num_of_rows: int_or(onbid::body_int(&extracted.body, "numOfRows"), num_of_rows),
            items: extracted.items,
        })
    }

    /// Resolve odcloud auth: header mode returns the headers, query mode
    /// appends the serviceKey parameter.
    fn odcloud_headers(
        &self,
        params: &mut Vec<(String, String)>,
    ) -> Result<Vec<(String, String)>, ToolError> {
        match self.config.odcloud_auth()? {
            OdcloudAuth::Authorization(key) => Ok(vec![(
                "Authorization".to_string(),
                format!("Infuser {key}"),
            )]),
            OdcloudAuth::ServiceKey(key) => {
                params.push(("serviceKey".to_string(), key));
                Ok(Vec::new())
            }
        }
    }
}

fn onbid_xml_report(
    page: onbid::OnbidXmlPage,
    page_no: u32,
    num_of_rows: u32,
) -> Result<OnbidXmlReport, ToolError> {
    if let Some(code) = page.error_code {
        let message = page
            .error_message
            .unwrap_or_else(|| "Onbid API error".to_string());
        return Err(ToolError::api_error_with_message(&code, message));
    }
    Ok(OnbidXmlReport {
        total_count: page.total_count,
        items: page.items,
        page_no,
        num_of_rows,
    })
}

fn build_url(base: &str, params: &[(String, String)]) -> Result<String, ToolError> {
    let mut url = url::Url::parse(base)
        .map_err(|e| ToolError::internal_error(format!("invalid URL {base}: {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url.into())
}

fn push_opt(params: &mut Vec<(String, String)>, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            params.push((name.to_string(), value.clone()));
        }
    }
}

fn push_opt_num(params: &mut Vec<(String, String)>, name: &str, value: Option<i64>) {
    if let Some(value) = value {
        params.push((name.to_string(), value.to_string()));
    }
}

fn int_or(value: i64, fallback: u32) -> u32 {
    if value > 0 {
        value as u32
    } else {
        fallback
    }
}
