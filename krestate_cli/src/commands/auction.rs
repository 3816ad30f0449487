//! The `auction` subcommand: Onbid bid results, listings, and code lookups.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use krestate_lib::tools::{AuctionFilter, CodeLookup, ListingFilter};
use krestate_lib::OpenDataTools;

use crate::output;

#[derive(Args)]
pub struct AuctionArgs {
    #[command(subcommand)]
    pub command: AuctionCommand,
}

#[derive(Subcommand)]
pub enum AuctionCommand {
    /// Bid-result list from the next-gen Onbid service
    Results {
        /// Item type code, e.g. "0001" for real estate
        #[arg(long)]
        cltr_type_cd: Option<String>,
        /// Disposal method code: "0001" sale, "0002" lease
        #[arg(long)]
        dsps_mthod_cd: Option<String>,
        /// Location: si/do name
        #[arg(long)]
        sido: Option<String>,
        /// Location: si/gun/gu name
        #[arg(long)]
        sggnm: Option<String>,
        /// Location: eup/myeon/dong name
        #[arg(long)]
        emd: Option<String>,
        /// Opening date range start (yyyyMMdd)
        #[arg(long)]
        opbd_start: Option<String>,
        /// Opening date range end (yyyyMMdd)
        #[arg(long)]
        opbd_end: Option<String>,
        /// Appraisal amount range (won)
        #[arg(long)]
        appraisal_min: Option<i64>,
        #[arg(long)]
        appraisal_max: Option<i64>,
        /// Lowest bid price range (won)
        #[arg(long)]
        min_bid_min: Option<i64>,
        #[arg(long)]
        min_bid_max: Option<i64>,
        /// Bid result status code
        #[arg(long)]
        status_cd: Option<String>,
        /// Item name keyword
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        rows: u32,
    },
    /// Bid-result detail for a single item
    Detail {
        /// Item management number (cltrMngNo)
        #[arg(long)]
        cltr_mng_no: String,
        /// Auction condition number (pbctCdtnNo)
        #[arg(long)]
        pbct_cdtn_no: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        rows: u32,
    },
    /// Unified usage listing from the thing-info service
    Listings {
        /// Disposal method code: "0001" sale, "0002" lease
        #[arg(long)]
        dpsl_mtd_cd: Option<String>,
        /// Category id (CTGR_HIRK_ID, from the codes lookup)
        #[arg(long)]
        category: Option<String>,
        /// Middle category id (CTGR_HIRK_ID_MID)
        #[arg(long)]
        category_mid: Option<String>,
        #[arg(long)]
        sido: Option<String>,
        #[arg(long)]
        sgk: Option<String>,
        #[arg(long)]
        emd: Option<String>,
        /// Appraisal price range (won)
        #[arg(long)]
        price_min: Option<i64>,
        #[arg(long)]
        price_max: Option<i64>,
        /// Lowest bid price range (won)
        #[arg(long)]
        open_price_min: Option<i64>,
        #[arg(long)]
        open_price_max: Option<i64>,
        /// Bid period start/end (YYYYMMDD)
        #[arg(long)]
        bid_from: Option<String>,
        #[arg(long)]
        bid_to: Option<String>,
        /// Item name keyword
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        rows: u32,
    },
    /// Category and address code lookups
    Codes {
        #[arg(long, value_enum)]
        kind: CodeLookupArg,
        /// Parent scope id (CTGR_ID or ADDR1/2/3 depending on kind)
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 100)]
        rows: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodeLookupArg {
    /// Top-level usage categories
    Top,
    /// Middle usage categories under a CTGR_ID
    Middle,
    /// Bottom usage categories under a CTGR_ID
    Bottom,
    /// Address depth 1 (si/do)
    Addr1,
    /// Address depth 2 (si/gun/gu)
    Addr2,
    /// Address depth 3 (eup/myeon/dong)
    Addr3,
    /// Detailed addresses under an ADDR3
    DetailAddr,
}

impl From<CodeLookupArg> for CodeLookup {
    fn from(arg: CodeLookupArg) -> Self {
        match arg {
            CodeLookupArg::Top => CodeLookup::TopCategory,
            CodeLookupArg::Middle => CodeLookup::MiddleCategory,
            CodeLookupArg::Bottom => CodeLookup::BottomCategory,
            CodeLookupArg::Addr1 => CodeLookup::Addr1,
            CodeLookupArg::Addr2 => CodeLookup::Addr2,
            CodeLookupArg::Addr3 => CodeLookup::Addr3,
            CodeLookupArg::DetailAddr => CodeLookup::DetailAddr,
        }
    }
}

pub async fn run(args: &AuctionArgs, tools: &OpenDataTools) -> Result<()> {
    match &args.command {
        AuctionCommand::Results {
            cltr_type_cd,
            dsps_mthod_cd,
            sido,
            sggnm,
            emd,
            opbd_start,
            opbd_end,
            appraisal_min,
            appraisal_max,
            min_bid_min,
            min_bid_max,
            status_cd,
            name,
            page,
            rows,
        } => {
            let filter = AuctionFilter {
                cltr_type_cd: cltr_type_cd.clone(),
                dsps_mthod_cd: dsps_mthod_cd.clone(),
                lctn_sdnm: sido.clone(),
                lctn_sggnm: sggnm.clone(),
                lctn_emd_nm: emd.clone(),
                opbd_dt_start: opbd_start.clone(),
                opbd_dt_end: opbd_end.clone(),
                apsl_evl_amt_start: *appraisal_min,
                apsl_evl_amt_end: *appraisal_max,
                lowst_bid_prc_start: *min_bid_min,
                lowst_bid_prc_end: *min_bid_max,
                pbct_stat_cd: status_cd.clone(),
                onbid_cltr_nm: name.clone(),
                ..AuctionFilter::default()
            };
            let result = tools
                .auction_bid_results(&filter, *page, *rows)
                .await
                .map_err(output::tool_error)?;
            output::print_json(&result)
        }
        AuctionCommand::Detail {
            cltr_mng_no,
            pbct_cdtn_no,
            page,
            rows,
        } => {
            let result = tools
                .auction_bid_result_detail(cltr_mng_no, pbct_cdtn_no, *page, *rows)
                .await
                .map_err(output::tool_error)?;
            output::print_json(&result)
        }
        AuctionCommand::Listings {
            dpsl_mtd_cd,
            category,
            category_mid,
            sido,
            sgk,
            emd,
            price_min,
            price_max,
            open_price_min,
            open_price_max,
            bid_from,
            bid_to,
            name,
            page,
            rows,
        } => {
            let filter = ListingFilter {
                dpsl_mtd_cd: dpsl_mtd_cd.clone(),
                ctgr_hirk_id: category.clone(),
                ctgr_hirk_id_mid: category_mid.clone(),
                sido: sido.clone(),
                sgk: sgk.clone(),
                emd: emd.clone(),
                goods_price_from: *price_min,
                goods_price_to: *price_max,
                open_price_from: *open_price_min,
                open_price_to: *open_price_max,
                pbct_begn_dtm: bid_from.clone(),
                pbct_cls_dtm: bid_to.clone(),
                cltr_nm: name.clone(),
            };
            let result = tools
                .auction_listings(&filter, *page, *rows)
                .await
                .map_err(output::tool_error)?;
            output::print_json(&result)
        }
        AuctionCommand::Codes {
            kind,
            parent,
            page,
            rows,
        } => {
            let result = tools
                .code_info((*kind).into(), parent.as_deref(), *page, *rows)
                .await
                .map_err(output::tool_error)?;
            output::print_json(&result)
        }
    }
}
