//! The `subscription` subcommand: odcloud notices and statistics.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use krestate_lib::tools::StatKind;
use krestate_lib::OpenDataTools;

use crate::output;

#[derive(Args)]
pub struct SubscriptionArgs {
    #[command(subcommand)]
    pub command: SubscriptionCommand,
}

#[derive(Subcommand)]
pub enum SubscriptionCommand {
    /// Apartment subscription notices
    Info {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 100)]
        per_page: u32,
    },
    /// Applyhome subscription statistics
    Results {
        /// Statistics dataset
        #[arg(long, value_enum)]
        kind: StatKindArg,
        /// Filter by statistics month (YYYYMM)
        #[arg(long)]
        month: Option<String>,
        /// Filter by subscription area code (reqst-area only)
        #[arg(long)]
        area_code: Option<String>,
        /// Filter by residence class code (aps-przwner only)
        #[arg(long)]
        reside_secd: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatKindArg {
    /// Subscription requests by area
    ReqstArea,
    /// Winner score statistics
    ApsPrzwner,
}

impl From<StatKindArg> for StatKind {
    fn from(arg: StatKindArg) -> Self {
        match arg {
            StatKindArg::ReqstArea => StatKind::ReqstArea,
            StatKindArg::ApsPrzwner => StatKind::ApsPrzwner,
        }
    }
}

pub async fn run(args: &SubscriptionArgs, tools: &OpenDataTools) -> Result<()> {
    match &args.command {
        SubscriptionCommand::Info { page, per_page } => {
            let result = tools
                .subscription_info(*page, *per_page)
                .await
                .map_err(output::tool_error)?;
            output::print_json(&result)
        }
        SubscriptionCommand::Results {
            kind,
            month,
            area_code,
            reside_secd,
            page,
            per_page,
        } => {
            let result = tools
                .subscription_results(
                    (*kind).into(),
                    month.as_deref(),
                    area_code.as_deref(),
                    reside_secd.as_deref(),
                    *page,
                    *per_page,
                )
                .await
                .map_err(output::tool_error)?;
            output::print_json(&result)
        }
    }
}
