//! Voucher commands.

use clap::Subcommand;
use console::style;

use cs_api::endpoints::vouchers::VoucherOutcome;
use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum VouchersAction {
    /// List vouchers on offer and the ones you own.
    List,
    /// Buy a voucher with credits.
    Purchase {
        /// Voucher id.
        id: String,
    },
    /// Redeem a voucher code.
    Redeem {
        /// Voucher code.
        code: String,
    },
}

pub async fn run(ctx: &Context, action: VouchersAction, format: OutputFormat) -> CsResult<()> {
    match action {
        VouchersAction::List => {
            let vouchers = ctx.api.vouchers().await?;
            match format {
                OutputFormat::Json => super::print_json(&vouchers),
                OutputFormat::Text => {
                    if vouchers.is_empty() {
                        println!("No vouchers available.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["Id", "Title", "Price", "Status", "Expires"]);
                    for v in &vouchers {
                        table.add_row(vec![
                            super::or_dash(v.id.as_deref()),
                            super::truncate(v.title.as_deref().unwrap_or("-"), 30),
                            v.price.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                            super::or_dash(v.status.as_deref()),
                            v.expires_at
                                .as_deref()
                                .map(super::format_timestamp)
                                .unwrap_or_else(|| "-".into()),
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
        VouchersAction::Purchase { id } => {
            let outcome = ctx.api.purchase_voucher(&id).await?;
            print_outcome(&outcome, format, "Voucher purchased");
        }
        VouchersAction::Redeem { code } => {
            let outcome = ctx.api.redeem_voucher(&code).await?;
            print_outcome(&outcome, format, "Voucher redeemed");
        }
    }
    Ok(())
}

fn print_outcome(outcome: &VoucherOutcome, format: OutputFormat, default_message: &str) {
    match format {
        OutputFormat::Json => super::print_json(outcome),
        OutputFormat::Text => {
            let message = outcome.message.as_deref().unwrap_or(default_message);
            if outcome.success == Some(false) {
                println!("{} {message}", style("FAIL").red().bold());
            } else {
                println!("{} {message}", style("OK").green().bold());
            }
            if let Some(code) = outcome.voucher.as_ref().and_then(|v| v.code.as_deref()) {
                println!("  Code:      {}", style(code).cyan());
            }
            if let Some(credits) = outcome.remaining_credits {
                println!("  Credits:   {credits}");
            }
        }
    }
}
