//! Credit commands.

use clap::Subcommand;
use console::style;

use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum CreditsAction {
    /// Show your balance.
    Balance,
    /// Send credits to another user.
    Transfer {
        /// Recipient phone number.
        phone: String,
        /// Whole credits to send.
        amount: i64,
        /// Optional note for the recipient.
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Ledger history.
    History {
        /// Number of entries to show.
        #[arg(short = 'n', long, default_value = "25")]
        limit: usize,
    },
}

pub async fn run(ctx: &Context, action: CreditsAction, format: OutputFormat) -> CsResult<()> {
    match action {
        CreditsAction::Balance => {
            let balance = ctx.api.credit_balance().await?;
            match format {
                OutputFormat::Json => super::print_json(&balance),
                OutputFormat::Text => {
                    match balance.credits {
                        Some(credits) => println!("Balance: {} credits", style(credits).bold()),
                        None => println!("Balance unavailable."),
                    }
                }
            }
        }
        CreditsAction::Transfer { phone, amount, note } => {
            let receipt = ctx
                .api
                .transfer_credits(&phone, amount, note.as_deref())
                .await?;
            match format {
                OutputFormat::Json => super::print_json(&receipt),
                OutputFormat::Text => {
                    println!(
                        "{} Sent {amount} credits to {phone}",
                        style("OK").green().bold()
                    );
                    if let Some(balance) = receipt.new_balance {
                        println!("  New balance: {balance}");
                    }
                }
            }
        }
        CreditsAction::History { limit } => {
            let mut history = ctx.api.credit_history().await?;
            history.truncate(limit);
            match format {
                OutputFormat::Json => super::print_json(&history),
                OutputFormat::Text => {
                    if history.is_empty() {
                        println!("No transactions.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["Date", "Type", "Amount", "Description"]);
                    for tx in &history {
                        let amount = match tx.amount {
                            Some(a) if a >= 0.0 => style(format!("+{a}")).green().to_string(),
                            Some(a) => style(a.to_string()).red().to_string(),
                            None => "-".to_string(),
                        };
                        table.add_row(vec![
                            tx.created_at
                                .as_deref()
                                .map(super::format_timestamp)
                                .unwrap_or_else(|| "-".into()),
                            super::or_dash(tx.kind.as_deref()),
                            amount,
                            super::truncate(tx.description.as_deref().unwrap_or("-"), 40),
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
    }
    Ok(())
}
