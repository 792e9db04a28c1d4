//! Direct message commands.

use clap::Subcommand;
use console::style;

use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum MessagesAction {
    /// List conversations.
    List,
    /// Show messages exchanged with a user.
    Show {
        /// The other user's id.
        user_id: String,
    },
    /// Send a message.
    Send {
        /// Recipient user id.
        user_id: String,
        /// Message text.
        text: String,
    },
}

pub async fn run(ctx: &Context, action: MessagesAction, format: OutputFormat) -> CsResult<()> {
    match action {
        MessagesAction::List => {
            let conversations = ctx.api.conversations().await?;
            match format {
                OutputFormat::Json => super::print_json(&conversations),
                OutputFormat::Text => {
                    if conversations.is_empty() {
                        println!("No conversations.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["User", "Name", "Last Message", "Unread"]);
                    for c in &conversations {
                        table.add_row(vec![
                            super::or_dash(c.participant_id.as_deref()),
                            super::or_dash(c.participant_name.as_deref()),
                            super::truncate(c.last_message.as_deref().unwrap_or("-"), 40),
                            match c.unread_count {
                                Some(n) if n > 0 => n.to_string(),
                                _ => "-".to_string(),
                            },
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
        MessagesAction::Show { user_id } => {
            let messages = ctx.api.conversation_messages(&user_id).await?;
            match format {
                OutputFormat::Json => super::print_json(&messages),
                OutputFormat::Text => {
                    if messages.is_empty() {
                        println!("No messages with {user_id}.");
                    }
                    for m in &messages {
                        let when = m
                            .created_at
                            .as_deref()
                            .map(super::format_timestamp)
                            .unwrap_or_default();
                        let from = if m.sender.as_deref() == Some(user_id.as_str()) {
                            style(user_id.as_str()).cyan()
                        } else {
                            style("me").green()
                        };
                        println!(
                            "{} {from}: {}",
                            style(when).dim(),
                            m.text.as_deref().unwrap_or("")
                        );
                    }
                }
            }
        }
        MessagesAction::Send { user_id, text } => {
            let sent = ctx.api.send_message(&user_id, &text).await?;
            match format {
                OutputFormat::Json => super::print_json(&sent),
                OutputFormat::Text => println!("{} Sent.", style("OK").green().bold()),
            }
        }
    }
    Ok(())
}
