//! Push notification commands.

use clap::Subcommand;
use console::style;

use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Register a push token for this device.
    Register {
        /// Push token issued by the notification service.
        token: String,
    },
    /// Show the notification inbox.
    List,
    /// Mark a notification as read.
    Read {
        /// Notification id.
        id: String,
    },
}

pub async fn run(ctx: &Context, action: NotifyAction, format: OutputFormat) -> CsResult<()> {
    match action {
        NotifyAction::Register { token } => {
            let project_id = ctx.config.notifications.project_id.as_deref();
            let sent = ctx.api.register_push_token(&token, project_id).await?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "registered": sent })),
                OutputFormat::Text if sent => {
                    println!("{} Push token registered.", style("OK").green().bold())
                }
                OutputFormat::Text => println!("Push token already registered."),
            }
        }
        NotifyAction::List => {
            let notifications = ctx.api.notifications().await?;
            match format {
                OutputFormat::Json => super::print_json(&notifications),
                OutputFormat::Text => {
                    if notifications.is_empty() {
                        println!("No notifications.");
                    }
                    for n in &notifications {
                        let title = n.title.as_deref().unwrap_or("Notification");
                        let title = if n.is_read() {
                            style(title).dim()
                        } else {
                            style(title).bold()
                        };
                        println!("{title}");
                        if let Some(body) = &n.body {
                            println!("  {body}");
                        }
                    }
                }
            }
        }
        NotifyAction::Read { id } => {
            ctx.api.mark_notification_read(&id).await?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "read": id })),
                OutputFormat::Text => println!("{} Marked {id} as read.", style("OK").green().bold()),
            }
        }
    }
    Ok(())
}
