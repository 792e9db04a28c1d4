//! Group commands.

use clap::Subcommand;
use console::style;

use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum GroupsAction {
    /// List your groups.
    List,
    /// Create a group.
    Create {
        /// Group name.
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Join a group by invite code.
    Join {
        /// Invite code.
        invite_code: String,
    },
    /// Leave a group.
    Leave {
        /// Group id.
        id: String,
    },
}

pub async fn run(ctx: &Context, action: GroupsAction, format: OutputFormat) -> CsResult<()> {
    match action {
        GroupsAction::List => {
            let groups = ctx.api.groups().await?;
            match format {
                OutputFormat::Json => super::print_json(&groups),
                OutputFormat::Text => {
                    if groups.is_empty() {
                        println!("You are not in any groups.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["Id", "Name", "Members", "Invite"]);
                    for g in &groups {
                        table.add_row(vec![
                            super::or_dash(g.id.as_deref()),
                            super::truncate(g.name.as_deref().unwrap_or("-"), 30),
                            g.member_count.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
                            super::or_dash(g.invite_code.as_deref()),
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
        GroupsAction::Create { name, description } => {
            let group = ctx.api.create_group(&name, description.as_deref()).await?;
            match format {
                OutputFormat::Json => super::print_json(&group),
                OutputFormat::Text => {
                    println!("{} Created group {name}", style("OK").green().bold());
                    if let Some(code) = &group.invite_code {
                        println!("  Invite code: {}", style(code).cyan());
                    }
                }
            }
        }
        GroupsAction::Join { invite_code } => {
            let group = ctx.api.join_group(&invite_code).await?;
            match format {
                OutputFormat::Json => super::print_json(&group),
                OutputFormat::Text => println!(
                    "{} Joined {}",
                    style("OK").green().bold(),
                    group.name.as_deref().unwrap_or("group")
                ),
            }
        }
        GroupsAction::Leave { id } => {
            ctx.api.leave_group(&id).await?;
            println!("{} Left group {id}", style("OK").green().bold());
        }
    }
    Ok(())
}
