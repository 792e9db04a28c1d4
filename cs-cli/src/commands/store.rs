//! Device store commands.

use clap::Subcommand;
use console::style;
use dialoguer::Confirm;

use cs_core::error::CsResult;
use cs_store::KeyValueStore;

use super::{prompt_err, Context};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum StoreAction {
    /// Print one value.
    Get {
        key: String,
    },
    /// Write one value.
    Set {
        key: String,
        value: String,
    },
    /// Remove one key.
    Remove {
        key: String,
    },
    /// List every key with its last write time.
    List {
        /// Show full values instead of truncating them.
        #[arg(long)]
        full: bool,
    },
    /// Remove every key, including the session.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn run(ctx: &Context, action: StoreAction, format: OutputFormat) -> CsResult<()> {
    let store = ctx.store.as_ref();

    match action {
        StoreAction::Get { key } => {
            let value = store.get(&key)?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "key": key, "value": value })),
                OutputFormat::Text => match value {
                    Some(v) => println!("{v}"),
                    None => println!("{}", style("(not set)").dim()),
                },
            }
        }
        StoreAction::Set { key, value } => {
            store.set(&key, &value)?;
            println!("{} {key} updated", style("OK").green().bold());
        }
        StoreAction::Remove { key } => {
            store.remove(&key)?;
            println!("{} {key} removed", style("OK").green().bold());
        }
        StoreAction::List { full } => {
            let entries = store.entries()?;
            match format {
                OutputFormat::Json => super::print_json(&entries),
                OutputFormat::Text => {
                    if entries.is_empty() {
                        println!("Store is empty.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["Key", "Value", "Updated"]);
                    for e in &entries {
                        let value = if full {
                            e.value.clone()
                        } else {
                            super::truncate(&e.value, 48)
                        };
                        table.add_row(vec![
                            e.key.clone(),
                            value,
                            super::format_timestamp(&e.updated_at),
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
        StoreAction::Clear { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Remove every stored key, including your session?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;
            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }
            store.clear()?;
            println!("{} Store cleared.", style("OK").green().bold());
        }
    }
    Ok(())
}
