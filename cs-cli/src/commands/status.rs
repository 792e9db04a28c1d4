//! Status command - show the resolved backend, its health and the local session.

use console::style;
use serde_json::json;

use cs_api::session;
use cs_core::constants::keys;
use cs_core::error::CsResult;
use cs_core::platform::Platform;
use cs_store::KeyValueStore;

use super::Context;
use crate::OutputFormat;

/// Run the status command.
pub async fn run(ctx: &Context, format: OutputFormat) -> CsResult<()> {
    let health = ctx.api.health_check().await;
    let user = session::cached_user(ctx.store.as_ref())?;
    let entries = ctx.store.len()?;
    let store_path = ctx.config.effective_store_path()?;
    let synced_at = ctx.store.get(keys::CONTACTS_SYNCED_AT)?;

    match format {
        OutputFormat::Json => {
            let out = json!({
                "api_root": ctx.api.api_root(),
                "reachable": health.is_ok(),
                "latency_ms": health.as_ref().ok().map(|d| d.as_millis() as u64),
                "error": health.as_ref().err().map(|e| e.user_message()),
                "logged_in": user.is_some(),
                "user": user,
                "store": {
                    "path": store_path.display().to_string(),
                    "entries": entries,
                },
                "contacts_synced_at": synced_at,
                "platform": Platform::current().id(),
            });
            super::print_json(&out);
        }
        OutputFormat::Text => {
            println!("{}", style("Backend").bold().underlined());
            println!("  API:       {}", ctx.api.api_root());
            match &health {
                Ok(latency) => println!(
                    "  Status:    {} ({}ms)",
                    style("reachable").green(),
                    latency.as_millis()
                ),
                Err(e) => println!(
                    "  Status:    {} ({})",
                    style("unreachable").red(),
                    e.user_message()
                ),
            }

            println!();
            println!("{}", style("Session").bold().underlined());
            match &user {
                Some(u) => {
                    println!("  User:      {}", super::or_dash(u.name.as_deref()));
                    println!("  Phone:     {}", super::or_dash(u.phone.as_deref()));
                }
                None => println!("  {}", style("not logged in").yellow()),
            }

            println!();
            println!("{}", style("Device Store").bold().underlined());
            println!("  Path:      {}", store_path.display());
            println!("  Entries:   {entries}");
            if let Some(ts) = synced_at {
                println!("  Contacts:  synced {}", super::format_timestamp(&ts));
            }
        }
    }

    Ok(())
}
