//! Session commands: login, logout, whoami and profile.

use console::style;
use dialoguer::{Input, Password};
use serde_json::json;

use cs_core::constants::keys;
use cs_core::error::CsResult;
use cs_store::{KeyValueStore, KeyValueStoreExt};

use super::{prompt_err, Context};
use crate::OutputFormat;

pub async fn login(
    ctx: &Context,
    identifier: Option<String>,
    password: Option<String>,
    format: OutputFormat,
) -> CsResult<()> {
    // Arg > interactive prompt
    let identifier = match identifier {
        Some(id) => id,
        None => Input::<String>::new()
            .with_prompt("Phone or email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(prompt_err)?,
    };

    let auth = ctx.api.login(identifier.trim(), &password).await?;

    match format {
        OutputFormat::Json => super::print_json(&json!({ "logged_in": true, "user": auth.user })),
        OutputFormat::Text => println!(
            "{} Logged in as {}",
            style("OK").green().bold(),
            auth.user.name.as_deref().unwrap_or(identifier.trim())
        ),
    }
    Ok(())
}

pub fn logout(ctx: &Context) -> CsResult<()> {
    ctx.api.logout()?;
    println!("{} Logged out.", style("OK").green().bold());
    Ok(())
}

/// Cached identity plus locally tracked progress; never touches the network.
pub fn whoami(ctx: &Context, format: OutputFormat) -> CsResult<()> {
    let user = ctx.api.current_user()?;
    let progress: Option<serde_json::Value> = ctx.store.get_json(keys::CREDITS_PROGRESS)?;
    let synced_at = ctx.store.get(keys::CONTACTS_SYNCED_AT)?;

    match format {
        OutputFormat::Json => super::print_json(&json!({
            "user": user,
            "credits_progress": progress,
            "contacts_synced_at": synced_at,
        })),
        OutputFormat::Text => match user {
            None => println!("Not logged in."),
            Some(u) => {
                println!("  Id:        {}", super::or_dash(u.id.as_deref()));
                println!("  Name:      {}", super::or_dash(u.name.as_deref()));
                println!("  Phone:     {}", super::or_dash(u.phone.as_deref()));
                if let Some(p) = progress {
                    println!("  Progress:  {p}");
                }
                if let Some(ts) = synced_at {
                    println!("  Contacts:  synced {}", super::format_timestamp(&ts));
                }
            }
        },
    }
    Ok(())
}

pub async fn profile(ctx: &Context, format: OutputFormat) -> CsResult<()> {
    let profile = ctx.api.profile().await?;

    match format {
        OutputFormat::Json => super::print_json(&profile),
        OutputFormat::Text => {
            println!("{}", style("Profile").bold().underlined());
            println!("  Name:      {}", super::or_dash(profile.name.as_deref()));
            println!("  Phone:     {}", super::or_dash(profile.phone.as_deref()));
            println!("  Email:     {}", super::or_dash(profile.email.as_deref()));
            if let Some(credits) = profile.credits {
                println!("  Credits:   {credits}");
            }
            if let Some(code) = &profile.referral_code {
                println!("  Referral:  {}", style(code).cyan());
            }
        }
    }
    Ok(())
}
