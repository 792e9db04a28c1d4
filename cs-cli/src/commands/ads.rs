//! Ad commands.

use std::path::PathBuf;

use clap::Subcommand;
use console::style;

use cs_api::endpoints::ads::{AdRotation, AdSubmission};
use cs_api::FilePart;
use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum AdsAction {
    /// List running ads and advance the carousel position.
    Active,
    /// Submit an ad for review.
    Submit {
        /// Ad title.
        title: String,
        /// Creative image.
        #[arg(long)]
        image: PathBuf,
        /// Landing page.
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

pub async fn run(ctx: &Context, action: AdsAction, format: OutputFormat) -> CsResult<()> {
    match action {
        AdsAction::Active => {
            let ads = ctx.api.active_ads().await?;
            let rotation = AdRotation::new(ctx.store.as_ref());
            let current = rotation.resume_index(ads.len())?;
            rotation.advance(ads.len())?;

            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "ads": ads,
                    "current_index": current,
                })),
                OutputFormat::Text => {
                    if ads.is_empty() {
                        println!("No active ads.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["", "Id", "Title", "Link"]);
                    for (i, ad) in ads.iter().enumerate() {
                        let marker = if i == current { ">" } else { "" };
                        table.add_row(vec![
                            marker.to_string(),
                            super::or_dash(ad.id.as_deref()),
                            super::truncate(ad.title.as_deref().unwrap_or("-"), 30),
                            super::or_dash(ad.link.as_deref()),
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
        AdsAction::Submit {
            title,
            image,
            link,
            description,
        } => {
            let file = FilePart::from_path(&image).await?;
            let ad = ctx
                .api
                .submit_ad(
                    &AdSubmission {
                        title,
                        link,
                        description,
                    },
                    file,
                )
                .await?;
            match format {
                OutputFormat::Json => super::print_json(&ad),
                OutputFormat::Text => println!(
                    "{} Submitted ad {} ({})",
                    style("OK").green().bold(),
                    super::or_dash(ad.id.as_deref()),
                    ad.status.as_deref().unwrap_or("pending review")
                ),
            }
        }
    }
    Ok(())
}
