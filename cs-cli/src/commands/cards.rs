//! Business card commands.

use std::path::PathBuf;

use clap::Subcommand;
use console::style;

use cs_api::endpoints::cards::{BusinessCard, NewCard};
use cs_api::FilePart;
use cs_core::error::CsResult;

use super::Context;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum CardsAction {
    /// List your cards.
    List,
    /// Show one card.
    Get {
        /// Card id.
        id: String,
    },
    /// Cards shared by your contacts.
    Feed {
        /// Page number (1-based).
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Create a card.
    Create {
        /// Name on the card.
        name: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Card image; switches the upload to multipart.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a card.
    Delete {
        /// Card id.
        id: String,
    },
    /// Share a card with a phone number or user id.
    Share {
        /// Card id.
        id: String,
        /// Recipient phone number or user id.
        recipient: String,
    },
}

pub async fn run(ctx: &Context, action: CardsAction, format: OutputFormat) -> CsResult<()> {
    match action {
        CardsAction::List => {
            let cards = ctx.api.list_cards().await?;
            print_cards(&cards, format, "No cards yet.");
        }
        CardsAction::Get { id } => {
            let card = ctx.api.card(&id).await?;
            match format {
                OutputFormat::Json => super::print_json(&card),
                OutputFormat::Text => print_card(&card),
            }
        }
        CardsAction::Feed { page } => {
            let cards = ctx.api.contacts_feed(page).await?;
            print_cards(&cards, format, "Nothing in your contacts feed.");
        }
        CardsAction::Create {
            name,
            title,
            company,
            phone,
            email,
            website,
            address,
            image,
        } => {
            let card = NewCard {
                name,
                title,
                company,
                phone,
                email,
                website,
                address,
            };
            let created = match image {
                Some(path) => {
                    let file = FilePart::from_path(&path).await?;
                    ctx.api.create_card_with_image(&card, file).await?
                }
                None => ctx.api.create_card(&card).await?,
            };
            match format {
                OutputFormat::Json => super::print_json(&created),
                OutputFormat::Text => println!(
                    "{} Created card {}",
                    style("OK").green().bold(),
                    super::or_dash(created.id.as_deref())
                ),
            }
        }
        CardsAction::Delete { id } => {
            ctx.api.delete_card(&id).await?;
            println!("{} Deleted card {id}", style("OK").green().bold());
        }
        CardsAction::Share { id, recipient } => {
            ctx.api.share_card(&id, &recipient).await?;
            println!("{} Shared card {id} with {recipient}", style("OK").green().bold());
        }
    }
    Ok(())
}

fn print_cards(cards: &[BusinessCard], format: OutputFormat, empty: &str) {
    match format {
        OutputFormat::Json => super::print_json(cards),
        OutputFormat::Text => {
            if cards.is_empty() {
                println!("{empty}");
                return;
            }
            let mut table = super::new_table(vec!["Id", "Name", "Title", "Company", "Phone"]);
            for card in cards {
                table.add_row(vec![
                    super::or_dash(card.id.as_deref()),
                    super::truncate(card.display_name(), 30),
                    super::or_dash(card.title.as_deref()),
                    super::or_dash(card.company.as_deref()),
                    super::or_dash(card.phone.as_deref()),
                ]);
            }
            println!("{table}");
            println!("\n{} card(s)", cards.len());
        }
    }
}

fn print_card(card: &BusinessCard) {
    println!("{}", style(card.display_name()).bold().underlined());
    for (label, value) in [
        ("Title", &card.title),
        ("Company", &card.company),
        ("Phone", &card.phone),
        ("Email", &card.email),
        ("Website", &card.website),
        ("Address", &card.address),
        ("Image", &card.image_url),
    ] {
        if let Some(v) = value {
            println!("  {label:<9}{v}");
        }
    }
}
