use anyhow::{Context, Result};
use futures_util::future::join_all;
use std::time::Instant;

use lexoffers::api::{HttpBackend, OfferBackend};
use lexoffers::config::Config;
use lexoffers::logging;
use lexoffers::state::CaseId;
use lexoffers::view::OfferListViewState;

/// One-shot: fetch a case's offers, print every page, then fetch the
/// details of the first page concurrently. Nothing is marked as viewed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cfg = Config::load("config.toml")?;
    logging::init(&cfg.general.log_level);

    let case_id = std::env::args()
        .nth(1)
        .context("usage: list_offers <case_id>")?
        .parse::<u64>()
        .map(CaseId)?;

    let backend = HttpBackend::new(&cfg.backend)?;

    let start = Instant::now();
    let offers = backend.list_offers_for_case(case_id).await?;
    println!("Fetched {} offers in {}ms", offers.len(), start.elapsed().as_millis());

    let mut view = OfferListViewState::new(cfg.view);
    // Only the ordering is wanted here, the requested marks are discarded
    let _ = view.replace_offers(offers);

    for (i, page) in view.pages().iter().enumerate() {
        println!("Page {} ({})", i + 1, view.sort());
        for offer in page {
            println!(
                "  #{} {} ${} {}",
                offer.id,
                offer.lawyer_name,
                offer.price,
                offer.state.label()
            );
        }
    }

    let first_page: Vec<_> = view.page(0).iter().map(|o| o.id).collect();
    let start = Instant::now();
    let details = join_all(first_page.iter().map(|&id| backend.get_offer_detail(id))).await;
    println!("\nDetails of first page in {}ms", start.elapsed().as_millis());
    for (id, detail) in first_page.iter().zip(details) {
        match detail {
            Ok(offer) => println!("  #{}: {}", id, offer.message),
            Err(e) => println!("  #{}: error: {}", id, e),
        }
    }

    Ok(())
}
