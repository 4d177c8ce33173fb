use std::sync::Arc;

use anyhow::{bail, Context};
use lexoffers::api::{HttpBackend, OfferBackend};
use lexoffers::config::Config;
use lexoffers::events::{Event, Notice};
use lexoffers::screen::{FavoritesScreen, LoadState, OffersScreen};
use lexoffers::state::{CaseId, Offer, ViewStatus};
use lexoffers::{input, logging};
use tokio::sync::mpsc;
use tracing::info;

const USAGE: &str = "usage: lexoffers <case_id> | lexoffers favorites";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = Config::load("config.toml")?;
    logging::init(&cfg.general.log_level);
    info!(base_url = %cfg.backend.base_url, "loaded config");

    let backend = Arc::new(HttpBackend::new(&cfg.backend)?);
    let (tx, rx) = mpsc::channel::<Event>(100);
    input::spawn(tx.clone());

    match std::env::args().nth(1).as_deref() {
        Some("favorites") => run_favorites(backend, tx, rx).await,
        Some(arg) => {
            let case_id = arg
                .parse::<u64>()
                .map(CaseId)
                .with_context(|| format!("bad case id {:?}", arg))?;
            run_offers(case_id, backend, cfg, tx, rx).await
        }
        None => bail!(USAGE),
    }
}

async fn run_offers<B: OfferBackend>(
    case_id: CaseId,
    backend: Arc<B>,
    cfg: Config,
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut screen = OffersScreen::new(case_id, backend, cfg.view, tx);
    println!("Offers for case {} ({})\n", case_id, input::HELP);
    screen.refresh();
    screen.run(rx, |s| render_offers(s)).await;
    Ok(())
}

async fn run_favorites<B: OfferBackend>(
    backend: Arc<B>,
    tx: mpsc::Sender<Event>,
    mut rx: mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut screen = FavoritesScreen::new(backend, tx);
    println!("Favorite offers (unfav ID | refresh | quit)\n");
    screen.refresh();
    while let Some(event) = rx.recv().await {
        if !screen.handle(event) {
            break;
        }
        print_notices(screen.take_notices());
        if screen.load_state() == &LoadState::Ready {
            if screen.list().is_empty() {
                println!("No favorite offers.");
            }
            for offer in screen.list().offers() {
                let busy = if screen.list().is_busy(offer.id) { " (updating)" } else { "" };
                println!("{}{}", offer_line(offer), busy);
            }
            println!();
        }
    }
    Ok(())
}

fn render_offers<B: OfferBackend>(screen: &mut OffersScreen<B>) {
    print_notices(screen.take_notices());
    match screen.load_state() {
        LoadState::Idle | LoadState::Loading => return,
        LoadState::Failed(reason) => {
            println!("Could not load offers: {} (type 'refresh' to retry)", reason);
            return;
        }
        LoadState::Ready => {}
    }

    let view = screen.view();
    if view.is_empty() {
        println!("No offers received for this case yet.");
        return;
    }

    println!(
        "Page {} of {} | sort: {} | {} per page",
        view.current_page() + 1,
        view.page_count(),
        view.sort(),
        view.page_size()
    );
    for offer in view.current_offers() {
        let seen = match view.view_status(offer.id) {
            Some(ViewStatus::Seen) => "seen",
            Some(ViewStatus::Submitting) => "marking",
            _ => "new",
        };
        let busy = if view.is_favorite_busy(offer.id) { " (updating)" } else { "" };
        println!("  {} [{}]{}", offer_line(offer), seen, busy);
    }
    println!();
}

fn offer_line(offer: &Offer) -> String {
    format!(
        "#{} {} ${} {}{} {}",
        offer.id,
        if offer.lawyer_name.is_empty() { "-" } else { offer.lawyer_name.as_str() },
        offer.price,
        offer.state.label(),
        if offer.is_favorite { " *" } else { "" },
        offer.created_at.as_deref().unwrap_or("no date"),
    )
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice {
            Notice::Info(msg) => println!(">> {}", msg),
            Notice::Error(err) => println!("!! {}", err),
        }
    }
}
