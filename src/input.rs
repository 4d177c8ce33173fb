use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::Event;
use crate::state::OfferId;

pub const HELP: &str = "commands: page N | next | prev | sort date|asc|desc | fav ID | unfav ID | accept ID | refresh | quit";

/// Parse one line of user input. Pages are numbered from 1.
pub fn parse_command(line: &str) -> Result<Event, String> {
    let mut words = line.split_whitespace();
    let cmd = words.next().unwrap_or("");
    let arg = words.next();

    let offer_id = |arg: Option<&str>| -> Result<OfferId, String> {
        arg.ok_or_else(|| format!("{} needs an offer id", cmd))?
            .parse::<u64>()
            .map(OfferId)
            .map_err(|e| format!("bad offer id: {}", e))
    };

    match cmd {
        "page" | "p" => {
            let page = arg
                .ok_or("page needs a number")?
                .parse::<usize>()
                .map_err(|e| format!("bad page: {}", e))?;
            Ok(Event::SelectPage(page.saturating_sub(1)))
        }
        "next" | "n" => Ok(Event::NextPage),
        "prev" => Ok(Event::PrevPage),
        "sort" | "s" => Ok(Event::Sort(arg.ok_or("sort needs an option")?.parse()?)),
        "fav" | "unfav" | "f" => Ok(Event::ToggleFavorite(offer_id(arg)?)),
        "accept" | "a" => Ok(Event::Accept(offer_id(arg)?)),
        "refresh" | "r" => Ok(Event::Refresh),
        "quit" | "q" | "exit" => Ok(Event::Shutdown),
        "" => Err(HELP.to_string()),
        other => Err(format!("unknown command {:?}. {}", other, HELP)),
    }
}

/// Spawns a task that turns stdin lines and Ctrl+C into events.
pub fn spawn(tx: mpsc::Sender<Event>) {
    let signal_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(Event::Shutdown).await;
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(event) => {
                        debug!(?event, "user input");
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(msg) => println!("{}", msg),
                },
                Ok(None) => {
                    let _ = tx.send(Event::Shutdown).await;
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    let _ = tx.send(Event::Shutdown).await;
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SortOption;

    #[test]
    fn test_page_is_one_based() {
        assert!(matches!(parse_command("page 2"), Ok(Event::SelectPage(1))));
        assert!(matches!(parse_command("page 0"), Ok(Event::SelectPage(0))));
        assert!(parse_command("page").is_err());
        assert!(parse_command("page x").is_err());
    }

    #[test]
    fn test_sort_commands() {
        assert!(matches!(parse_command("sort asc"), Ok(Event::Sort(SortOption::PriceAsc))));
        assert!(matches!(parse_command("s date"), Ok(Event::Sort(SortOption::DateDesc))));
        assert!(parse_command("sort sideways").is_err());
    }

    #[test]
    fn test_offer_commands() {
        assert!(matches!(parse_command("fav 3"), Ok(Event::ToggleFavorite(OfferId(3)))));
        assert!(matches!(parse_command("accept 12"), Ok(Event::Accept(OfferId(12)))));
        assert!(parse_command("accept").is_err());
        assert!(parse_command("fav -1").is_err());
    }

    #[test]
    fn test_misc_commands() {
        assert!(matches!(parse_command("  refresh  "), Ok(Event::Refresh)));
        assert!(matches!(parse_command("quit"), Ok(Event::Shutdown)));
        assert!(matches!(parse_command("next"), Ok(Event::NextPage)));
        assert!(parse_command("").is_err());
        assert!(parse_command("dance").is_err());
    }
}
