use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Select;
use tracing::info;
use tracing_subscriber::EnvFilter;

use thriveup_common::{Config, EventRecord, SourceError};
use thriveup_engine::{
    rebuild, BookmarkIndex, CategorySection, EventSource, FileSlot, HttpEventSource,
    JsonFileEventSource, PersistenceGateway, TriageSession,
};

/// Cards shown at once on the swipe screen.
const VISIBLE_CARDS: usize = 3;

#[derive(Parser)]
#[command(name = "thriveup")]
#[command(about = "Triage and bookmark campus events")]
#[command(version)]
struct Cli {
    /// Directory for local bookmark data (overrides THRIVEUP_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file with the event feed (overrides THRIVEUP_EVENTS_FILE)
    #[arg(long, global = true)]
    events_file: Option<PathBuf>,

    /// URL serving the event feed as JSON (overrides THRIVEUP_EVENTS_URL)
    #[arg(long, global = true)]
    events_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Swipe through events not yet bookmarked
    Triage,

    /// List bookmarked events by category
    Bookmarks {
        /// Only show events whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List the full event feed by category
    Feed {
        /// Only show events whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("thriveup=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(path) = cli.events_file {
        config.events_file = Some(path);
    }
    if let Some(url) = cli.events_url {
        config.events_url = Some(url);
    }
    config.log_redacted();

    match cli.command {
        Commands::Triage => cmd_triage(&config).await,
        Commands::Bookmarks { search } => cmd_bookmarks(&config, search),
        Commands::Feed { search } => cmd_feed(&config, search).await,
    }
}

async fn cmd_triage(config: &Config) -> Result<()> {
    let source = event_source(config)?;
    let mut session = TriageSession::start(&*source, gateway(config))
        .await
        .context("Failed to start triage")?;

    loop {
        let Some(top) = session.peek_top() else {
            println!("{}", style("No more events to triage.").dim());
            break;
        };
        print_card(top);

        let upcoming: Vec<&str> = session
            .visible(VISIBLE_CARDS)
            .skip(1)
            .map(|e| e.title.as_str())
            .collect();
        if !upcoming.is_empty() {
            println!("{} {}", style("Up next:").dim(), upcoming.join(", "));
        }
        println!("{}", style(format!("{} left", session.remaining())).dim());

        let choice = Select::new()
            .with_prompt("Keep this event?")
            .items(&["Bookmark", "Discard", "Quit"])
            .default(0)
            .interact_opt()?;

        match choice {
            Some(0) => {
                let Some((record, ticket)) = session.accept() else {
                    continue;
                };
                match ticket.wait().await {
                    Ok(_) => println!("{} {}", style("Bookmarked").green(), record.title),
                    Err(e) => println!(
                        "{} {} is bookmarked for now but was not saved: {e}",
                        style("Warning:").yellow().bold(),
                        record.title
                    ),
                }
            }
            Some(1) => {
                if let Some(record) = session.reject() {
                    println!("{} {}", style("Discarded").red(), record.title);
                }
            }
            _ => break,
        }
    }

    info!(
        bookmarked = session.index().len(),
        remaining = session.remaining(),
        "Triage finished"
    );
    print_sections(session.index().sections());
    Ok(())
}

fn cmd_bookmarks(config: &Config, search: Option<String>) -> Result<()> {
    let mut index = BookmarkIndex::new(gateway(config).load());
    index.set_filter(search.unwrap_or_default());

    if index.sections().is_empty() {
        match index.filter() {
            Some(filter) => println!("No bookmarks match \"{filter}\"."),
            None => println!("No bookmarks yet. Run `thriveup triage` to add some."),
        }
        return Ok(());
    }
    print_sections(index.sections());
    Ok(())
}

async fn cmd_feed(config: &Config, search: Option<String>) -> Result<()> {
    let events = event_source(config)?
        .fetch_all()
        .await
        .context("Failed to fetch events")?;
    let sections = rebuild(&events, search.as_deref());
    if sections.is_empty() {
        println!("No events found.");
        return Ok(());
    }
    print_sections(&sections);
    Ok(())
}

fn gateway(config: &Config) -> Arc<PersistenceGateway> {
    Arc::new(PersistenceGateway::new(
        Arc::new(FileSlot::new(&config.data_dir)),
        config.bookmark_key.clone(),
    ))
}

fn event_source(config: &Config) -> Result<Box<dyn EventSource>> {
    if let Some(url) = &config.events_url {
        return Ok(Box::new(HttpEventSource::new(url.clone())));
    }
    if let Some(path) = &config.events_file {
        return Ok(Box::new(JsonFileEventSource::new(path.clone())));
    }
    Err(SourceError::Missing).context("Set THRIVEUP_EVENTS_URL or THRIVEUP_EVENTS_FILE")
}

fn print_card(event: &EventRecord) {
    println!();
    println!("{}", style(&event.title).bold());
    println!("{}", style(event.category_label()).cyan());
    let details: Vec<&str> = [
        event.organizer_name.as_deref(),
        event.date.as_deref(),
        event.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !details.is_empty() {
        println!("{}", style(details.join(" · ")).dim());
    }
    if !event.description.is_empty() {
        println!("{}", event.description);
    }
}

fn print_sections(sections: &[CategorySection]) {
    for section in sections {
        println!();
        println!("{}", style(&section.name).cyan().bold());
        for event in &section.events {
            match event.date.as_deref() {
                Some(date) => println!("  • {} {}", event.title, style(date).dim()),
                None => println!("  • {}", event.title),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "thriveup",
            "bookmarks",
            "--search",
            "jazz",
            "--data-dir",
            "/tmp/thriveup",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/thriveup")));
        assert!(matches!(cli.command, Commands::Bookmarks { search: Some(ref s) } if s == "jazz"));
    }

    #[test]
    fn missing_event_source_is_an_error() {
        assert!(event_source(&Config::default()).is_err());
    }

    #[test]
    fn fixture_feed_groups_by_first_appearance() {
        let raw = include_str!("../fixtures/events.json");
        let events: Vec<EventRecord> = serde_json::from_str(raw).unwrap();
        let names: Vec<String> = rebuild(&events, None).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Favourites", "Sports", "Tech Favs", "Uncategorized"]);
    }
}
