//! `lexicard` - CLI for the flashcard deck
//!
//! This binary serves the card API and manages a deck from the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use lexicard::card::resolve_owner;
use lexicard::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ImportCommand, SearchCommand,
    ServeCommand,
};
use lexicard::import::parse_import;
use lexicard::{
    filter_cards, init_logging, server, AppState, Card, CardPatch, CardRepository, Config,
    NewCard, SqliteCardRepository, Storage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::Serve(cmd) => handle_serve(config, cmd).await,
        command => run_deck_command(&config, command).await,
    }
}

async fn run_deck_command(config: &Config, command: Command) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    let owner = |user: Option<String>| resolve_owner(user.as_deref(), &config.deck.default_owner);

    match command {
        Command::List(cmd) => {
            let cards = repo.list(&owner(cmd.user)).await?;
            print_cards(&cards.iter().collect::<Vec<_>>(), cmd.json)?;
        }
        Command::Search(cmd) => handle_search(&repo, owner(cmd.user.clone()), &cmd).await?,
        Command::Import(cmd) => handle_import(&repo, owner(cmd.user.clone()), &cmd).await?,
        Command::Add(cmd) => handle_add(&repo, owner(cmd.user.clone()), cmd).await?,
        Command::Mark(cmd) => {
            let card = repo.update(&cmd.id, CardPatch::known(!cmd.unknown)).await?;
            let state = if card.is_known { "known" } else { "unknown" };
            println!("Marked {} ({}) as {state}", card.word, card.id);
        }
        Command::Edit(cmd) => handle_edit(&repo, cmd).await?,
        Command::Delete(cmd) => {
            repo.delete(&cmd.id).await?;
            println!("Deleted card {}", cmd.id);
        }
        Command::Stats(cmd) => {
            let stats = repo.stats(&owner(cmd.user)).await?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Deck:     {}", stats.owner_id);
                println!("Cards:    {}", stats.total);
                println!("Known:    {}", stats.known);
                println!("Unknown:  {}", stats.unknown);
                if let Some(oldest) = stats.oldest_card {
                    println!("Oldest:   {}", oldest.format("%Y-%m-%d %H:%M"));
                }
                if let Some(newest) = stats.newest_card {
                    println!("Newest:   {}", newest.format("%Y-%m-%d %H:%M"));
                }
            }
        }
        Command::Config(cmd) => handle_config(config, cmd)?,
        Command::Serve(_) => bail!("serve does not run against a local deck"),
    }
    Ok(())
}

fn open_repository(config: &Config) -> anyhow::Result<SqliteCardRepository> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open card database at {}", path.display()))?;
    Ok(SqliteCardRepository::new(storage))
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;
    let addr = config.bind_addr()?;

    let state = AppState::new(open_repository(&config)?)
        .with_default_owner(&config.deck.default_owner)
        .with_debounce(config.debounce());
    server::serve(addr, state).await?;
    Ok(())
}

async fn handle_search(
    repo: &SqliteCardRepository,
    owner: String,
    cmd: &SearchCommand,
) -> anyhow::Result<()> {
    let cards = repo.list(&owner).await?;
    let matches = filter_cards(&cards, &cmd.query);
    if matches.is_empty() && !cmd.json {
        println!("No cards match \"{}\"", cmd.query);
        return Ok(());
    }
    print_cards(&matches, cmd.json)
}

async fn handle_import(
    repo: &SqliteCardRepository,
    owner: String,
    cmd: &ImportCommand,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let cards = parse_import(&contents)?;
    if cards.is_empty() {
        println!("Nothing to import from {}", cmd.file.display());
        return Ok(());
    }

    let created = repo.create(&owner, cards).await?;
    info!("Imported {} cards from {}", created.len(), cmd.file.display());
    println!("Imported {} cards into deck {owner}", created.len());
    Ok(())
}

async fn handle_add(
    repo: &SqliteCardRepository,
    owner: String,
    cmd: AddCommand,
) -> anyhow::Result<()> {
    let input = NewCard {
        word: cmd.word,
        translation: cmd.translation,
        examples: cmd.examples,
        is_known: false,
    };
    let created = repo.create(&owner, vec![input]).await?;
    for card in &created {
        println!("Added {} ({})", card.word, card.id);
    }
    Ok(())
}

async fn handle_edit(repo: &SqliteCardRepository, cmd: EditCommand) -> anyhow::Result<()> {
    let patch = CardPatch {
        word: cmd.word,
        translation: cmd.translation,
        ..CardPatch::default()
    };
    if patch.is_empty() {
        bail!("nothing to change: pass --word and/or --translation");
    }
    let card = repo.update(&cmd.id, patch).await?;
    println!("Updated {}: {} = {}", card.id, card.word, card.translation);
    Ok(())
}

fn print_cards(cards: &[&Card], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(cards)?);
        return Ok(());
    }
    if cards.is_empty() {
        println!("No cards yet.");
        return Ok(());
    }
    for card in cards {
        let mark = if card.is_known { "x" } else { " " };
        println!("[{mark}] {} = {}  ({})", card.word, card.translation, card.id);
        for example in &card.examples {
            println!("      {} = {}", example.text, example.translation);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Server]");
                println!("  Host:           {}", config.server.host);
                println!("  Port:           {}", config.server.port);
                println!();
                println!("[Deck]");
                println!("  Default owner:  {}", config.deck.default_owner);
                println!();
                println!("[Search]");
                println!("  Debounce (ms):  {}", config.search.debounce_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                bail!("Configuration error: {e}");
            }
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
