//! huginn — review sentiment in the terminal
//!
//! Picks a product review, classifies it with a hosted model and shows the
//! result alongside a short history.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use huginn::{
    Config, DisplayState, HistoryEntry, HuggingFaceClient, HuginnError, Outcome, ReviewSource,
    Session, TokenStore,
};

const BAR_WIDTH: usize = 20;

/// Review sentiment over hosted inference APIs
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Classify product review sentiment with a hosted model")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TSV file with a `text` column (overrides config).
    #[arg(short, long)]
    reviews: Option<PathBuf>,

    /// Model ID (overrides config).
    #[arg(short, long)]
    model: Option<String>,

    /// Inference API base URL (overrides config).
    #[arg(long, env = "HUGINN_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive loop: Enter analyzes a random review, `q` quits
    Run,

    /// Classify one text (or a random review) and exit
    Once {
        /// Text to classify; a random review when omitted
        text: Option<String>,
    },

    /// Manage the stored API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a token (prompted when omitted)
    Set { value: Option<String> },
    /// Remove the stored token
    Clear,
    /// Show where the active token comes from
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let tokens = TokenStore::default();

    if let Some(Command::Token { action }) = &args.command {
        return manage_token(&tokens, action);
    }

    let config = Config::load(args.config.as_deref())?;
    let reviews_path = args.reviews.or(config.reviews.path);
    let reviews = match ReviewSource::load(reviews_path.as_deref()) {
        Ok(reviews) => reviews,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("status: Unable to load reviews");
            ReviewSource::default()
        }
    };

    let client = HuggingFaceClient::with_base_url(
        tokens.resolve()?,
        args.model.unwrap_or(config.api.model),
        args.base_url.unwrap_or(config.api.base_url),
    )?;
    let session = Session::new(client, reviews);

    match args.command {
        Some(Command::Once { text }) => {
            let outcome = match text {
                Some(text) => session.analyze_text(&text).await?,
                None => session.analyze_one().await?,
            };
            if let Outcome::Classified(entry) = outcome {
                print_result(&entry);
            }
        }
        Some(Command::Run) | None => run_interactive(&session).await?,
        Some(Command::Token { .. }) => unreachable!("handled above"),
    }

    Ok(())
}

async fn run_interactive(session: &Session<HuggingFaceClient>) -> io::Result<()> {
    if session.reviews().is_empty() {
        println!("No reviews loaded; nothing to analyze.");
        return Ok(());
    }
    println!("{}", session.reviews().summary());
    println!(
        "model: {}{}",
        session.provider().model(),
        if session.provider().is_authenticated() {
            ""
        } else {
            " (anonymous)"
        }
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\n[Enter] analyze a random review, [q] quit > ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        println!("Calling Hugging Face API...");
        match session.analyze_one().await {
            Ok(Outcome::Classified(entry)) => {
                print_result(&entry);
                print_history(&session.history());
                println!("status: Done");
            }
            Ok(Outcome::Ignored) => {}
            Err(e) => print_error(&e),
        }
    }
    Ok(())
}

fn print_result(entry: &HistoryEntry) {
    let display = DisplayState::from(entry.result());
    println!("\n\"{}\"", entry.text);
    println!(
        "{} {} {}",
        display.appearance.glyph,
        display.appearance.label,
        display.score_text()
    );
    match display.fill_percent() {
        Some(fill) => println!("[{}] {fill:.1}%", display.score_bar(BAR_WIDTH)),
        None => println!("[{}]", display.score_bar(BAR_WIDTH)),
    }
}

fn print_history(history: &[HistoryEntry]) {
    println!("\nRecent:");
    for entry in history {
        let display = DisplayState::from(entry.result());
        let score = entry.score.map(|s| format!("{s:.3}")).unwrap_or_default();
        println!("  {} {:<60} {score}", display.appearance.glyph, entry.text);
    }
}

fn print_error(err: &HuginnError) {
    if err.is_warming_up() {
        eprintln!("error: the model is warming up, retry in a few seconds");
    } else {
        eprintln!("error: {err}");
    }
    eprintln!("status: Error");
}

fn manage_token(
    tokens: &TokenStore,
    action: &TokenAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TokenAction::Set { value } => {
            let value = match value {
                Some(value) => value.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("HuggingFace token")
                    .allow_empty_password(true)
                    .interact()?,
            };
            tokens.save(&value)?;
            println!("saved to {}", tokens.path().display());
        }
        TokenAction::Clear => {
            tokens.clear()?;
            println!("cleared {}", tokens.path().display());
        }
        TokenAction::Show => match tokens.load()? {
            Some(token) => println!("stored token: {}", mask(&token)),
            None => match std::env::var(huginn::config::TOKEN_ENV_VAR) {
                Ok(token) if !token.trim().is_empty() => println!(
                    "{} token: {}",
                    huginn::config::TOKEN_ENV_VAR,
                    mask(&token)
                ),
                _ => println!("no token configured (anonymous requests)"),
            },
        },
    }
    Ok(())
}

/// Keep only enough of a token to recognise it.
fn mask(token: &str) -> String {
    let visible: String = token.trim().chars().take(4).collect();
    format!("{visible}…")
}
