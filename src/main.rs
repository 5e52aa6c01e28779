use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use concierge::app::{AppError, ConciergeApp};
use concierge::chat::ChatSession;
use concierge::config::{ConciergeConfig, ConfigError, DEFAULT_COOKIE_JAR_PATH};
use concierge::i18n::{LanguageCode, TranslationKey, available_languages, get_translation, translate};
use concierge::model::{ChatMessage, FALLBACK_HOTEL_NAME, GuestIdentity, Sender};
use concierge::signup::{Notice, SignupFlow, SignupState};
use concierge::store::{FileCookieJar, GuestPersistence, StoreError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("cookie jar error: {0}")]
    Store(#[from] StoreError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "concierge", about = "Hotel concierge guest chat")]
struct Cli {
    /// File the cookie jar is kept in.
    #[arg(long, env = "COOKIE_JAR_PATH", default_value = DEFAULT_COOKIE_JAR_PATH)]
    cookie_jar: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign up (or resume) and chat with the concierge.
    Chat,
    Consent(ConsentCommand),
    /// List supported languages.
    Languages,
}

#[derive(Args, Debug)]
struct ConsentCommand {
    #[command(subcommand)]
    command: ConsentSubcommand,
}

#[derive(Subcommand, Debug)]
enum ConsentSubcommand {
    Accept,
    Decline,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Chat => run_chat(cli.cookie_jar).await,
        Command::Consent(consent) => run_consent(&cli.cookie_jar, consent),
        Command::Languages => {
            print_languages(&[]);
            Ok(())
        }
    }
}

// =============================================================================
// CONSENT
// =============================================================================

fn run_consent(cookie_jar: &Path, consent: ConsentCommand) -> Result<(), CliError> {
    let jar = Arc::new(FileCookieJar::open(cookie_jar));
    let persistence = GuestPersistence::new(jar.clone());
    match consent.command {
        ConsentSubcommand::Accept => {
            persistence.grant_consent()?;
            println!("cookies accepted ({})", jar.path().display());
        }
        ConsentSubcommand::Decline => {
            persistence.revoke_consent()?;
            println!("cookies declined ({})", jar.path().display());
        }
        ConsentSubcommand::Status => {
            let status = if persistence.has_consent() { "accepted" } else { "not accepted" };
            println!("{status}");
        }
    }
    Ok(())
}

// =============================================================================
// CHAT
// =============================================================================

async fn run_chat(cookie_jar: PathBuf) -> Result<(), CliError> {
    let mut config = ConciergeConfig::from_env()?;
    config.cookie_jar_path = cookie_jar;
    let mut app = ConciergeApp::from_config(&config)?;
    let mut term = Terminal::new();

    if !app.start().await {
        if !app.persistence().consent_decided() && ask_consent(&mut term).await? {
            app.persistence().grant_consent()?;
        }
        let Some(guest) = run_signup(app.signup_flow(), &mut term).await? else {
            return Ok(());
        };
        app.complete_signup(guest);
    }

    let mut chat = app.open_chat()?;
    println!("{}", get_translation(chat.language(), TranslationKey::AiDisclaimer));
    print_messages(chat.messages());

    loop {
        let label = get_translation(chat.language(), TranslationKey::TypeMessage);
        let Some(line) = term.prompt(label).await? else {
            break;
        };
        let line = line.trim();
        match line {
            "/quit" => break,
            "/languages" => print_languages(&chat.guest().hotel_languages),
            "/signout" => {
                app.sign_out().await?;
                println!("signed out");
                break;
            }
            other => {
                if let Some(code) = other.strip_prefix("/lang ") {
                    switch_language(&mut app, &mut chat, code.trim());
                } else {
                    chat.set_input(other);
                    let seen = chat.messages().len();
                    send_interruptible(&mut chat).await;
                    let replies: Vec<ChatMessage> = chat.messages()[seen..]
                        .iter()
                        .filter(|m| m.sender == Sender::Ai)
                        .cloned()
                        .collect();
                    print_messages(&replies);
                }
            }
        }
    }
    Ok(())
}

fn switch_language(app: &mut ConciergeApp, chat: &mut ChatSession, code: &str) {
    let offered = available_languages(&chat.guest().hotel_languages);
    match code.parse::<LanguageCode>() {
        Ok(language) if offered.contains(&language) => {
            app.change_language(chat, language);
            print_messages(chat.messages());
        }
        Ok(language) => println!("{} is not offered by this hotel", language.name()),
        Err(e) => println!("{e}"),
    }
}

/// Send the pending input; Ctrl-C while waiting cancels the send.
async fn send_interruptible(chat: &mut ChatSession) {
    let Some(pending) = chat.begin_send() else {
        return;
    };
    let outcome = {
        let dispatch = chat.dispatch(&pending);
        tokio::pin!(dispatch);
        tokio::select! {
            outcome = &mut dispatch => outcome,
            _ = tokio::signal::ctrl_c() => {
                chat.cancel_in_flight();
                dispatch.await
            }
        }
    };
    chat.finish_send(outcome);
}

// =============================================================================
// SIGNUP
// =============================================================================

async fn ask_consent(term: &mut Terminal) -> Result<bool, CliError> {
    let answer = term
        .prompt("Remember you on this device with cookies? [y/N]")
        .await?
        .unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn run_signup(mut flow: SignupFlow, term: &mut Terminal) -> Result<Option<GuestIdentity>, CliError> {
    flow.load_hotel().await;
    print_notices(flow.take_notices());

    let hotel_name = flow
        .hotel()
        .map_or(FALLBACK_HOTEL_NAME, |h| h.name.as_str())
        .to_string();
    println!("{} ({hotel_name})", translate(flow.language(), TranslationKey::Welcome));

    loop {
        let language = flow.language().to_string();
        let Some(name) = term.prompt(translate(&language, TranslationKey::Name)).await? else {
            return Ok(None);
        };
        flow.set_name(name);
        let Some(room) = term.prompt(translate(&language, TranslationKey::RoomNumber)).await? else {
            return Ok(None);
        };
        flow.set_room_number(room);

        print_languages(&flow.hotel().map(|h| h.supported_languages.clone()).unwrap_or_default());
        let label = format!("{} [{language}]", translate(&language, TranslationKey::Language));
        let Some(picked) = term.prompt(&label).await? else {
            return Ok(None);
        };
        if !picked.trim().is_empty() {
            flow.set_language(picked.trim());
        }

        let guest = flow.submit().await;
        print_notices(flow.take_notices());
        if let Some(guest) = guest {
            return Ok(Some(guest));
        }
        if let SignupState::Failed(e) = flow.state() {
            println!("{e}");
        }
    }
}

// =============================================================================
// TERMINAL
// =============================================================================

struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    fn new() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines() }
    }

    /// Print `label` and read one line. `None` on end of input or Ctrl-C.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>, CliError> {
        print!("{label} > ");
        std::io::stdout().flush()?;
        tokio::select! {
            line = self.lines.next_line() => Ok(line?),
            _ = tokio::signal::ctrl_c() => Ok(None),
        }
    }
}

fn print_messages(messages: &[ChatMessage]) {
    for message in messages {
        let who = match message.sender {
            Sender::Guest => "you",
            Sender::Ai => "concierge",
        };
        println!("[{who}] {}", message.content);
    }
}

fn print_languages(hotel_languages: &[String]) {
    for language in available_languages(hotel_languages) {
        println!("  {}  {} {}", language.code(), language.flag(), language.name());
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice {
            Notice::Success(message) => println!("{message}"),
            Notice::Error(message) => eprintln!("{message}"),
        }
    }
}
