//! Terminal client for the Sticky Notes API
//!
//! Usage:
//!   cargo run --bin notes-cli -- signup "Ada" ada@example.com hunter2
//!   cargo run --bin notes-cli -- login ada@example.com hunter2
//!   NOTES_TOKEN=<token> cargo run --bin notes-cli -- add "Groceries" "milk, eggs" --color amber
//!   NOTES_TOKEN=<token> cargo run --bin notes-cli -- list
//!   NOTES_TOKEN=<token> cargo run --bin notes-cli -- list --search milk

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use stickynotes_backend::client::{NotesClient, NotesStore};
use stickynotes_backend::notes::models::{
    palette_color, CreateNoteRequest, Note, UpdateNoteRequest,
};
use tracing_subscriber::EnvFilter;

/// Sticky notes from the command line
#[derive(Parser, Debug)]
#[command(name = "notes-cli")]
#[command(about = "Create, edit and browse sticky notes on a notes server")]
struct Cli {
    /// Base URL of the notes server
    #[arg(long, env = "NOTES_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Bearer token from `login`
    #[arg(long, env = "NOTES_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account
    Signup {
        name: String,
        email: String,
        password: String,
    },

    /// Log in and print a token to export as NOTES_TOKEN
    Login { email: String, password: String },

    /// Show the logged-in user
    Me,

    /// List your notes
    List {
        /// Only notes whose title or content contains this text (any case)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a single note
    Show { id: String },

    /// Add a note
    Add {
        title: String,
        content: String,

        /// Palette name (e.g. amber, teal) or a hex value
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Change some fields of a note
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'b', long)]
        content: Option<String>,

        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a note
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut client = NotesClient::new(&cli.api_url)?;
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let user = client.signup(&name, &email, &password).await?;
            println!("Created account for {} <{}>", user.user_name, user.user_email);
            println!("Run `notes-cli login {} <password>` to get a token", user.user_email);
        }
        Commands::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            eprintln!(
                "Logged in as {} (token valid for {}h)",
                response.user.user_name,
                response.expires_in / 3600
            );
            println!("{}", response.access_token);
        }
        Commands::Me => {
            require_token(&client)?;
            let user = client.current_user().await?;
            println!("{} <{}>", user.user_name, user.user_email);
            println!("  id:      {}", user.user_id);
            println!("  joined:  {}", format_millis(user.create_on));
        }
        Commands::List { search } => {
            require_token(&client)?;
            let mut store = NotesStore::new(client);
            store.fetch_all().await?;
            match search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
                Some(query) => {
                    let matches = store.search(query);
                    if matches.is_empty() {
                        println!("No matching notes found");
                    } else {
                        print_table(&matches);
                    }
                }
                None => print_board(&store),
            }
        }
        Commands::Show { id } => {
            require_token(&client)?;
            let note = client.get_note(&id).await?;
            print_note(&note);
            println!("{}", note.note_content);
        }
        Commands::Add {
            title,
            content,
            color,
        } => {
            require_token(&client)?;
            let mut store = NotesStore::new(client);
            let note = store
                .create(CreateNoteRequest {
                    note_title: title,
                    note_content: content,
                    color: color.as_deref().map(palette_color),
                })
                .await?;
            println!("Added {}\n", note.note_id);
            print_board(&store);
        }
        Commands::Edit {
            id,
            title,
            content,
            color,
        } => {
            require_token(&client)?;
            let changes = UpdateNoteRequest {
                note_title: title,
                note_content: content,
                color: color.as_deref().map(palette_color),
            };
            if changes.is_empty() {
                bail!("Nothing to change: pass --title, --content or --color");
            }
            let mut store = NotesStore::new(client);
            let note = store.update(&id, changes).await?;
            println!("Updated {}\n", note.note_id);
            print_board(&store);
        }
        Commands::Rm { id } => {
            require_token(&client)?;
            let mut store = NotesStore::new(client);
            store.delete(&id).await?;
            println!("Deleted {}\n", id);
            print_board(&store);
        }
    }

    Ok(())
}

fn require_token(client: &NotesClient) -> Result<()> {
    if client.token().is_none() {
        bail!("Not logged in: pass --token or set NOTES_TOKEN");
    }
    Ok(())
}

fn print_board(store: &NotesStore) {
    if let Some(error) = store.error() {
        eprintln!("warning: {}", error);
    }

    if store.items().is_empty() {
        println!("No notes yet.");
        return;
    }
    print_table(&store.search(""));
}

fn print_table(notes: &[&Note]) {
    println!("{:<36}  {:<8}  {:<20}  {}", "ID", "COLOR", "UPDATED", "TITLE");
    println!("{}", "-".repeat(90));
    for note in notes {
        println!(
            "{:<36}  {:<8}  {:<20}  {}",
            note.note_id,
            note.color,
            format_millis(note.last_update),
            note.note_title
        );
    }
}

fn print_note(note: &Note) {
    println!("{} [{}]", note.note_title, note.color);
    println!("  id:       {}", note.note_id);
    println!("  created:  {} by {}", format_millis(note.create_on), note.created_by);
    match &note.updated_by {
        Some(editor) => println!("  updated:  {} by {}", format_millis(note.last_update), editor),
        None => println!("  updated:  {}", format_millis(note.last_update)),
    }
    println!();
}

fn format_millis(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}
