use agenda_storage::CalendarStore;
use agenda_wizard::dispatch::handle_message;
use agenda_wizard::Wizard;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Agenda calendar bot CLI", long_about = None)]
struct Cli {
    /// Path to the SQLite database.
    #[arg(long, default_value = "agenda.db")]
    db: String,
    /// Owner id to act as.
    #[arg(long)]
    owner: i64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session; send /help for the command list.
    Chat,
    /// Print the owner's events and exit.
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = CalendarStore::open(&cli.db)
        .with_context(|| format!("failed to open database at {}", cli.db))?;
    let wizard = Wizard::new(store);

    match cli.command {
        Commands::Chat => chat(&wizard, cli.owner),
        Commands::List => {
            for chunk in wizard.list(cli.owner).context("failed to list events")? {
                println!("{chunk}");
            }
            Ok(())
        }
    }
}

fn chat(wizard: &Wizard, owner_id: i64) -> Result<()> {
    println!("Chatting as owner {owner_id}. Send /help for commands, Ctrl-D to leave.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        match handle_message(wizard, owner_id, text) {
            Ok(replies) => {
                for reply in replies {
                    println!("{reply}");
                }
            }
            Err(err) => {
                // The wizard resolves user mistakes itself; an error here
                // is a store failure worth showing once and carrying on.
                eprintln!("error: {err}");
            }
        }
    }
}
