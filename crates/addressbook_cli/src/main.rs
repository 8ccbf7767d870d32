//! Address book command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto `AddressBookService` operations.
//! - Keep output deterministic for scripting (`list --json`).

use addressbook_core::{
    default_log_level, init_logging, AddressBookService, Contact, RepoError,
    SqliteContactRepository, UpsertOutcome,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "addressbook")]
#[command(about = "Manage a SQLite-backed contacts address book", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Connection address, e.g. `sqlite:contacts.db?insert=transaction`
    #[arg(long, env = "ADDRESSBOOK_DB", default_value = "sqlite:addressbook.db")]
    db: String,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "ADDRESSBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "ADDRESSBOOK_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the contacts table if absent
    Init,
    /// Add a contact; fails if the email already exists
    Add(ContactArgs),
    /// Update names and phone of the contact with this email
    Save(ContactArgs),
    /// Add, or update when the email already exists
    Upsert(ContactArgs),
    /// List all contacts
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print core health and version
    Ping,
}

#[derive(Args)]
struct ContactArgs {
    /// Contact email (identity key)
    #[arg(short, long)]
    email: String,

    #[arg(short, long)]
    first_name: String,

    #[arg(short, long)]
    last_name: String,

    #[arg(short, long)]
    phone: Option<String>,
}

impl From<ContactArgs> for Contact {
    fn from(args: ContactArgs) -> Self {
        Contact::new(args.first_name, args.last_name, args.phone, args.email)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            // Distinct exit code lets scripts branch on duplicates.
            if matches!(
                err.downcast_ref::<RepoError>(),
                Some(RepoError::AlreadyExists { .. })
            ) {
                ExitCode::from(3)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    if let Commands::Ping = cli.command {
        println!("addressbook_core ping={}", addressbook_core::ping());
        println!("addressbook_core version={}", addressbook_core::core_version());
        return Ok(());
    }

    let repo = SqliteContactRepository::from_address(&cli.db)
        .with_context(|| format!("invalid --db `{}`", cli.db))?;
    let service = AddressBookService::new(repo);

    match cli.command {
        Commands::Init => {
            service.ensure_schema()?;
            println!("contacts table ready");
        }
        Commands::Add(args) => {
            let contact = service.add(args.into())?;
            println!("added {}", contact.email);
        }
        Commands::Save(args) => {
            let contact = service.save(args.into())?;
            println!("saved {}", contact.email);
        }
        Commands::Upsert(args) => {
            let (contact, outcome) = service.upsert(args.into())?;
            let verb = match outcome {
                UpsertOutcome::Inserted => "added",
                UpsertOutcome::Updated => "saved",
            };
            println!("{verb} {}", contact.email);
        }
        Commands::List { json } => {
            let contacts = service.get_all_contacts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contacts)?);
            } else {
                print_table(&contacts);
            }
        }
        Commands::Ping => {}
    }

    Ok(())
}

fn print_table(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("no contacts");
        return;
    }
    println!(
        "{:>6}  {:<20}  {:<20}  {:<20}  {}",
        "ID", "FIRST NAME", "LAST NAME", "PHONE", "EMAIL"
    );
    for contact in contacts {
        println!(
            "{:>6}  {:<20}  {:<20}  {:<20}  {}",
            contact.id.map(|id| id.to_string()).unwrap_or_default(),
            contact.first_name,
            contact.last_name,
            contact.phone_number.as_deref().unwrap_or("-"),
            contact.email
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_arguments_map_to_contact() {
        let cli = Cli::try_parse_from([
            "addressbook",
            "--db",
            "sqlite:mem:cli",
            "add",
            "--email",
            "john.doe@somewhere.com",
            "--first-name",
            "John",
            "--last-name",
            "Doe",
            "--phone",
            "+1 111 1234567",
        ])
        .unwrap();

        assert_eq!(cli.db, "sqlite:mem:cli");
        match cli.command {
            Commands::Add(args) => {
                let contact: addressbook_core::Contact = args.into();
                assert_eq!(contact.email, "john.doe@somewhere.com");
                assert_eq!(contact.phone_number.as_deref(), Some("+1 111 1234567"));
                assert_eq!(contact.id, None);
            }
            _ => panic!("expected add subcommand"),
        }
    }
}
