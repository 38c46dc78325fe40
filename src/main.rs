//! Command-line front end for the carteira personal-finance core.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use carteira::{
    Error, aggregation,
    currency::format_brl,
    dates::{format_display_date, parse_display_date},
    db::open_or_init,
    editor::TransactionEditor,
    fetcher::RandomImageFetcher,
    home::HomeScreen,
    models::{DatabaseId, Transaction, TransactionDraft, TransactionKind},
    stores::{ImageStore, TransactionStore, sqlite::create_stores},
};

/// Manage a personal-finance ledger from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "carteira.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record money earned.
    AddIncome {
        /// A label describing the transaction.
        title: String,
        /// The amount earned.
        amount: f64,
        /// The transaction date as dd/mm/yyyy. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Record money spent.
    AddExpense {
        /// A label describing the transaction.
        title: String,
        /// The amount spent.
        amount: f64,
        /// The transaction date as dd/mm/yyyy. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change one or more fields of an existing transaction.
    Edit {
        /// The identifier of the transaction to edit.
        id: DatabaseId,
        /// A new label.
        #[arg(long)]
        title: Option<String>,
        /// A new amount.
        #[arg(long)]
        amount: Option<f64>,
        /// A new date as dd/mm/yyyy.
        #[arg(long)]
        date: Option<String>,
        /// A new kind: income or expense.
        #[arg(long)]
        kind: Option<TransactionKind>,
    },
    /// Delete a transaction.
    Delete {
        /// The identifier of the transaction to delete.
        id: DatabaseId,
    },
    /// List all transactions.
    List {
        /// Print the transactions as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Total amounts per date for one transaction kind.
    Summary {
        /// The kind to summarize: income or expense.
        kind: TransactionKind,
    },
    /// Show the five largest expenses.
    TopExpenses,
    /// Show the balance and the income and expense totals.
    Balance,
    /// Fetch a random image and save it to the gallery.
    FetchImage,
    /// List the saved gallery images.
    Images,
    /// Delete a saved gallery image.
    DeleteImage {
        /// The identifier of the image to delete.
        id: DatabaseId,
    },
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if let Err(error) = run(args).await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carteira=info")),
        )
        .init();
}

async fn run(args: Args) -> Result<(), Error> {
    let connection = open_or_init(&args.db_path)?;
    let (mut transactions, images) = create_stores(connection)?;

    match args.command {
        Command::AddIncome {
            title,
            amount,
            date,
        } => add(transactions, &title, amount, date, TransactionKind::Income),
        Command::AddExpense {
            title,
            amount,
            date,
        } => add(transactions, &title, amount, date, TransactionKind::Expense),
        Command::Edit {
            id,
            title,
            amount,
            date,
            kind,
        } => edit(transactions, id, title, amount, date, kind),
        Command::Delete { id } => {
            transactions.delete(id)?;
            println!("Deleted transaction {id}.");
            Ok(())
        }
        Command::List { json } => list(&transactions, json),
        Command::Summary { kind } => {
            for summary in transactions.summary_by_date(kind)? {
                println!(
                    "{}  {}",
                    format_display_date(summary.date),
                    format_brl(summary.total)
                );
            }
            Ok(())
        }
        Command::TopExpenses => {
            for transaction in transactions.top_expenses()? {
                print_transaction(&transaction);
            }
            Ok(())
        }
        Command::Balance => {
            let all = transactions.list_all()?;
            println!("Income:  {}", aggregation::total_income_display(&all));
            println!("Expense: {}", aggregation::total_expense_display(&all));
            println!("Balance: {}", aggregation::balance_display(&all));
            Ok(())
        }
        Command::FetchImage => fetch_image(transactions, images).await,
        Command::Images => {
            for image in images.list_all()? {
                println!(
                    "{}  {} bytes  saved {}",
                    image.id,
                    image.image_blob.len(),
                    format_timestamp(image.timestamp)
                );
            }
            Ok(())
        }
        Command::DeleteImage { id } => {
            let mut images = images;
            images.delete(id)?;
            println!("Deleted image {id}.");
            Ok(())
        }
    }
}

fn add(
    store: impl TransactionStore,
    title: &str,
    amount: f64,
    date: Option<String>,
    kind: TransactionKind,
) -> Result<(), Error> {
    let date = parse_date_or_today(date)?;
    let (mut editor, _events) = TransactionEditor::new(store);

    if !editor.save(TransactionDraft::new(title, amount, date, kind)) {
        if amount < 0.0 {
            return Err(Error::NegativeAmount(amount));
        }
        eprintln!("error: could not save the transaction, see the log for details");
        std::process::exit(1);
    }

    println!(
        "Recorded {kind}: {title}, {} on {}.",
        format_brl(amount),
        format_display_date(date)
    );
    Ok(())
}

fn edit(
    store: impl TransactionStore,
    id: DatabaseId,
    title: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
    kind: Option<TransactionKind>,
) -> Result<(), Error> {
    let existing = store.get(id)?;

    let mut draft = existing.into_draft();
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(amount) = amount {
        draft.amount = amount;
    }
    if let Some(date) = date {
        draft.date = parse_display_date(&date)?;
    }
    if let Some(kind) = kind {
        draft.kind = kind;
    }

    let amount = draft.amount;
    let (mut editor, _events) = TransactionEditor::new(store);
    if !editor.save(draft) {
        if amount < 0.0 {
            return Err(Error::NegativeAmount(amount));
        }
        eprintln!("error: could not save the transaction, see the log for details");
        std::process::exit(1);
    }

    println!("Updated transaction {id}.");
    Ok(())
}

fn list(store: &impl TransactionStore, json: bool) -> Result<(), Error> {
    let all = store.list_all()?;

    if json {
        let output = serde_json::to_string_pretty(&all)
            .map_err(|error| Error::JsonSerialization(error.to_string()))?;
        println!("{output}");
        return Ok(());
    }

    for transaction in &all {
        print_transaction(transaction);
    }

    Ok(())
}

async fn fetch_image(
    transactions: impl TransactionStore,
    images: impl ImageStore,
) -> Result<(), Error> {
    let mut screen = HomeScreen::new(transactions, images, RandomImageFetcher::new());

    screen.refresh_background().await;

    match screen.save_background() {
        Ok(saved) => {
            println!("Saved image {} ({} bytes).", saved.id, saved.image_blob.len());
            Ok(())
        }
        Err(Error::NotFound) => {
            eprintln!("error: could not fetch an image, check the connection and try again");
            std::process::exit(1);
        }
        Err(error) => Err(error),
    }
}

fn print_transaction(transaction: &Transaction) {
    let Transaction {
        id,
        title,
        amount,
        date,
        kind,
    } = transaction;

    println!(
        "{id:>4}  {}  {:<7}  {:>14}  {title}",
        format_display_date(*date),
        kind.as_str(),
        format_brl(*amount)
    );
}

fn format_timestamp(millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp(millis / 1000)
        .map(|datetime| format_display_date(datetime.date()))
        .unwrap_or_else(|_| "unknown date".to_owned())
}

fn parse_date_or_today(date: Option<String>) -> Result<time::Date, Error> {
    match date {
        Some(input) => parse_display_date(&input),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}
