use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{AppError, Tracker, UserDirectory};
use crate::domain::{
    categories_of_kind, find_category, format_cents, parse_cents, NewTransaction,
    TransactionKind, User,
};

/// Pocketbook - shared household income and expense tracker
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "A local-first income and expense tracker for several people on one machine")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "pocketbook.db")]
    pub database: String,

    /// Act as this user id instead of the current user
    #[arg(short, long, global = true)]
    pub user: Option<i64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database (if needed) and initialize both stores
    Init,

    /// User roster and current user selection
    #[command(subcommand)]
    User(UserCommands),

    /// Record an income or an expense
    Add {
        /// Amount (e.g., "40.00" or "40")
        amount: String,

        /// Kind: income or expense
        #[arg(short, long)]
        kind: String,

        /// Category id (see `categories`)
        #[arg(short, long)]
        category: Option<i64>,

        /// Free-form note
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List transactions
    List {
        /// Only this kind, most recent first (omit for all, in recording order)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show income, expenses and balance
    Balance,

    /// List the available categories
    Categories,

    /// Per-category breakdown
    Report {
        /// Kind: income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,
    },

    /// Export data: "csv" (one user's transactions) or "json" (full snapshot)
    Export {
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all users
    List,

    /// Show the current user
    Current,

    /// Make another user current
    Switch {
        /// User id
        id: i64,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut tracker = Tracker::open(&self.database).await?;

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
                if tracker.ledger.recovered_from_corrupt_state() {
                    println!("Warning: stored transactions were unreadable and have been reset.");
                }
            }

            Commands::User(user_cmd) => {
                run_user_command(&mut tracker.directory, user_cmd).await?;
            }

            Commands::Add {
                amount,
                kind,
                category,
                description,
            } => {
                let user = resolve_user(&tracker.directory, self.user)?.clone();
                let kind = parse_kind(&kind)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '40.00' or '40'")?;

                let mut draft = NewTransaction::new(kind, amount_cents);
                if let Some(category_id) = category {
                    check_category(category_id, kind)?;
                    draft = draft.with_category(category_id);
                }
                if let Some(desc) = description {
                    draft = draft.with_description(desc);
                }

                let transaction = tracker.ledger.add_transaction(user.id, draft).await?;
                println!(
                    "Recorded {}: {} for {} ({})",
                    transaction.kind,
                    format_cents(transaction.amount_cents),
                    user.name,
                    transaction.id
                );
            }

            Commands::Delete { id } => {
                let user = resolve_user(&tracker.directory, self.user)?.clone();
                let transaction_id =
                    Uuid::parse_str(&id).context("Invalid transaction ID format (expected UUID)")?;

                if tracker
                    .ledger
                    .delete_transaction(user.id, transaction_id)
                    .await?
                {
                    println!("Deleted transaction {}", transaction_id);
                } else {
                    println!("No transaction {} for {}", transaction_id, user.name);
                }
            }

            Commands::List { kind } => {
                let user = resolve_user(&tracker.directory, self.user)?;
                let transactions = match kind {
                    Some(k) => tracker.ledger.transactions_by_kind(user.id, parse_kind(&k)?),
                    None => tracker.ledger.transactions(user.id).to_vec(),
                };

                if transactions.is_empty() {
                    println!("No transactions found for {}.", user.name);
                } else {
                    println!(
                        "{:<17} {:<8} {:>10} {:<14} DESCRIPTION",
                        "DATE", "KIND", "AMOUNT", "CATEGORY"
                    );
                    println!("{}", "-".repeat(70));
                    for transaction in &transactions {
                        let category = transaction
                            .category_id
                            .map(|id| tracker.ledger.category_by_id(id).name())
                            .unwrap_or("-");
                        println!(
                            "{:<17} {:<8} {:>10} {:<14} {}",
                            transaction.created_at.format("%Y-%m-%d %H:%M"),
                            transaction.kind,
                            format_cents(transaction.amount_cents),
                            truncate(category, 14),
                            transaction.description.as_deref().unwrap_or("")
                        );
                        println!("  {}", transaction.id);
                    }
                }
            }

            Commands::Balance => {
                let user = resolve_user(&tracker.directory, self.user)?;
                let summary = tracker.ledger.summary(user.id);
                println!("{}", user.name);
                println!("  Income:       {:>12}", format_cents(summary.total_income));
                println!("  Expenses:     {:>12}", format_cents(summary.total_expenses));
                println!("  Balance:      {:>12}", format_cents(summary.balance));
                println!("  Transactions: {:>12}", summary.transaction_count);
            }

            Commands::Categories => {
                for kind in TransactionKind::ALL {
                    println!("{}", kind.label());
                    println!("  {:<4} {:<14} ICON", "ID", "NAME");
                    println!("  {}", "-".repeat(30));
                    for category in categories_of_kind(kind) {
                        println!("  {:<4} {:<14} {}", category.id, category.name, category.icon);
                    }
                    println!();
                }
            }

            Commands::Report { kind } => {
                let user = resolve_user(&tracker.directory, self.user)?;
                let kind = parse_kind(&kind)?;
                let report = tracker.ledger.category_breakdown(user.id, kind);

                if report.categories.is_empty() {
                    println!("No {} transactions for {}.", kind, user.name);
                } else {
                    println!("{} breakdown for {}", kind.label(), user.name);
                    println!("{:<14} {:>12} {:>6} {:>7}", "CATEGORY", "TOTAL", "COUNT", "SHARE");
                    println!("{}", "-".repeat(42));
                    for summary in &report.categories {
                        println!(
                            "{:<14} {:>12} {:>6} {:>6.1}%",
                            truncate(&summary.category, 14),
                            format_cents(summary.total),
                            summary.count,
                            summary.percentage
                        );
                    }
                    println!("{}", "-".repeat(42));
                    println!("{:<14} {:>12}", "TOTAL", format_cents(report.total));
                }
            }

            Commands::Export { format, output } => {
                run_export_command(&tracker, self.user, &format, output.as_deref())?;
            }
        }

        Ok(())
    }
}

async fn run_user_command(directory: &mut UserDirectory, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::List => {
            let current = directory.current_user().map(|u| u.id);
            println!("  {:<4} {:<20} COLOR", "ID", "NAME");
            println!("{}", "-".repeat(36));
            for user in directory.users() {
                let marker = if Some(user.id) == current { "*" } else { " " };
                println!(
                    "{} {:<4} {:<20} {}",
                    marker, user.id, user.name, user.display_color
                );
            }
        }

        UserCommands::Current => {
            let user = directory.current_user().ok_or(AppError::EmptyRoster)?;
            println!("{}", user);
        }

        UserCommands::Switch { id } => {
            // The store accepts any id; only switch to users that exist.
            let name = directory
                .find_user(id)
                .map(|u| u.name.clone())
                .ok_or(AppError::UserNotFound(id))?;
            directory.set_current_user(id).await?;
            println!("Current user: {}", name);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", s),
        }
    }
}

fn run_export_command(
    tracker: &Tracker,
    user: Option<i64>,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    // Validate everything before an output file is created.
    let format: ExportFormat = format.parse()?;
    let csv_user = match format {
        ExportFormat::Csv => Some(resolve_user(&tracker.directory, user)?),
        ExportFormat::Json => None,
    };

    let exporter = Exporter::new(&tracker.directory, &tracker.ledger);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match csv_user {
        Some(user) => {
            let count = exporter.export_transactions_csv(user.id, writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions for {}", count, user.name);
            }
        }
        None => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                let count: usize = snapshot.transactions.values().map(Vec::len).sum();
                eprintln!(
                    "Exported {} users and {} transactions",
                    snapshot.users.len(),
                    count
                );
            }
        }
    }

    Ok(())
}

/// The explicitly requested user, or the current one.
fn resolve_user(directory: &UserDirectory, requested: Option<i64>) -> Result<&User, AppError> {
    match requested {
        Some(id) => directory.find_user(id).ok_or(AppError::UserNotFound(id)),
        None => directory.current_user().ok_or(AppError::EmptyRoster),
    }
}

fn parse_kind(kind: &str) -> Result<TransactionKind> {
    kind.parse()
        .map_err(|e| anyhow::anyhow!("{}. Valid kinds: income, expense", e))
}

/// Reject unknown categories and categories of the other kind.
fn check_category(category_id: i64, kind: TransactionKind) -> Result<(), AppError> {
    let category = find_category(category_id).ok_or(AppError::CategoryNotFound(category_id))?;
    if category.kind != kind {
        return Err(AppError::CategoryKindMismatch {
            category: category.name.to_string(),
            category_kind: category.kind,
            requested: kind,
        });
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
