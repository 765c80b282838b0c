mod db;
mod error;
mod models;
mod operations;
mod settings;

use chrono::Local;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use db::connection::establish_connection;
use db::kv_store::{KeyValueStore, SqliteKeyValueStore};
use db::repository::TransactionRepository;
use models::window::TimeWindow;
use operations::add::add_transaction_to_store;
use operations::aggregate::aggregate_by_bucket;
use operations::filter::filter_by_window;
use operations::overview;
use operations::remove::remove_transaction_from_store;
use operations::summary::summarize;
use settings::AppConfig;

#[derive(Debug, PartialEq, Eq)]
pub enum UserCommands {
    Add,
    Remove,
    List,
    Summary,
    Chart,
    Categories,
    Window(TimeWindow),
    Dashboard,
    Help,
    Exit,
    Unknown(String),
}

const HELP: &str = "Commands: add, remove, list, summary, chart, categories, window <day|month|year|all>, dashboard, help, exit";

fn main() -> ExitCode {
    let settings = match settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Failed to load settings: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("daily_income={}", settings.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let conn = match establish_connection(&settings.data_path) {
        Ok(conn) => conn,
        Err(err) => {
            tracing::error!(path = %settings.data_path, "failed to open database: {err}");
            eprintln!("Failed to open database '{}': {}", settings.data_path, err);
            return ExitCode::FAILURE;
        }
    };
    let mut repository =
        TransactionRepository::open(SqliteKeyValueStore::new(conn), &settings.storage_key);

    run(&mut repository, &settings);
    ExitCode::SUCCESS
}

fn run<S: KeyValueStore>(repository: &mut TransactionRepository<S>, settings: &AppConfig) {
    let mut window = settings.window();
    let symbol = settings.currency_symbol.as_str();

    println!("Welcome to the daily income tracker!");
    println!("{}", HELP);

    loop {
        print!("[{}] > ", window);
        let _ = io::stdout().flush();

        let input = match read_user_input() {
            Ok(Some(cmd)) => cmd,
            Ok(None) => break,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        if input.is_empty() {
            continue;
        }

        let now = Local::now().naive_local();
        match check_for_command(&input) {
            UserCommands::Add => {
                println!("Enter: type(income/expense), amount, category[, description[, date(YYYY-MM-DD[ HH:MM])]]");
                println!("Income categories: {}", settings.categories.income.join(", "));
                println!("Expense categories: {}", settings.categories.expense.join(", "));
                let details = match read_user_input() {
                    Ok(Some(details)) => details,
                    Ok(None) => break,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match add_transaction_to_store(repository, &settings.categories, &details, now) {
                    Ok(transaction) => println!(
                        "Transaction added: {}",
                        overview::format_transaction_line(&transaction, symbol)
                    ),
                    Err(e) => println!("Error adding transaction: {}", e),
                }
            }
            UserCommands::Remove => {
                println!("Provide the transaction id (or its first characters) to remove:");
                let id = match read_user_input() {
                    Ok(Some(id)) => id,
                    Ok(None) => break,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                if remove_transaction_from_store(repository, &id) {
                    println!("Transaction removed.");
                } else {
                    println!("No single transaction matches '{}', nothing removed.", id);
                }
            }
            UserCommands::List => {
                let filtered = filter_by_window(repository.transactions(), window, now);
                println!("{}", overview::format_transaction_list(filtered, window, symbol));
            }
            UserCommands::Summary => {
                let filtered = filter_by_window(repository.transactions(), window, now);
                println!("{}", overview::format_summary(&summarize(filtered), window, symbol));
            }
            UserCommands::Chart => {
                let filtered = filter_by_window(repository.transactions(), window, now);
                let buckets = aggregate_by_bucket(filtered, window);
                println!("{}", overview::format_bucket_chart(&buckets, window, symbol));
            }
            UserCommands::Categories => {
                let filtered = filter_by_window(repository.transactions(), window, now);
                println!(
                    "{}",
                    overview::format_category_report(&filtered, &settings.categories, window, symbol)
                );
            }
            UserCommands::Window(selected) => {
                window = selected;
                println!("Showing {}.", window.title());
            }
            UserCommands::Dashboard => {
                match operations::dashboard::run_dashboard(repository, settings, window) {
                    Ok(selected) => window = selected,
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::Help => println!("{}", HELP),
            UserCommands::Exit => {
                println!("Bye.");
                break;
            }
            UserCommands::Unknown(command) => {
                println!("Unknown command '{}'. {}", command, HELP);
            }
        }
    }
}

/// Returns `None` once stdin is closed.
fn read_user_input() -> Result<Option<String>, String> {
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn check_for_command(input: &str) -> UserCommands {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();
    match command.as_str() {
        "add" => UserCommands::Add,
        "remove" | "delete" => UserCommands::Remove,
        "list" | "print" => UserCommands::List,
        "summary" => UserCommands::Summary,
        "chart" => UserCommands::Chart,
        "categories" => UserCommands::Categories,
        "window" => UserCommands::Window(TimeWindow::from_label(parts.next().unwrap_or(""))),
        "dashboard" => UserCommands::Dashboard,
        "help" => UserCommands::Help,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown(command),
    }
}
