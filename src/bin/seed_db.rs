use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, macros::date};

use spendwise::{
    BudgetTitle, NewTransaction, TransactionTitle, UserID, create_budget, create_transaction,
    initialize_db,
};

/// A utility for creating a database with sample budgets and transactions for spendwise.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the sample data.
    #[arg(long, short, default_value_t = 1)]
    user_id: i64,
}

const BUDGETS: [(&str, f64); 4] = [
    ("Groceries", 600.0),
    ("Transport", 150.0),
    ("Eating out", 120.0),
    ("Utilities", 250.0),
];

/// (title, amount, date, index into [BUDGETS])
const TRANSACTIONS: [(&str, f64, Date, usize); 10] = [
    ("Supermarket", 84.32, date!(2025 - 06 - 02), 0),
    ("Bus pass top up", 40.0, date!(2025 - 06 - 03), 1),
    ("Pizza night", 36.5, date!(2025 - 06 - 06), 2),
    ("Power bill", 142.17, date!(2025 - 06 - 09), 3),
    ("Farmers market", 27.8, date!(2025 - 06 - 14), 0),
    ("Petrol", 71.05, date!(2025 - 06 - 15), 1),
    ("Coffee with friends", 18.0, date!(2025 - 06 - 18), 2),
    ("Supermarket", 112.64, date!(2025 - 06 - 21), 0),
    ("Internet", 89.99, date!(2025 - 06 - 24), 3),
    ("Burgers", 74.2, date!(2025 - 06 - 27), 2),
];

/// Create and populate a database for manual testing.
///
/// Transactions are recorded the same way the app records them, so every
/// budget's spent total matches its transactions.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let user_id = UserID::new(args.user_id);

    println!("Creating budgets...");
    let mut budget_ids = Vec::with_capacity(BUDGETS.len());
    for (title, amount) in BUDGETS {
        let budget = create_budget(BudgetTitle::new(title)?, amount, user_id, &conn)?;
        budget_ids.push(budget.id);
    }

    println!("Creating transactions...");
    for (title, amount, date, budget_index) in TRANSACTIONS {
        create_transaction(
            NewTransaction {
                title: TransactionTitle::new(title)?,
                amount,
                date,
                budget_id: budget_ids[budget_index],
            },
            user_id,
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
