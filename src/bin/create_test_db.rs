use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use spendwatch::{
    NewExpense, PasswordHash, ValidatedPassword, create_expense, initialize_db, user::create_user,
};

/// A utility for creating a test database for the REST API server of spendwatch.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
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

    println!("Creating test user test@example.com with the password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(EmailAddress::from_str("test@example.com")?, password_hash, &conn)?;

    println!("Creating sample expenses...");

    let now = OffsetDateTime::now_utc();
    let samples = [
        ("Groceries", Decimal::new(8_450, 2), 1),
        ("Rent", Decimal::from(6_500), 3),
        ("Electricity bill", Decimal::new(199_990, 2), 10),
        ("Coffee", Decimal::from(180), 12),
        ("Train pass", Decimal::from(1_200), 20),
    ];

    for (label, value, days_ago) in samples {
        create_expense(
            NewExpense {
                user_id: user.id,
                label: label.to_owned(),
                value,
                date: (now - Duration::days(days_ago)).date(),
                created_at: now - Duration::days(days_ago),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
