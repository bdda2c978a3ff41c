use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, macros::date};

use loan_ledger::{EntryAction, EntryRequest, initialize_db, record_entry};

/// A utility for creating a test database for the loan ledger server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const START_DATE: Date = date!(2024 - 01 - 01);

/// A year of lending: a large draw, monthly interest, repayments and a top-up.
fn demo_history() -> Vec<EntryRequest> {
    let mut history = vec![EntryRequest::new(
        START_DATE,
        EntryAction::Draw { amount: 50_000.0 },
        Some("Initial loan".to_owned()),
    )];

    for month in 1..=12u8 {
        let Ok(month) = time::Month::try_from(month) else {
            continue;
        };
        let last_day = month.length(2024);
        let Ok(month_end) = Date::from_calendar_date(2024, month, last_day) else {
            continue;
        };

        history.push(EntryRequest::new(
            month_end,
            EntryAction::InterestCharge {
                rate_override: None,
            },
            None,
        ));

        if let Ok(payday) = Date::from_calendar_date(2024, month, 15) {
            history.push(EntryRequest::new(
                payday,
                EntryAction::Repayment { amount: 5_000.0 },
                None,
            ));
        }

        if month == time::Month::June {
            history.push(EntryRequest::new(
                date!(2024 - 06 - 20),
                EntryAction::Draw { amount: 10_000.0 },
                Some("Car repairs".to_owned()),
            ));
        }
    }

    history.sort_by_key(|request| request.date);
    history
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

    initialize_db(&conn, START_DATE)?;

    println!("Recording demo transactions...");

    for request in demo_history() {
        match record_entry(&request, &conn) {
            Ok(_) => {}
            // The principal can be paid off before the year is out.
            Err(loan_ledger::Error::NoPrincipal(_)) => {}
            Err(error) => return Err(error.into()),
        }
    }

    println!("Success!");

    Ok(())
}
