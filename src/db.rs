//! Creates the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::Date;

use crate::{
    Error,
    ledger::create_ledger_table,
    settings::{create_settings_table, seed_default_settings},
};

/// Create the ledger and settings tables if they do not exist and store any
/// missing default settings.
///
/// `today` is used as the default loan start date.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection, today: Date) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_ledger_table(&transaction)?;
    create_settings_table(&transaction)?;
    seed_default_settings(today, &transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use super::initialize;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), initialize(&connection, date!(2024 - 01 - 01)));
    }

    #[test]
    fn can_initialize_twice() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection, date!(2024 - 01 - 01)).unwrap();

        assert_eq!(Ok(()), initialize(&connection, date!(2024 - 01 - 02)));
    }
}
