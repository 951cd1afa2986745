mod bill;

pub use bill::{Bill, BillTable};

pub trait Table {
    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;
}
