pub mod statement_csv;

pub use statement_csv::{read_statement, read_statement_csv};
