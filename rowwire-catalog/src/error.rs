use smol_str::SmolStr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Duplicate name present in schema: {0}")]
    DuplicateColumnName(SmolStr),
    #[error("Bad schema: {num_key_columns} key columns but only {num_columns} columns")]
    TooManyKeyColumns {
        num_key_columns: usize,
        num_columns: usize,
    },
}
