use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Key {0} not found")]
    KeyNotFound(String),
    #[error("Table is full: all {table_size} slots probed without a free or matching slot")]
    TableFull { table_size: usize },
    #[error("Keys {0} hash to the same slot at every remaining level")]
    UnresolvableCollision(String),
}

impl TableError {
    pub(crate) fn not_found<K: std::fmt::Debug>(key: &K) -> Self {
        TableError::KeyNotFound(format!("{:?}", key))
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
