pub mod account_directory;
pub mod client;

pub use account_directory::PostgresAccountDirectory;
pub use client::PostgresClient;
