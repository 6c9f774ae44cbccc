pub mod connection;
pub mod identity;
pub mod listing;
pub mod machine;
