pub mod cli;
pub mod copier;
pub mod error;
pub mod export;
pub mod library;
pub mod location;
pub mod models;
pub mod platform;
pub mod select;
pub mod writers;
