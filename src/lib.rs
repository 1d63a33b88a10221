pub mod api;
pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod search;
pub mod session;
pub mod shelf;
pub mod tui;
