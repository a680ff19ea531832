//! API module for Microsoft Graph interactions

mod client;
mod users;

pub use client::GraphClient;
