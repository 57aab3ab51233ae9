//! storebot — WhatsApp storefront dialog bot.

pub mod config;
pub mod dialog;
pub mod error;
pub mod gateway;
pub mod store;
pub mod webhook;
