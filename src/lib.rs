pub mod config;
pub mod content;
pub mod db;
pub mod i18n;
pub mod menu;
pub mod packs;
pub mod retry;
pub mod security;
pub mod server;
