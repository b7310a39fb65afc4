pub mod config;
pub mod logging;

pub mod checksum;
pub mod classify;
pub mod error;
pub mod fetch;
pub mod filename;
pub mod http;
pub mod provider;
pub mod resolver;
pub mod share_link;
pub mod strategy;
pub mod table;
pub mod trail;
