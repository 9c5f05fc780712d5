pub mod configuration;
pub mod consent;
pub mod domain;
pub mod email_client;
pub mod export;
pub mod i18n;
pub mod models;
pub mod privacy;
pub mod routes;
pub mod startup;
pub mod stores;
pub mod telemetry;
pub mod tracking;
pub mod utils;
