pub mod api;
pub mod config;
pub mod database_ops;
pub mod normalization;
pub mod query;
pub mod summary;
pub mod tracing;

pub mod util {
    pub mod db;
    pub mod env;
}
