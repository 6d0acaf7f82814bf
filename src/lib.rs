pub mod api;
pub mod config;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod expand;
pub mod optimizer;
pub mod schedule;
pub mod scorer;
pub mod slots;
