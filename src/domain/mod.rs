//! Core domain types and logic.

pub mod aggregate;
pub mod config_validation;
pub mod correlation;
pub mod dashboard;
pub mod error;
pub mod price;
pub mod returns;
pub mod sector;
pub mod universe;
