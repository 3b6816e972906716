//! Core balance engine for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and balance calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Split validation and pairwise/aggregate balance resolution
//! - `spending` - Calendar-year spending aggregation

pub mod ledger;
pub mod spending;
