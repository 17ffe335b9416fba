//! Core domain types
//!
//! These types are shared between the scheduler client (which resolves them)
//! and the CLI (which prints them).

pub mod job;
