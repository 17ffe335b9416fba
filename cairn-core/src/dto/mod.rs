//! Data Transfer Objects for scheduler communication
//!
//! DTOs mirror the scheduler's wire format and are kept free of client logic.

pub mod job;
