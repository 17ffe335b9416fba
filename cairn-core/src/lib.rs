//! Cairn Core
//!
//! Core types and abstractions shared by the Cairn scheduler tooling.
//!
//! This crate contains:
//! - Domain types: fully-qualified job keys
//! - DTOs: wire types of the scheduler's job query
//! - Sandbox: the worker-side sandbox directory layout and its discovery

pub mod domain;
pub mod dto;
pub mod sandbox;
