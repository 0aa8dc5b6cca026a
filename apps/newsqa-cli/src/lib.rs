//! Shared helpers for the newsqa demo binaries.

pub mod corpus;
