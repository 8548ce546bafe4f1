#![allow(dead_code)]

//! Shared test utilities for hitline integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
