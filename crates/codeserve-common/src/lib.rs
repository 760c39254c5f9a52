//! # codeserve-common
//!
//! Shared constants, the launcher configuration model, and the domain
//! types describing the development container.
//!
//! This crate is the leaf of the dependency graph. The engine and runtime
//! crates build on the [`ContainerSpec`](types::ContainerSpec) and
//! [`EnvironmentFacts`](types::EnvironmentFacts) defined here.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
