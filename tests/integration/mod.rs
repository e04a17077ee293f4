//! Integration tests for the check pipeline
//!
//! Each test builds a small course tree in a temp directory and replaces the
//! Gradle wrapper with a shell script that prints canned build output.

#![cfg(unix)]

pub mod cancellation;
pub mod check_flow;
pub mod helpers;
pub mod run_flow;
