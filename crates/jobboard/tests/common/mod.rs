//! Shared test utilities for jobboard integration tests.
//!
//! This module provides:
//! - `FakeJobService`, an in-memory `JobService` that records every call
//! - Record builders for seeding boards
//! - `CannedServer`, a minimal HTTP server answering with scripted responses

#![allow(unused_imports)]

pub mod builders;
pub mod fake;
pub mod server;

pub use builders::*;
pub use fake::{Call, FakeJobService};
pub use server::{CannedServer, CapturedRequest};
