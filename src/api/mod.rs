//! Job search and country-info API access.
//!
//! This module provides the HTTP client together with the response cache
//! and rate limiter that guard it.

pub mod adzuna;
pub mod cache;
pub mod client;
pub mod rate_limit;

pub use client::{ClientConfig, JobMarketClient};
