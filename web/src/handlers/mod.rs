//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain.

pub mod coupons;
pub mod health;
pub mod orders;

pub use health::health_check;
