//! HTTP request handlers

pub mod dispatch;
pub mod stats;
pub mod tracking;
