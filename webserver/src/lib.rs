//! HTTP front end for the outreach dispatcher
//!
//! Hosts the three operations the front end needs from the core (submit
//! a recipient file, query the current quota, render statistics) plus
//! the tracking callbacks the sent messages point back at: open pixel,
//! click redirect, and unsubscribe.

pub mod error;
pub mod state;
pub mod web;

pub use error::{WebServerError, WebServerResult};
pub use state::AppState;
pub use web::router;
