//! Production implementations of the collaborator traits

pub mod pacing;
pub mod personalizer;
pub mod sendgrid;

pub use pacing::{NoPacing, RandomizedPacing};
pub use personalizer::OutreachPersonalizer;
pub use sendgrid::SendGridMailer;
