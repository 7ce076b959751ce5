//! Ticket submission channels.
//!
//! The orchestrator hands finished remediation tickets to a
//! [`decoywatch_enrich::TicketSubmitter`]; this crate provides the GitHub
//! issues implementation.

mod github;

pub use github::GithubSubmitter;
