//! Analytical core of the Ls/Rs viewer.
//!
//! Everything in here is headless: the egui front-end in `main.rs` only calls
//! into [`session::Session`] and renders what it returns.

pub mod data;
pub mod error;
pub mod session;
pub mod settings;
pub mod units;

pub use data::model::Kind;
pub use error::AnalysisError;
pub use session::Session;
