//! phrasedrill-core — Adaptive drill engine, question model, and records.
//!
//! This crate holds everything a drill needs apart from the terminal: the
//! corpus loader, the per-item performance records, the weighted scheduler
//! and the session that ties them together through an [`traits::AnswerSource`].

pub mod config;
pub mod corpus;
pub mod error;
pub mod mock;
pub mod model;
pub mod question;
pub mod records;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod statistics;
pub mod traits;
