//! Honeytrap - Conversational Scam Honeypot Service
//!
//! This crate implements a decoy conversation engine: incoming scammer
//! messages are classified, engaged by a believable persona, and mined for
//! actionable intelligence that is reported to an external evaluator.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
