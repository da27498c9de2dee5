//! Shared foundation for the bridge workspace.
//!
//! This crate carries the concerns common to every other `bridge-*` crate
//! that aren't worth their own crate:
//!
//! - **config**: environment-driven paths and tunables (state dir, agent
//!   CLI config dir, idle/edit/rollover timeouts).
//! - **redaction**: the secret-redaction pass the Progress Renderer applies
//!   to displayed tool-input summaries.
//! - **content_type**: magic-byte sniffing and text-extension tables shared
//!   by the Attachment Processor.

pub mod config;
pub mod content_type;
pub mod redaction;

pub use redaction::Redactor;
