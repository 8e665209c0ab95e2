//! Command handlers for the CLI surface.
//!
//! One submodule per concern: daemon control, schedule editing, and the
//! one-shot brightness test.

pub mod control;
pub mod edit;
pub mod test;
