//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod channels;
pub mod evaluate;
pub mod rules;
pub mod test_send;

pub use channels::run_channels;
pub use evaluate::run_evaluate;
pub use rules::run_rules;
pub use test_send::run_test_send;
