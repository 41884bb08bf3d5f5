//! # certgen-cli
//!
//! Command-line front end for the [`certgen`] provisioner.
//!
//! Run with no arguments to provision the current working directory, or
//! point it elsewhere with `--dir`. Repeated runs against a provisioned
//! directory are no-ops.

pub mod cli;

pub use cli::run;
