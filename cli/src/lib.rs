//! # hitodo
//!
//! Command-line host for `hitodo-core`. It owns the network side of the
//! host-does-IO split: [`transport::UreqTransport`] executes the requests the
//! core builds, and [`cli`] maps subcommands onto application-root actions.

pub mod cli;
pub mod transport;
