/// Account balance and loan state, with its pure transition function.
pub mod account;

/// Root action type dispatched to the store.
pub mod action;

/// Turns loosely typed input into actions, or into deposits that still need a
/// currency conversion.
pub mod command;

pub mod config;

/// Exchange-rate lookups and the deposit coordinator that runs them.
pub mod conversion;

pub mod currency;

/// Customer slice and the greeting shown for it.
pub mod customer;

/// Store trait, slice helper, and the shared handle used by async code.
///
/// NOTE: only an in memory store exists; state lives for one session.
pub mod store;

/// Runs CSV action scripts. Used by the binary and the integration tests.
pub mod bin_utils;
