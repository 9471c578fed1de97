//! Identity helper primitives shared by the storage adapters and the host.
//!
//! Everything in this crate is pure: no network, no storage, no global state.
//! Time comes from an injected [`clock::Clock`] and randomness from an
//! injected [`rand::Rng`].

pub mod clock;
pub mod config;
pub mod entity_keys;
pub mod error;
pub mod helper;
pub mod last_login;
pub mod token;
pub mod types;
