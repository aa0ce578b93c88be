//! Adapter implementations of the domain port traits.

pub mod sqlite;
