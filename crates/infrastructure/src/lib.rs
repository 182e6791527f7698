//! Ferrous DoT Infrastructure Layer
pub mod dns;
