//! Internal modules for fitch

pub mod config;
#[macro_use]
pub mod macros;
pub mod output;
pub mod sentence;
pub mod context;
pub mod proof;
pub mod fitch;
pub mod input;
pub mod parser;
pub mod derivation;
pub mod report;
