#![forbid(unsafe_code)]

pub mod append;
pub mod blocks;
pub mod check;
pub mod classify;
pub mod cli;
pub mod config;
pub mod convert;
pub mod logging;
pub mod normalize;
pub mod notion;
pub mod resolve;
pub mod save;
pub mod state;
