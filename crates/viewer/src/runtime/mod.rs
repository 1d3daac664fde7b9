//! Runtime host: logging init, config load, and the CLI consumer loop.

pub mod boot;
pub mod run;
