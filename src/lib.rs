pub mod ai;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod git;
pub mod processing;
pub mod template;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;
