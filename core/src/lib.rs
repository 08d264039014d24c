pub mod action;
pub mod assignment;
pub mod build;
pub mod config;
pub mod grade;
pub mod harness;
pub mod late;
pub mod process;
pub mod readme;
pub mod report;
pub mod sink;
pub mod vcs;

pub use crate::config::Config;
