use std::process::ExitCode;

use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
mod farewell;
pub mod library;
pub mod matcher;
pub mod review;
pub mod table;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run()
}
