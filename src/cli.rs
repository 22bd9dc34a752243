//! CLI domain: parse and route only. Navigation logic lives in the library.

mod parse;
mod route;

pub use parse::{Cli, Commands};
pub use route::RunContext;
