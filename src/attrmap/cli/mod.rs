//! # CLI Layer
//!
//! A thin client over the library. This is the only place that knows about
//! stdout/stderr, exit codes and the tracing subscriber.
//!
//! - `commands.rs`: `run()`, context setup and the `handle_*()` functions
//! - `render.rs`: turns maps and schemas into aligned text

mod commands;
mod render;

pub use commands::run;
