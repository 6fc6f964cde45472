//! The lib crate for a prefix-notation calculator language: a tree-walking interpreter,
//! a compiler to stack machine instructions, and the stack machine that runs them.
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]

/// Syntax trees and the operations every node supports.
pub mod ast;

/// Name to value bindings.
pub mod bindings;

/// Takes syntax trees and emits instruction text
pub mod compiler;

/// The error kinds.
pub mod error;

/// Runs syntax trees directly.
pub mod interpreter;

/// machine is the bits about running instructions.
pub mod machine;

/// Builds syntax trees from tokens.
pub mod parser;

pub use error::{Error, InternalError};

static TRACING_INIT: std::sync::Once = std::sync::Once::new();

/// Install a tracing subscriber for the binaries.
///
/// Only does anything when `RUST_LOG` is set, e.g. `RUST_LOG=arbor=trace`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
