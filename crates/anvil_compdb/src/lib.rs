//! Compilation database recording for the Anvil build tool.
//!
//! This crate keeps an ordered, append-only log of every compiler invocation
//! made during a build and persists it as a `compile_commands.json` file in
//! the JSON Compilation Database format read by clangd and other
//! clang-tooling based indexers.
//!
//! Loading is fallible ([`DatabaseError`]); recording and saving are
//! best-effort and report problems through a non-fatal [`Outcome`] so that
//! bookkeeping failures never break a build.

#![warn(missing_docs)]

pub mod command;
pub mod database;
pub mod error;
pub mod invocation;
pub mod outcome;
pub mod shared;

pub use command::{CommandLine, CompileCommand};
pub use database::{record_and_run, CompilationDatabase, DATABASE_FILE};
pub use error::{DatabaseError, DatabaseWarning};
pub use invocation::{Invocation, ProcessInvocation};
pub use outcome::Outcome;
pub use shared::SharedDatabase;
