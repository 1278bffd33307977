//! Thread-safe accumulator for builds that compile in parallel.

use std::path::Path;
use std::process::ExitStatus;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::command::CompileCommand;
use crate::database::CompilationDatabase;
use crate::invocation::{Invocation, ProcessInvocation};
use crate::outcome::Outcome;

/// A [`CompilationDatabase`] behind a mutex.
///
/// Parallel compile workers record through `&self`; every [`add`](Self::add)
/// is serialized, so the append-only, order-of-arrival contract holds.
pub struct SharedDatabase {
    inner: Mutex<CompilationDatabase>,
}

impl SharedDatabase {
    /// Wraps an existing database.
    pub fn new(db: CompilationDatabase) -> Self {
        Self {
            inner: Mutex::new(db),
        }
    }

    /// Records one compiler invocation for `source`.
    pub fn add<I>(&self, source: impl AsRef<Path>, invocation: &I) -> Outcome
    where
        I: Invocation + ?Sized,
    {
        self.lock().add(source, invocation)
    }

    /// Records `invocation` and then runs it outside the lock.
    pub fn record_and_run(
        &self,
        source: impl AsRef<Path>,
        invocation: &ProcessInvocation,
    ) -> std::io::Result<ExitStatus> {
        self.add(source, invocation).log();
        invocation.run()
    }

    /// Appends previously recorded entries after the current ones.
    pub fn extend(&self, entries: impl IntoIterator<Item = CompileCommand>) {
        self.lock().extend(entries);
    }

    /// Writes the database to its bound file.
    pub fn save(&self) -> Outcome {
        self.lock().save()
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a snapshot of the recorded entries.
    pub fn entries(&self) -> Vec<CompileCommand> {
        self.lock().entries().to_vec()
    }

    /// Unwraps the database.
    pub fn into_inner(self) -> CompilationDatabase {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A panicking worker cannot leave a half-appended entry behind, so a
    // poisoned lock still guards a consistent log.
    fn lock(&self) -> MutexGuard<'_, CompilationDatabase> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<CompilationDatabase> for SharedDatabase {
    fn from(db: CompilationDatabase) -> Self {
        Self::new(db)
    }
}
