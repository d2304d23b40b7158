//! Thread-local execution context.
//!
//! # Responsibilities
//! - Track which shim environment the current thread is executing in
//! - Swap it for the duration of a delegate call and restore it afterwards
//!
//! # Design Decisions
//! - Thread-local, so concurrent connects never contend
//! - Restoration lives in `Drop`, so early returns and unwinding restore too

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

thread_local! {
    static CURRENT: RefCell<Option<Arc<ExecutionContext>>> = const { RefCell::new(None) };
}

/// Environment a delegate runs in while the router calls it.
#[derive(Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    name: String,
    shim_id: Option<String>,
}

impl ExecutionContext {
    pub fn new(name: impl Into<String>, shim_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            shim_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shim_id(&self) -> Option<&str> {
        self.shim_id.as_deref()
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shim_id {
            Some(id) => write!(f, "{}[{}]", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Context active on the calling thread, if any.
pub fn current() -> Option<Arc<ExecutionContext>> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Replace the calling thread's context, returning the previous one.
fn replace(next: Option<Arc<ExecutionContext>>) -> Option<Arc<ExecutionContext>> {
    CURRENT.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), next))
}

/// RAII guard that restores the previous context on drop.
#[derive(Debug)]
#[must_use = "the previous context is restored as soon as the guard is dropped"]
pub struct ContextGuard {
    previous: Option<Arc<ExecutionContext>>,
}

impl ContextGuard {
    /// Install `context` on the calling thread until the guard is dropped.
    pub fn enter(context: Arc<ExecutionContext>) -> Self {
        tracing::trace!(context = %context, "Entering execution context");
        Self {
            previous: replace(Some(context)),
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let entered = replace(self.previous.take());
        if let Some(ctx) = entered {
            tracing::trace!(context = %ctx, "Leaving execution context");
        }
    }
}
