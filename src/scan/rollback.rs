//! Control outcomes of a visit: rollback requests and faults.
//!
//! A handler either completes (`Ok(())`) or interrupts its frame. A [`Rollback`] travels up the chain of `scan`
//! frames until it reaches the frame whose node is its target; a [`Fault`] is absorbed by the innermost frame and
//! turned into an internal-error diagnostic.

use std::any::Any;
use std::fmt;

use ferry_syntax::Node;
use thiserror::Error;

use super::Scanner;

/// Result of visiting one node.
pub type Visit<'a, P> = Result<(), Interrupt<'a, P>>;

/// Continuation run once a rollback lands on its target. Receives the pass, the scanner (whose stack ends with the
/// target) and the target itself.
pub type RollbackCallback<'a, P> = Box<dyn FnOnce(&mut P, &mut Scanner<'a>, Node<'a>) -> Visit<'a, P> + 'a>;

/// Why a visit did not complete.
pub enum Interrupt<'a, P> {
    Rollback(Rollback<'a, P>),
    Fault(Fault),
}

impl<'a, P> From<Rollback<'a, P>> for Interrupt<'a, P> {
    fn from(rollback: Rollback<'a, P>) -> Self {
        Interrupt::Rollback(rollback)
    }
}

impl<P> From<Fault> for Interrupt<'_, P> {
    fn from(fault: Fault) -> Self {
        Interrupt::Fault(fault)
    }
}

impl<P> fmt::Debug for Interrupt<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interrupt::Rollback(rollback) => f.debug_tuple("Rollback").field(rollback).finish(),
            Interrupt::Fault(fault) => f.debug_tuple("Fault").field(fault).finish(),
        }
    }
}

/// A request to abandon everything scanned below `target` and resume at `target`'s frame.
pub struct Rollback<'a, P> {
    target: Node<'a>,
    on_rollbacked: Option<RollbackCallback<'a, P>>,
}

impl<'a, P> Rollback<'a, P> {
    pub fn new(target: Node<'a>) -> Self {
        Self {
            target,
            on_rollbacked: None,
        }
    }

    pub fn with_callback<F>(target: Node<'a>, on_rollbacked: F) -> Self
    where
        F: FnOnce(&mut P, &mut Scanner<'a>, Node<'a>) -> Visit<'a, P> + 'a,
    {
        Self {
            target,
            on_rollbacked: Some(Box::new(on_rollbacked)),
        }
    }

    pub fn target(&self) -> Node<'a> {
        self.target
    }

    pub(crate) fn into_callback(self) -> Option<RollbackCallback<'a, P>> {
        self.on_rollbacked
    }
}

impl<P> fmt::Debug for Rollback<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rollback")
            .field("target", &self.target)
            .field("has_callback", &self.on_rollbacked.is_some())
            .finish()
    }
}

/// Roll back to `target`. Never succeeds; return the result from the handler.
pub fn rollback<'a, P>(target: Node<'a>) -> Visit<'a, P> {
    Err(Interrupt::Rollback(Rollback::new(target)))
}

/// Roll back to `target`, then run `on_rollbacked` in the target's frame.
pub fn rollback_with<'a, P, F>(target: Node<'a>, on_rollbacked: F) -> Visit<'a, P>
where
    F: FnOnce(&mut P, &mut Scanner<'a>, Node<'a>) -> Visit<'a, P> + 'a,
{
    Err(Interrupt::Rollback(Rollback::with_callback(target, on_rollbacked)))
}

/// A handler failure. Reported as an internal error at the node being scanned; the subtree yields no output.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{0}")]
    Message(String),
    #[error("handler panicked: {0}")]
    Panic(String),
    #[error(transparent)]
    Error(Box<dyn std::error::Error + Send + Sync>),
}

impl Fault {
    pub fn msg(message: impl Into<String>) -> Self {
        Fault::Message(message.into())
    }

    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Fault::Error(Box::new(error))
    }

    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Fault::Panic(message)
    }
}
