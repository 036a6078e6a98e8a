//! Command units and the dispatcher that runs them off the render thread.
//!
//! A [`Command`] is a deferred, one-shot unit of work yielding exactly one
//! [`Action`]. Pages and tabs build commands but never run them; the app
//! hands them to the [`Dispatcher`], which spawns each on the tokio worker
//! pool under a timeout and queues the resulting action back to the loop as
//! a [`Completion`].

pub mod admin;

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use kestrel_core::{AdminError, DEFAULT_TIMEOUT, Operation};

use crate::action::{Action, Notification};

/// One page instance. Rebuilding a page yields a new scope, so commands
/// left over from an earlier instance never block the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    pub page: &'static str,
    pub instance: Uuid,
}

impl Scope {
    /// A fresh instance of `page`.
    pub fn new(page: &'static str) -> Self {
        Self::of(page, Uuid::new_v4())
    }

    /// The instance of `page` identified by `instance`.
    pub fn of(page: &'static str, instance: Uuid) -> Self {
        Self { page, instance }
    }
}

/// Identifies one logical operation of one page instance.
///
/// At most one command per key is in flight at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub scope: Scope,
    pub operation: Operation,
}

/// A deferred unit of work producing exactly one [`Action`].
pub struct Command {
    operation: Option<Operation>,
    key: Option<TaskKey>,
    future: BoxFuture<'static, Action>,
}

impl Command {
    /// A command running one admin capability.
    pub fn new(operation: Operation, future: impl Future<Output = Action> + Send + 'static) -> Self {
        Self {
            operation: Some(operation),
            key: None,
            future: future.boxed(),
        }
    }

    /// A command that immediately yields `action`.
    ///
    /// This is how pages emit navigation, notifications and confirmations
    /// without touching anything outside their own state.
    pub fn perform(action: Action) -> Self {
        Self {
            operation: None,
            key: None,
            future: futures::future::ready(action).boxed(),
        }
    }

    /// Tag this command with `scope` so duplicates are dropped while it runs.
    ///
    /// Commands without an operation stay unkeyed.
    #[must_use]
    pub fn keyed(mut self, scope: Scope) -> Self {
        self.key = self.operation.map(|operation| TaskKey { scope, operation });
        self
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn key(&self) -> Option<TaskKey> {
        self.key
    }

    /// Run the command to completion on the current task.
    pub async fn run(self) -> Action {
        self.future.await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("operation", &self.operation)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// The result of a dispatched command, delivered to the render loop.
#[derive(Debug)]
pub struct Completion {
    pub key: Option<TaskKey>,
    pub action: Action,
}

/// Runs commands on the worker pool and tracks in-flight keys.
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Completion>,
    in_flight: HashSet<TaskKey>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Completion>) {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            tx,
            in_flight: HashSet::new(),
            timeout,
        };
        (dispatcher, rx)
    }

    /// Spawn `command`. Returns `false` if an identical keyed command is
    /// still running, in which case `command` is dropped unexecuted.
    pub fn dispatch(&mut self, command: Command) -> bool {
        let Command {
            operation,
            key,
            future,
        } = command;

        if let Some(key) = key {
            if !self.in_flight.insert(key) {
                debug!(page = key.scope.page, operation = %key.operation, "dropping duplicate command");
                return false;
            }
        }

        let tx = self.tx.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let action = match tokio::time::timeout(timeout, future).await {
                Ok(action) => action,
                Err(_) => timed_out(operation, timeout),
            };
            if tx.send(Completion { key, action }).is_err() {
                debug!("completion receiver dropped");
            }
        });
        true
    }

    pub fn dispatch_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }

    /// Release the completion's key and hand back its action.
    pub fn complete(&mut self, completion: Completion) -> Action {
        if let Some(key) = completion.key {
            self.in_flight.remove(&key);
        }
        completion.action
    }

    pub fn is_in_flight(&self, key: &TaskKey) -> bool {
        self.in_flight.contains(key)
    }
}

fn timed_out(operation: Option<Operation>, after: Duration) -> Action {
    match operation {
        Some(operation) => Action::error(operation, AdminError::timeout(after)),
        None => Action::Notify(Notification::error("command timed out")),
    }
}
