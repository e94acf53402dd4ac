//! Typed response table backing a single client operation
//!
//! A `Stub<A, O>` maps the argument tuple `A` of one operation to the value `O`
//! that operation returns. Lookups try, in order:
//! - an exact response registered for the arguments,
//! - responders, in registration order (first `Some` wins),
//! - the default response.
//!
//! A call that matches nothing is a broken test setup and panics.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// Closure that may answer a call based on its arguments
pub type Responder<A, O> = Arc<dyn Fn(&A) -> Option<O> + Send + Sync>;

/// Conversion from borrowed call arguments into a stub key
///
/// Lets tests write `("default", "reviews")` where the key is `(String, String)`.
pub trait IntoArgs<A> {
    fn into_args(self) -> A;
}

impl<A> IntoArgs<A> for A {
    fn into_args(self) -> A {
        self
    }
}

impl IntoArgs<String> for &str {
    fn into_args(self) -> String {
        self.to_string()
    }
}

impl IntoArgs<(String, String)> for (&str, &str) {
    fn into_args(self) -> (String, String) {
        (self.0.to_string(), self.1.to_string())
    }
}

impl IntoArgs<(String, String, String)> for (&str, &str, &str) {
    fn into_args(self) -> (String, String, String) {
        (self.0.to_string(), self.1.to_string(), self.2.to_string())
    }
}

impl IntoArgs<(String, String, String, String)> for (&str, &str, &str, &str) {
    fn into_args(self) -> (String, String, String, String) {
        (
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
        )
    }
}

impl IntoArgs<(String, String, String, String, String)> for (&str, &str, &str, &str, &str) {
    fn into_args(self) -> (String, String, String, String, String) {
        (
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
            self.4.to_string(),
        )
    }
}

impl IntoArgs<(String, BTreeMap<String, String>)> for (&str, BTreeMap<String, String>) {
    fn into_args(self) -> (String, BTreeMap<String, String>) {
        (self.0.to_string(), self.1)
    }
}

impl IntoArgs<(String, String, String, Vec<String>)> for (&str, &str, &str, &[&str]) {
    fn into_args(self) -> (String, String, String, Vec<String>) {
        (
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.iter().map(|v| v.to_string()).collect(),
        )
    }
}

struct Table<A, O> {
    exact: HashMap<A, O>,
    responders: Vec<Responder<A, O>>,
    default: Option<O>,
    calls: Vec<A>,
}

impl<A, O> Default for Table<A, O> {
    fn default() -> Self {
        Self {
            exact: HashMap::new(),
            responders: Vec::new(),
            default: None,
            calls: Vec::new(),
        }
    }
}

/// Response slot and call log for one client operation
pub struct Stub<A, O> {
    operation: &'static str,
    table: Mutex<Table<A, O>>,
}

impl<A, O> Stub<A, O>
where
    A: Debug + Clone + Eq + Hash,
    O: Clone,
{
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            table: Mutex::new(Table::default()),
        }
    }

    /// Name of the operation this stub answers for
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    fn lock(&self) -> MutexGuard<'_, Table<A, O>> {
        // A panicking test thread must not hide the recorded calls from the next assertion.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return `output` whenever the operation is called with exactly `args`
    ///
    /// Registering the same arguments again replaces the previous response.
    pub fn returns(&self, args: impl IntoArgs<A>, output: O) -> &Self {
        let args = args.into_args();
        debug!(operation = self.operation, ?args, "registered stub response");
        self.lock().exact.insert(args, output);
        self
    }

    /// Answer calls whose arguments satisfy `predicate` with `output`
    pub fn returns_when<P>(&self, predicate: P, output: O) -> &Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        O: Send + Sync + 'static,
    {
        self.respond_with(move |args| predicate(args).then(|| output.clone()))
    }

    /// Compute the answer from the arguments; `None` defers to later rules
    pub fn respond_with<F>(&self, responder: F) -> &Self
    where
        F: Fn(&A) -> Option<O> + Send + Sync + 'static,
    {
        debug!(operation = self.operation, "registered stub responder");
        self.lock().responders.push(Arc::new(responder));
        self
    }

    /// Return `output` for any arguments not matched by a more specific rule
    pub fn returns_by_default(&self, output: O) -> &Self {
        debug!(operation = self.operation, "registered default stub response");
        self.lock().default = Some(output);
        self
    }

    /// Record a call and resolve its configured response
    ///
    /// # Panics
    ///
    /// Panics if nothing was configured for `args`.
    pub fn call(&self, args: A) -> O {
        match self.try_call(args.clone()) {
            Some(output) => output,
            None => {
                warn!(operation = self.operation, ?args, "unconfigured stub call");
                panic!(
                    "unexpected call to {}({:?}): no response configured",
                    self.operation, args
                );
            }
        }
    }

    /// Record a call and resolve its response, `None` when unconfigured
    pub fn try_call(&self, args: A) -> Option<O> {
        trace!(operation = self.operation, ?args, "stub call");
        let (exact, responders, default) = {
            let mut table = self.lock();
            table.calls.push(args.clone());
            (
                table.exact.get(&args).cloned(),
                table.responders.clone(),
                table.default.clone(),
            )
        };
        // Responders run without the lock held so they may consult other stubs.
        exact
            .or_else(|| responders.iter().find_map(|responder| responder(&args)))
            .or(default)
    }

    /// Whether any response rule has been registered
    pub fn is_configured(&self) -> bool {
        let table = self.lock();
        !table.exact.is_empty() || !table.responders.is_empty() || table.default.is_some()
    }

    /// Arguments of every call so far, oldest first
    pub fn calls(&self) -> Vec<A> {
        self.lock().calls.clone()
    }

    pub fn times_called(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn was_called_with(&self, args: impl IntoArgs<A>) -> bool {
        let args = args.into_args();
        self.lock().calls.iter().any(|call| *call == args)
    }

    /// # Panics
    ///
    /// Panics if the operation was not called exactly `expected` times.
    pub fn assert_called_times(&self, expected: usize) {
        let actual = self.times_called();
        assert_eq!(
            actual, expected,
            "expected {} to be called {} time(s), got {}",
            self.operation, expected, actual
        );
    }

    /// Forget every response rule and recorded call
    pub fn reset(&self) {
        *self.lock() = Table::default();
    }
}

impl<A, O> Debug for Stub<A, O>
where
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Stub")
            .field("operation", &self.operation)
            .field("responses", &table.exact.len())
            .field("responders", &table.responders.len())
            .field("has_default", &table.default.is_some())
            .field("calls", &table.calls)
            .finish()
    }
}
