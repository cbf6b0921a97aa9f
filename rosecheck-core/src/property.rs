//! Properties: user predicates lifted into trial generators.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::gen::Gen;

/// What a single trial observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Pass,
    Fail,
    /// The predicate panicked; the payload message is kept. A panic is
    /// a failure and shrinks like one.
    Panic(String),
}

impl TrialOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TrialOutcome::Pass)
    }
}

/// One property evaluation on one generated input.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial<T> {
    pub args: T,
    pub outcome: TrialOutcome,
}

/// A property is itself a generator: it produces trees of trials whose
/// shrinks re-evaluate the predicate on smaller inputs.
pub struct Property<T> {
    trials: Gen<Trial<T>>,
}

impl<T: Clone + 'static> Property<T> {
    /// Check a predicate against generated inputs. Panics inside the
    /// predicate are caught and treated as failures.
    pub fn for_all<F>(args: Gen<T>, predicate: F) -> Property<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        let trials = args.map(move |value| {
            let outcome = match catch_unwind(AssertUnwindSafe(|| predicate(value))) {
                Ok(true) => TrialOutcome::Pass,
                Ok(false) => TrialOutcome::Fail,
                Err(payload) => TrialOutcome::Panic(panic_message(payload)),
            };
            Trial {
                args: value.clone(),
                outcome,
            }
        });
        Property { trials }
    }

    /// The underlying trial generator.
    pub fn trials(&self) -> &Gen<Trial<T>> {
        &self.trials
    }
}

/// Create a property that checks a boolean condition.
pub fn for_all<T, F>(args: Gen<T>, predicate: F) -> Property<T>
where
    T: Clone + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(args, predicate)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
