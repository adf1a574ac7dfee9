//! Last-in-first-out cleanup actions with guaranteed execution.
//!
//! Automation code acquires things in order (an application instance, then a
//! document inside it) and must release them in the opposite order. Each
//! acquisition registers a release action here; the stack runs them
//! newest-first either when [`CleanupStack::finish`] is called or, on early
//! return and unwinding, when the stack is dropped.

use std::fmt;

type Action<'a, E> = Box<dyn FnOnce() -> Result<(), E> + 'a>;

pub struct CleanupStack<'a, E: fmt::Display> {
    actions: Vec<(String, Action<'a, E>)>,
}

impl<'a, E: fmt::Display> CleanupStack<'a, E> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register an action. It will run before every action registered earlier.
    pub fn push(&mut self, label: impl Into<String>, action: impl FnOnce() -> Result<(), E> + 'a) {
        let label = label.into();
        tracing::debug!("Cleanup registered: {label}");
        self.actions.push((label, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every registered action, newest first.
    ///
    /// All actions are attempted even if one fails; the first failure is
    /// returned.
    pub fn finish(mut self) -> Result<(), E> {
        let mut first_error = None;
        while let Some((label, action)) = self.actions.pop() {
            tracing::debug!("Cleanup: {label}");
            if let Err(e) = action() {
                tracing::warn!("Cleanup '{label}' failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<'a, E: fmt::Display> Default for CleanupStack<'a, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E: fmt::Display> Drop for CleanupStack<'a, E> {
    fn drop(&mut self) {
        while let Some((label, action)) = self.actions.pop() {
            tracing::debug!("Cleanup (unwinding): {label}");
            if let Err(e) = action() {
                tracing::warn!("Cleanup '{label}' failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[test]
    fn test_runs_in_reverse_order() {
        let log = RefCell::new(Vec::new());
        let mut stack: CleanupStack<'_, String> = CleanupStack::new();
        stack.push("quit", || {
            log.borrow_mut().push("quit");
            Ok(())
        });
        stack.push("close", || {
            log.borrow_mut().push("close");
            Ok(())
        });
        assert_eq!(stack.len(), 2);

        stack.finish().unwrap();
        assert_eq!(*log.borrow(), vec!["close", "quit"]);
    }

    #[test]
    fn test_failure_does_not_stop_remaining_actions() {
        let log = RefCell::new(Vec::new());
        let mut stack: CleanupStack<'_, String> = CleanupStack::new();
        stack.push("first", || {
            log.borrow_mut().push("first");
            Err("first failed".to_string())
        });
        stack.push("second", || {
            log.borrow_mut().push("second");
            Err("second failed".to_string())
        });

        let err = stack.finish().unwrap_err();
        assert_eq!(err, "second failed");
        assert_eq!(*log.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn test_drop_runs_pending_actions() {
        let log = RefCell::new(Vec::new());
        {
            let mut stack: CleanupStack<'_, String> = CleanupStack::new();
            stack.push("a", || {
                log.borrow_mut().push("a");
                Ok(())
            });
            stack.push("b", || {
                log.borrow_mut().push("b");
                Ok(())
            });
        }
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn test_early_return_runs_actions() {
        let log = RefCell::new(Vec::new());

        let work = || -> Result<(), String> {
            let mut stack = CleanupStack::new();
            stack.push("release", || {
                log.borrow_mut().push("release");
                Ok(())
            });
            Err::<(), _>("boom".to_string())?;
            stack.finish()
        };

        assert_eq!(work().unwrap_err(), "boom");
        assert_eq!(*log.borrow(), vec!["release"]);
    }

    #[test]
    fn test_finish_runs_each_action_once() {
        let count = RefCell::new(0);
        let mut stack: CleanupStack<'_, String> = CleanupStack::new();
        stack.push("count", || {
            *count.borrow_mut() += 1;
            Ok(())
        });
        stack.finish().unwrap();
        assert_eq!(*count.borrow(), 1);
    }
}
