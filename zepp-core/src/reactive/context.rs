//! Reactive Context
//!
//! The reactive context tracks which effect is currently running. This is
//! the "active effect slot": when a tracked property is read, the graph
//! asks the context which effect to record as the dependent.
//!
//! # Implementation
//!
//! We use a thread-local stack. Running an effect pushes it; the returned
//! guard pops it when dropped. Nested effects therefore restore the outer
//! effect when they finish, including when the inner body panics and the
//! guard is dropped during unwinding.
//!
//! An entry may also be empty: [`untrack`] pushes one so that reads inside
//! it are not attributed to any effect.

use std::cell::RefCell;

use super::effect::{Effect, EffectId};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<Option<Effect>>> = RefCell::new(Vec::new());
}

/// Guard that pops the context when dropped.
///
/// This ensures the context stack is properly maintained even if
/// the computation panics.
pub struct ReactiveContext {
    effect_id: Option<EffectId>,
}

impl ReactiveContext {
    /// Enter a new reactive context for the given effect.
    ///
    /// While this context is active, tracked reads register the effect as a
    /// dependent. The context is exited when the returned guard is dropped.
    pub fn enter(effect: Effect) -> Self {
        let effect_id = Some(effect.id());
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(Some(effect)));
        Self { effect_id }
    }

    /// Enter a context in which reads are not tracked.
    pub fn untracked() -> Self {
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(None));
        Self { effect_id: None }
    }

    /// Check if there is an active effect.
    pub fn is_active() -> bool {
        CONTEXT_STACK.with(|stack| matches!(stack.borrow().last(), Some(Some(_))))
    }

    /// Get the active effect, if any.
    pub fn current() -> Option<Effect> {
        CONTEXT_STACK.with(|stack| stack.borrow().last().cloned().flatten())
    }

    /// Get the ID of the active effect, if any.
    pub fn current_id() -> Option<EffectId> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .and_then(|entry| entry.as_ref().map(Effect::id))
        })
    }

    /// Number of entries on this thread's context stack.
    pub fn depth() -> usize {
        CONTEXT_STACK.with(|stack| stack.borrow().len())
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        // Taken out of the RefCell first: dropping an effect can run
        // destructors that look at the stack again.
        let popped = CONTEXT_STACK.with(|stack| stack.borrow_mut().pop());

        if let Some(entry) = &popped {
            debug_assert_eq!(
                entry.as_ref().map(Effect::id),
                self.effect_id,
                "ReactiveContext mismatch"
            );
        }

        drop(popped);
    }
}

/// Run `f` without tracking any reads it performs.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let _ctx = ReactiveContext::untracked();
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    fn idle_effect() -> Effect {
        Effect::new(|| {})
    }

    #[test]
    fn context_tracks_effect() {
        let effect = idle_effect();

        assert!(!ReactiveContext::is_active());
        assert!(ReactiveContext::current_id().is_none());

        {
            let _ctx = ReactiveContext::enter(effect.clone());

            assert!(ReactiveContext::is_active());
            assert_eq!(ReactiveContext::current_id(), Some(effect.id()));
        }

        // Context should be cleaned up after drop
        assert!(!ReactiveContext::is_active());
        assert!(ReactiveContext::current().is_none());
    }

    #[test]
    fn nested_contexts() {
        let outer = idle_effect();
        let inner = idle_effect();

        {
            let _ctx1 = ReactiveContext::enter(outer.clone());
            assert_eq!(ReactiveContext::current_id(), Some(outer.id()));

            {
                let _ctx2 = ReactiveContext::enter(inner.clone());
                assert_eq!(ReactiveContext::current_id(), Some(inner.id()));
            }

            // After inner context drops, outer should be current
            assert_eq!(ReactiveContext::current_id(), Some(outer.id()));
        }

        assert!(ReactiveContext::current_id().is_none());
        assert_eq!(ReactiveContext::depth(), 0);
    }

    #[test]
    fn untracked_hides_outer_effect() {
        let outer = idle_effect();
        let _ctx = ReactiveContext::enter(outer.clone());

        let seen = untrack(ReactiveContext::current_id);
        assert!(seen.is_none());
        assert_eq!(ReactiveContext::current_id(), Some(outer.id()));
    }

    #[test]
    fn context_is_restored_after_panic() {
        let outer = idle_effect();
        let inner = idle_effect();
        let _ctx = ReactiveContext::enter(outer.clone());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _inner_ctx = ReactiveContext::enter(inner.clone());
            panic!("body failed");
        }));

        assert!(result.is_err());
        assert_eq!(ReactiveContext::current_id(), Some(outer.id()));
        assert_eq!(ReactiveContext::depth(), 1);
    }
}
