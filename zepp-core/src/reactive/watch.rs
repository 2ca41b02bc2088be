//! Change watcher.
//!
//! [`watch`] layers a `(new, old)` callback over an effect. The first run
//! only records the source's value; later runs call back when the value
//! differs from the recorded one under [`SameValue`].

use std::sync::Arc;

use parking_lot::Mutex;

use super::context::untrack;
use super::effect::Effect;
use crate::state::SameValue;

/// Call `callback(new, old)` whenever the value read by `source` changes.
///
/// Only `source` is tracked; reads inside the callback are not. The
/// returned effect keeps running until it is disposed.
pub fn watch<T, S, C>(source: S, callback: C) -> Effect
where
    T: SameValue + Clone + Send + Sync + 'static,
    S: Fn() -> T + Send + Sync + 'static,
    C: Fn(T, T) + Send + Sync + 'static,
{
    let baseline: Arc<Mutex<Option<T>>> = Arc::new(Mutex::new(None));
    let callback = Arc::new(callback);

    Effect::new(move || {
        let next = source();

        let previous = {
            let mut baseline = baseline.lock();
            if baseline
                .as_ref()
                .is_some_and(|previous| previous.same_value(&next))
            {
                return;
            }
            baseline.replace(next.clone())
        };

        if let Some(previous) = previous {
            let callback = Arc::clone(&callback);
            untrack(move || callback(next, previous));
        }
    })
}
