// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request-scoped values and cancellation passed to starters and handlers.

use http::Extensions;
use tokio_util::sync::CancellationToken;

/// Carries typed values and a cancellation token through the operator.
///
/// Values are keyed by type, so modules that store something here use a
/// private newtype to keep their entry out of reach of other modules.
#[derive(Clone, Debug, Default)]
pub struct Context {
    values: Extensions,
    token: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose background work stops when `token` is cancelled
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            values: Extensions::new(),
            token,
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Derive a new context that also carries `value`. The receiver is left untouched.
    pub(crate) fn with_value<T>(&self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut derived = self.clone();
        derived.values.insert(value);
        derived
    }

    pub(crate) fn value<T>(&self) -> Option<&T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.values.get::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Key(u32);

    #[test]
    fn test_with_value_does_not_touch_parent() {
        let parent = Context::new();
        let child = parent.with_value(Key(7));

        assert_eq!(child.value::<Key>(), Some(&Key(7)));
        assert!(parent.value::<Key>().is_none());
    }

    #[test]
    fn test_derived_context_shares_cancellation() {
        let parent = Context::new();
        let child = parent.with_value(Key(1));

        parent.cancel();
        assert!(child.is_cancelled());
    }
}
