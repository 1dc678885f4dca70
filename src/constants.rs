// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API group served by the terraform operator
pub const GROUP: &str = "terraform-operator.cattle.io";

/// API version of every kind in the group
pub const VERSION: &str = "v1";

/// Media type used when a connection config does not name one
pub const DEFAULT_SERIALIZER: &str = "application/json";

/// Prefix for finalizers added by lifecycle handlers
pub const FINALIZER_PREFIX: &str = "terraform-operator.cattle.io/";

/// Condition type that marks a resource as ready
pub const READY_CONDITION: &str = "Ready";

/// Controller tuning
pub mod controller {
    /// Seconds before an object whose handler failed is reconciled again
    pub const ERROR_REQUEUE_SECS: u64 = 60;
    /// Worker count when none is configured
    pub const DEFAULT_THREADINESS: usize = 2;
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRDs
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
