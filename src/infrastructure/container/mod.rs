//! Service locator module

pub mod error;
pub mod key;
pub mod locator;

use std::fmt;

pub use error::{BoxError, LocatorError};
pub use key::ServiceKey;
pub use locator::{LocatorStats, ServiceLocator};

/// Entry variant kept at module level so errors and descriptors can share it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Deferred construction, memoized after the first resolve
    Factory,
    /// Pre-built instance supplied at registration
    Singleton,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Factory => f.write_str("factory"),
            EntryKind::Singleton => f.write_str("singleton"),
        }
    }
}

/// Lifecycle of a single identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unregistered,
    /// Factory registered, not yet constructed
    Uninitialized,
    Initialized,
}

/// Snapshot of one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub key: ServiceKey,
    pub kind: EntryKind,
    pub state: EntryState,
    /// `type_name::<T>()` of the registered contract
    pub type_name: &'static str,
}
