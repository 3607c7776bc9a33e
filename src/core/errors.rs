/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification callers use to pick a recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Programming error: bad identifier, attribute, count or name
    InvalidArgument,
    /// Capacity-planning signal: a pool has no free slots
    ResourceExhausted,
    /// Transient: retry later
    Busy,
    /// Programming error: caller already owns the lock
    Deadlock,
    /// Caller released a lock held by someone else
    NotOwner,
    /// Operation is not legal from the current execution context
    IllegalContext,
}

/// Synchronization core errors with serialization support
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Diagnostic)]
#[serde(tag = "error_type", rename_all = "snake_case")]
pub enum SyncError {
    #[error("Identifier does not name a live object")]
    #[diagnostic(
        code(sync::invalid_id),
        help("The object may have been destroyed or never initialized.")
    )]
    InvalidId,

    #[error("Invalid attribute object")]
    #[diagnostic(
        code(sync::invalid_attribute),
        help("Initialize the attribute object and use a process-private sharing mode.")
    )]
    InvalidAttribute,

    #[error("Invalid count")]
    #[diagnostic(
        code(sync::invalid_count),
        help("A barrier needs a party count of at least one.")
    )]
    InvalidCount,

    #[error("Invalid object name")]
    #[diagnostic(
        code(sync::invalid_name),
        help("Object names must be non-zero and must name a live object.")
    )]
    InvalidName,

    #[error("Object was deleted while the caller was blocked on it")]
    #[diagnostic(code(sync::object_deleted))]
    ObjectDeleted,

    #[error("Object pool exhausted")]
    #[diagnostic(
        code(sync::resource_exhausted),
        help("Raise the configured maximum for this object class or destroy unused objects.")
    )]
    ResourceExhausted,

    #[error("Object is busy")]
    #[diagnostic(code(sync::busy), help("The object is held or has waiters. Retry later."))]
    Busy,

    #[error("Deadlock: caller already owns the lock")]
    #[diagnostic(
        code(sync::deadlock),
        help("Spinlocks are not recursive. Release the lock before acquiring it again.")
    )]
    Deadlock,

    #[error("Caller does not own the lock")]
    #[diagnostic(code(sync::not_owner))]
    NotOwner,

    #[error("Operation not permitted from interrupt context")]
    #[diagnostic(
        code(sync::called_from_interrupt),
        help("Interrupt handlers must not block. Enable isr_spinlocks for interrupt-context spinlocks.")
    )]
    CalledFromInterrupt,
}

impl SyncError {
    /// Coarse error classification
    pub const fn kind(&self) -> ErrorKind {
        match self {
            SyncError::InvalidId
            | SyncError::InvalidAttribute
            | SyncError::InvalidCount
            | SyncError::InvalidName
            | SyncError::ObjectDeleted => ErrorKind::InvalidArgument,
            SyncError::ResourceExhausted => ErrorKind::ResourceExhausted,
            SyncError::Busy => ErrorKind::Busy,
            SyncError::Deadlock => ErrorKind::Deadlock,
            SyncError::NotOwner => ErrorKind::NotOwner,
            SyncError::CalledFromInterrupt => ErrorKind::IllegalContext,
        }
    }

    /// POSIX errno for this error
    pub fn errno(&self) -> Errno {
        match self.kind() {
            ErrorKind::InvalidArgument => Errno::EINVAL,
            ErrorKind::ResourceExhausted => Errno::EAGAIN,
            ErrorKind::Busy => Errno::EBUSY,
            ErrorKind::Deadlock => Errno::EDEADLK,
            ErrorKind::NotOwner | ErrorKind::IllegalContext => Errno::EPERM,
        }
    }
}

/// Result type for synchronization core operations
pub type Result<T> = std::result::Result<T, SyncError>;
