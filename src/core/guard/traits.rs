/*!
 * Guard Traits
 *
 * Core abstraction for RAII critical-section scopes
 */

use super::GuardResult;

/// Core guard trait
///
/// All scopes implement this to provide:
/// - Resource type identification
/// - Manual early release
///
/// A released guard does nothing on drop, so every exit path leaves the
/// nesting counters balanced whether or not `release` was called.
pub trait Guard {
    /// Resource type name for logging/debugging
    fn resource_type(&self) -> &'static str;

    /// Check if guard is still active
    fn is_active(&self) -> bool;

    /// Manually release the scope
    ///
    /// Returns `Err` if already released
    fn release(&mut self) -> GuardResult<()>;
}
