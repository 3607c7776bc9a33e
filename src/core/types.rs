/*!
 * Core Types
 * Common types used across the kernel
 */

/// Thread priority (0-255, lower is more urgent)
pub type Priority = u8;

/// Party count of a barrier
pub type Count = u32;

/// Node number in a (potentially) multi-node system
pub type Node = u8;

/// Pool index of an object (1-based, 0 is never allocated)
pub type ObjectIndex = u16;
