//! Collaborator interfaces the agent consumes but does not implement.
//!
//! The consent flow and the visible-status surface live outside the core;
//! the pipeline only sees them through these traits. Host binaries (and
//! tests) supply the implementations.

/// A capability the platform may or may not have granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Access to the position feed and the radio's cell-info list
    Location,
}

/// Answers whether a capability grant currently holds.
///
/// Grants are obtained before the agent starts; the core never prompts.
/// A missing grant degrades the affected component to a silent no-op.
pub trait PermissionProvider: Send + Sync {
    fn granted(&self, capability: Capability) -> bool;
}

/// The visible indicator shown while a session is running.
///
/// `show` is called as the agent enters `Running`, `clear` as it stops.
pub trait StatusSurface: Send + Sync {
    fn show(&self);
    fn clear(&self);
}
