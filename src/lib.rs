//! Window layout for panel-based UIs.
//!
//! Panels are registered with a [`window::WindowManager`], docked into one
//! of a few exclusive [`layout::DockSlot`]s or floating freely. Positions
//! are CSS-like descriptors ([`layout::PositionDescriptor`]) resolved
//! against a caller-supplied viewport rectangle and clipped so panels stay
//! reachable.

pub mod config;
pub mod constants;
pub mod event_loop;
pub mod layout;
pub mod preview;
pub mod tracing_sub;
pub mod window;
