//! Shared crate-wide constants.
//!
//! Geometry is measured in terminal cells; durations drive the launcher's
//! hover timers and the registry's idle sweep.

use std::time::Duration;

/// Smallest width any panel may be resized to, regardless of its catalog
/// minimum.
pub const PANEL_MIN_WIDTH: u16 = 16;

/// Smallest height any panel may be resized to, regardless of its catalog
/// minimum.
pub const PANEL_MIN_HEIGHT: u16 = 5;

/// Gap kept between a panel and the left, right and bottom viewport edges.
pub const VIEWPORT_PADDING: u16 = 1;

/// Rows at the top of the viewport reserved for the status band. Panels are
/// never placed above this band.
pub const RESERVED_TOP_BAND: u16 = 1;

/// Where the first auto-placed panel lands.
pub const CASCADE_ORIGIN: (i32, i32) = (4, 2);

/// Diagonal offset applied per already-open panel when auto-placing.
pub const CASCADE_STEP: (i32, i32) = (3, 2);

/// Width of the launcher while expanded.
pub const TOOLBAR_WIDTH: u16 = 26;

/// Width of the icon-only rail shown while the launcher is collapsed.
pub const TOOLBAR_RAIL_WIDTH: u16 = 5;

/// A toolbar released within this many columns of a viewport edge docks to it.
pub const DOCK_THRESHOLD: i32 = 3;

/// Width of the edge-adjacent column that counts as hovering a docked toolbar.
pub const HOVER_TRIGGER_WIDTH: u16 = 1;

/// Inactivity before a docked toolbar collapses to its rail.
pub const COLLAPSE_DELAY: Duration = Duration::from_millis(1500);

/// Hover time before a collapsed toolbar expands again.
pub const EXPAND_DELAY: Duration = Duration::from_millis(250);

/// Kinds closed for longer than this lose their usage history and remembered
/// geometry.
pub const IDLE_EVICTION_WINDOW: Duration = Duration::from_secs(30 * 60);

/// How often the deck runs the idle sweep.
pub const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Usage within this window counts as "recent" for priority purposes.
pub const RECENT_USE_WINDOW: Duration = Duration::from_secs(30 * 60);
