//! Viewport scroll-and-zoom controller for the collaborative whiteboard.
//!
//! The board is rendered inside a scrollable container. This crate keeps the
//! container's scroll offset and the board zoom level in sync with the rest of
//! the front-end: it tracks native scroll events, restores and persists the
//! per-board viewport, derives the visible rectangle in board-document units,
//! and interprets global wheel events (cursor-anchored zoom and trackpad
//! detection). The host layer is responsible only for wiring DOM events and
//! timers to the [`controller::ViewportController`] entry points.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Lifecycle object wiring the parts below together |
//! | [`scroll`] | Scroll position tracker for the scroll container |
//! | [`persist`] | Per-board snapshot restore and debounced persistence |
//! | [`visible`] | Visible-rectangle derivation in document units |
//! | [`wheel`] | Wheel-gesture classifier (zoom and trackpad heuristic) |
//! | [`signal`] | Minimal observer cells shared with the rest of the app |
//! | [`zoom`] | Clamped zoom level cell |
//! | [`controls`] | Mouse/trackpad control settings |
//! | [`snapshot`] | Stored `{x, y, zoom}` record and its storage key |
//! | [`storage`] | Key-value store abstraction and in-memory store |
//! | [`surface`] | Element and native listener abstractions |
//! | [`coords`] | Pixel/document coordinate collaborator |
//! | [`debounce`] | Trailing-edge debounce timer |
//! | [`clock`] | Millisecond clock driving debounce deadlines |
//! | [`geometry`] | Points, rectangles, scroll offsets |
//! | [`config`] | Tunables with environment overrides |
//! | [`consts`] | Shared numeric constants (zoom limits, debounce delay, etc.) |
//! | `web` | `localStorage` store, browser clock, `setTimeout` tick scheduler (`web` feature) |

pub mod clock;
pub mod config;
pub mod consts;
pub mod controller;
pub mod controls;
pub mod coords;
pub mod debounce;
pub mod geometry;
pub mod persist;
pub mod scroll;
pub mod signal;
pub mod snapshot;
pub mod storage;
pub mod surface;
pub mod visible;
#[cfg(feature = "web")]
pub mod web;
pub mod wheel;
pub mod zoom;

#[cfg(test)]
mod testing;

pub use controller::{ViewportController, ViewportDeps};
pub use geometry::{Point, Rect, ScrollPosition};
