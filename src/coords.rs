//! Pixel/document coordinate collaborator.
//!
//! The board view owns the conversion between on-screen pixels and
//! board-document units (it depends on font metrics and the zoom level) and
//! tracks the pointer. The controller only consumes it through this trait.

use crate::geometry::Point;

pub trait CoordinateHelper {
    /// Convert a pixel length to document units at the current zoom.
    fn px_to_doc(&self, px: f64) -> f64;

    /// Document coordinate currently under the pointer.
    fn cursor_doc_position(&self) -> Point;

    /// Scroll the container so that `doc` ends up under the pointer again.
    fn scroll_cursor_to(&self, doc: Point);
}
