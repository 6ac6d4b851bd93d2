//! Visible-rectangle derivation.
//!
//! The visible rectangle is the part of the board currently on screen, in
//! board-document units. Renderers use it for culling and the minimap. It is
//! published through a [`Signal`], which only notifies when the rectangle
//! actually changes.

#[cfg(test)]
#[path = "visible_test.rs"]
mod visible_test;

use crate::coords::CoordinateHelper;
use crate::geometry::Rect;
use crate::signal::Signal;
use crate::surface::ElementRef;

/// Compute the on-screen part of the board from live element geometry.
///
/// Returns `None` until both the board and the scroll container are mounted.
pub fn derive_visible_rect(
    board: Option<&ElementRef>,
    viewport: Option<&ElementRef>,
    coords: &dyn CoordinateHelper,
) -> Option<Rect> {
    let board = board?.bounding_client_rect();
    let view = viewport?.bounding_client_rect();
    Some(Rect {
        x: coords.px_to_doc(view.x - board.x),
        y: coords.px_to_doc(view.y - board.y),
        width: coords.px_to_doc(view.width),
        height: coords.px_to_doc(view.height),
    })
}

/// Memoized, observable visible rectangle.
#[derive(Debug, Clone)]
pub struct VisibleRect {
    value: Signal<Option<Rect>>,
}

impl Default for VisibleRect {
    fn default() -> Self {
        Self { value: Signal::new(None) }
    }
}

impl VisibleRect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read geometry. Returns whether the published value changed.
    pub fn recompute(
        &self,
        board: Option<&ElementRef>,
        viewport: Option<&ElementRef>,
        coords: &dyn CoordinateHelper,
    ) -> bool {
        self.value.set(derive_visible_rect(board, viewport, coords))
    }

    pub fn get(&self) -> Option<Rect> {
        self.value.get()
    }

    /// Shared handle for consumers.
    pub fn signal(&self) -> Signal<Option<Rect>> {
        self.value.clone()
    }
}
