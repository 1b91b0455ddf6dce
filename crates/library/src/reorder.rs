//! Drag-to-reorder surface over the project list.
//!
//! Moving an item removes it from its source index and reinserts it at
//! the target index. [`DragSession`] tracks the pointer interaction that
//! produces such a move.

/// Return `items` with the element at `from` moved to `to`.
///
/// Returns `None` (no move) when `from == to` or either index is out of
/// range.
pub fn moved<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from == to || from >= items.len() || to >= items.len() {
        return None;
    }
    let mut updated = items.to_vec();
    let item = updated.remove(from);
    updated.insert(to, item);
    Some(updated)
}

/// State of one drag interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragSession {
    source: Option<usize>,
    over: Option<usize>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up the item at `index`.
    pub fn start(&mut self, index: usize) {
        self.source = Some(index);
        self.over = None;
    }

    /// The pointer moved over the item at `index`.
    pub fn hover(&mut self, index: usize) {
        if self.source.is_some() {
            self.over = Some(index);
        }
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn hovered(&self) -> Option<usize> {
        self.over
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Release over `target`. Ends the drag and returns the reordered
    /// sequence, or `None` if nothing was being dragged or nothing moved.
    pub fn drop_on<T: Clone>(&mut self, target: usize, items: &[T]) -> Option<Vec<T>> {
        let source = self.source.take();
        self.over = None;
        moved(items, source?, target)
    }

    /// Abandon the drag without moving anything.
    pub fn end(&mut self) {
        self.source = None;
        self.over = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_last_to_front() {
        assert_eq!(moved(&['A', 'B', 'C'], 2, 0), Some(vec!['C', 'A', 'B']));
    }

    #[test]
    fn move_front_to_last() {
        assert_eq!(moved(&['A', 'B', 'C'], 0, 2), Some(vec!['B', 'C', 'A']));
    }

    #[test]
    fn move_to_same_index_is_noop() {
        assert_eq!(moved(&['A', 'B'], 1, 1), None);
    }

    #[test]
    fn out_of_range_is_noop() {
        assert_eq!(moved(&['A', 'B'], 2, 0), None);
        assert_eq!(moved(&['A', 'B'], 0, 5), None);
        assert_eq!(moved::<char>(&[], 0, 0), None);
    }

    #[test]
    fn drop_without_drag_is_noop() {
        let mut drag = DragSession::new();
        assert_eq!(drag.drop_on(0, &['A', 'B']), None);
    }

    #[test]
    fn drop_ends_the_session() {
        let mut drag = DragSession::new();
        drag.start(2);
        drag.hover(1);
        assert_eq!(drag.hovered(), Some(1));
        assert_eq!(drag.drop_on(0, &['A', 'B', 'C']), Some(vec!['C', 'A', 'B']));
        assert!(!drag.is_active());
        assert_eq!(drag.hovered(), None);
    }

    #[test]
    fn drop_on_source_ends_the_session_without_moving() {
        let mut drag = DragSession::new();
        drag.start(1);
        assert_eq!(drag.drop_on(1, &['A', 'B', 'C']), None);
        assert!(!drag.is_active());
    }

    #[test]
    fn hover_without_drag_is_ignored() {
        let mut drag = DragSession::new();
        drag.hover(3);
        assert_eq!(drag.hovered(), None);
    }
}
