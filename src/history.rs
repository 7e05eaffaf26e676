use std::collections::VecDeque;

use crate::buffer::PixelBuffer;
use crate::session::Canvas;

/// Default number of snapshots kept per canvas.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Capacity-bounded stack of full-buffer snapshots. The oldest snapshot is
/// evicted once the capacity is exceeded; undo pops the newest.
#[derive(Clone, Debug)]
pub struct HistoryStack {
    snapshots: VecDeque<PixelBuffer>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY) + 1),
            capacity,
        }
    }

    /// Push `buffer` as the newest snapshot. Returns how many old snapshots
    /// were evicted to stay within capacity.
    pub fn push(&mut self, buffer: PixelBuffer) -> usize {
        self.snapshots.push_back(buffer);
        let mut evicted = 0;
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn pop(&mut self) -> Option<PixelBuffer> {
        self.snapshots.pop_back()
    }

    /// Drop every snapshot, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let n = self.snapshots.len();
        self.snapshots.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &PixelBuffer> {
        self.snapshots.iter()
    }
}

/// Independent undo stacks for the two editable canvases.
#[derive(Clone, Debug, Default)]
pub struct EditHistory {
    source: HistoryStack,
    simplified: HistoryStack,
}

impl EditHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            source: HistoryStack::new(capacity),
            simplified: HistoryStack::new(capacity),
        }
    }

    pub fn stack(&self, canvas: Canvas) -> &HistoryStack {
        match canvas {
            Canvas::Source => &self.source,
            Canvas::Simplified => &self.simplified,
        }
    }

    fn stack_mut(&mut self, canvas: Canvas) -> &mut HistoryStack {
        match canvas {
            Canvas::Source => &mut self.source,
            Canvas::Simplified => &mut self.simplified,
        }
    }

    /// Record `buffer` as the pre-edit state of `canvas`.
    pub fn snapshot(&mut self, canvas: Canvas, buffer: PixelBuffer) {
        let evicted = self.stack_mut(canvas).push(buffer);
        if evicted > 0 {
            log::debug!("{canvas} history full, evicted {evicted} oldest snapshot(s)");
        }
    }

    /// Most recent snapshot for `canvas`, or `None` when there is nothing to
    /// undo.
    pub fn undo(&mut self, canvas: Canvas) -> Option<PixelBuffer> {
        self.stack_mut(canvas).pop()
    }

    pub fn reset(&mut self, canvas: Canvas) -> usize {
        self.stack_mut(canvas).clear()
    }

    pub fn reset_all(&mut self) {
        self.source.clear();
        self.simplified.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use image::Rgba;

    fn marked(i: u8) -> PixelBuffer {
        PixelBuffer::from_colors(1, 1, &[Color::new(i, 0, 0)]).unwrap()
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut stack = HistoryStack::new(3);
        for i in 0..5 {
            stack.push(marked(i));
            assert!(stack.len() <= 3);
        }
        let survivors: Vec<u8> = stack.iter().map(|b| b.color_at(0, 0).r).collect();
        assert_eq!(survivors, [2, 3, 4]);
        assert_eq!(stack.pop().unwrap().color_at(0, 0).r, 4);
    }

    #[test]
    fn undo_restores_pre_mutation_state() {
        let mut history = EditHistory::new(DEFAULT_HISTORY_CAPACITY);
        let mut buf = PixelBuffer::filled(4, 4, Rgba([1, 2, 3, 255])).unwrap();
        let original = buf.clone();

        history.snapshot(Canvas::Simplified, buf.clone());
        buf.put_pixel(0, 0, Rgba([9, 9, 9, 255]));

        assert_eq!(history.undo(Canvas::Simplified), Some(original));
        assert_eq!(history.undo(Canvas::Simplified), None);
        assert_eq!(history.undo(Canvas::Simplified), None);
    }

    #[test]
    fn canvases_do_not_share_entries() {
        let mut history = EditHistory::new(2);
        history.snapshot(Canvas::Source, marked(1));
        history.snapshot(Canvas::Simplified, marked(2));
        history.snapshot(Canvas::Simplified, marked(3));
        history.snapshot(Canvas::Simplified, marked(4));

        assert_eq!(history.stack(Canvas::Source).len(), 1);
        assert_eq!(history.stack(Canvas::Simplified).len(), 2);
        assert_eq!(history.reset(Canvas::Simplified), 2);
        assert_eq!(history.reset(Canvas::Simplified), 0);
        assert_eq!(history.undo(Canvas::Source).unwrap().color_at(0, 0).r, 1);
    }

    #[test]
    fn pushed_snapshot_is_stored_as_given() {
        let mut stack = HistoryStack::new(2);
        let buf = PixelBuffer::filled(3, 2, Rgba([7, 8, 9, 255])).unwrap();
        let expected = buf.clone();
        assert_eq!(stack.push(buf), 0);
        assert_eq!(stack.iter().next(), Some(&expected));
    }
}
