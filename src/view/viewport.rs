use std::ops::Range;

/// The window of rows that fits on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Viewport { offset: 0, height }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Keep `selected` on screen, then keep the window inside the rows:
    /// `offset <= selected < offset + height` and
    /// `offset <= max(0, total - height)`.
    pub fn clamp(&mut self, selected: usize, total: usize) {
        if self.height == 0 {
            self.offset = 0;
            return;
        }
        let lowest = selected.saturating_sub(self.height - 1);
        self.offset = self.offset.clamp(lowest, selected);
        self.offset = self.offset.min(total.saturating_sub(self.height));
    }

    /// Row indices currently on screen
    pub fn visible(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        start..(self.offset + self.height).min(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn holds(vp: &Viewport, selected: usize, total: usize) -> bool {
        vp.offset() <= selected
            && selected < vp.offset() + vp.height()
            && vp.offset() <= total.saturating_sub(vp.height())
    }

    #[test]
    fn scrolls_down_just_enough() {
        let mut vp = Viewport::new(5);
        vp.clamp(4, 20);
        assert_eq!(vp.offset(), 0);
        vp.clamp(5, 20);
        assert_eq!(vp.offset(), 1);
        vp.clamp(12, 20);
        assert_eq!(vp.offset(), 8);
    }

    #[test]
    fn scrolls_up_just_enough() {
        let mut vp = Viewport::new(5);
        vp.clamp(12, 20);
        vp.clamp(10, 20);
        assert_eq!(vp.offset(), 8);
        vp.clamp(3, 20);
        assert_eq!(vp.offset(), 3);
    }

    #[test]
    fn never_scrolls_past_the_end() {
        let mut vp = Viewport::new(5);
        vp.clamp(19, 20);
        assert_eq!(vp.offset(), 15);
        // Rows shrank underneath us
        vp.clamp(6, 8);
        assert_eq!(vp.offset(), 3);
    }

    #[test]
    fn short_lists_stay_at_top() {
        let mut vp = Viewport::new(10);
        vp.clamp(3, 4);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible(4), 0..4);
    }

    #[test]
    fn resize_keeps_selection_visible() {
        let mut vp = Viewport::new(10);
        vp.clamp(9, 30);
        assert_eq!(vp.offset(), 0);
        vp.set_height(4);
        vp.clamp(9, 30);
        assert_eq!(vp.offset(), 6);
        assert_eq!(vp.visible(30), 6..10);
    }

    #[test]
    fn invariant_holds_for_every_selection() {
        for height in 1..8 {
            for total in 2..15 {
                let mut vp = Viewport::new(height);
                for selected in (1..total).chain((1..total).rev()) {
                    vp.clamp(selected, total);
                    assert!(holds(&vp, selected, total), "h={} t={} s={}", height, total, selected);
                }
            }
        }
    }
}
