//! Scroll state: the top-left corner of the visible window in render
//! coordinates.

/// The viewport - which portion of the document is visible.
///
/// After [`Viewport::recompute`] the cursor's render position lies inside
/// `[offset, offset + window)` on both axes. Offsets move by the minimum
/// amount that restores that bound; a cursor already in view moves nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible document row.
    pub row_offset: usize,

    /// Left column offset (horizontal scroll position), in render columns.
    pub col_offset: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Viewport::default()
    }

    /// Clamp the offsets so `(row, render_col)` falls inside a
    /// `rows` x `cols` window.
    pub fn recompute(&mut self, row: usize, render_col: usize, rows: usize, cols: usize) {
        if row < self.row_offset {
            self.row_offset = row;
        }
        if rows > 0 && row >= self.row_offset + rows {
            self.row_offset = row - rows + 1;
        }
        if render_col < self.col_offset {
            self.col_offset = render_col;
        }
        if cols > 0 && render_col >= self.col_offset + cols {
            self.col_offset = render_col - cols + 1;
        }
    }

    /// Screen position of a render coordinate currently in view.
    pub fn to_screen(&self, row: usize, render_col: usize) -> (usize, usize) {
        (
            row.saturating_sub(self.row_offset),
            render_col.saturating_sub(self.col_offset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cursor_in_view_moves_nothing() {
        let mut vp = Viewport {
            row_offset: 10,
            col_offset: 5,
        };
        vp.recompute(12, 7, 24, 80);
        assert_eq!(vp.row_offset, 10);
        assert_eq!(vp.col_offset, 5);
    }

    #[test]
    fn scrolling_up_and_left_snaps_to_cursor() {
        let mut vp = Viewport {
            row_offset: 10,
            col_offset: 5,
        };
        vp.recompute(3, 2, 24, 80);
        assert_eq!(vp.row_offset, 3);
        assert_eq!(vp.col_offset, 2);
    }

    #[test]
    fn scrolling_down_and_right_moves_minimally() {
        let mut vp = Viewport::new();
        vp.recompute(24, 80, 24, 80);
        // One step past the window edge scrolls by exactly one.
        assert_eq!(vp.row_offset, 1);
        assert_eq!(vp.col_offset, 1);

        vp.recompute(100, 200, 24, 80);
        assert_eq!(vp.row_offset, 77);
        assert_eq!(vp.col_offset, 121);
    }

    #[test]
    fn to_screen_subtracts_offsets() {
        let vp = Viewport {
            row_offset: 7,
            col_offset: 3,
        };
        assert_eq!(vp.to_screen(9, 3), (2, 0));
    }

    proptest! {
        #[test]
        fn recompute_restores_bounds(
            start_row in 0usize..500,
            start_col in 0usize..500,
            row in 0usize..500,
            render_col in 0usize..500,
            rows in 1usize..200,
            cols in 1usize..200,
        ) {
            let mut vp = Viewport {
                row_offset: start_row,
                col_offset: start_col,
            };
            vp.recompute(row, render_col, rows, cols);
            prop_assert!(vp.row_offset <= row);
            prop_assert!(row < vp.row_offset + rows);
            prop_assert!(vp.col_offset <= render_col);
            prop_assert!(render_col < vp.col_offset + cols);
        }
    }
}
