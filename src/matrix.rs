// Copyright (C) 2020-2026 Andy Kurnia.

// A lane is one row (across) or one column (down) of a row-major board.
#[derive(Clone, Copy)]
pub struct Strider {
    base: i16,
    step: i8,
    len: i8,
}

impl Strider {
    #[inline(always)]
    pub fn len(&self) -> i8 {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn at(&self, idx: i8) -> usize {
        ((self.base as isize) + (idx as isize) * (self.step as isize)) as usize
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Dim {
    pub rows: i8,
    pub cols: i8,
}

impl Dim {
    #[inline(always)]
    pub fn across(&self, row: i8) -> Strider {
        Strider {
            base: (row as i16) * (self.cols as i16),
            step: 1,
            len: self.cols,
        }
    }

    #[inline(always)]
    pub fn down(&self, col: i8) -> Strider {
        Strider {
            base: col as i16,
            step: self.cols,
            len: self.rows,
        }
    }

    #[inline(always)]
    pub fn lane(&self, down: bool, lane: i8) -> Strider {
        if down {
            self.down(lane)
        } else {
            self.across(lane)
        }
    }

    // number of lanes in that orientation.
    #[inline(always)]
    pub fn lanes(&self, down: bool) -> i8 {
        if down { self.cols } else { self.rows }
    }

    #[inline(always)]
    pub fn at_row_col(&self, row: i8, col: i8) -> usize {
        (((row as isize) * (self.cols as isize)) + (col as isize)) as usize
    }

    // (row, col) of idx along a lane.
    #[inline(always)]
    pub fn row_col(&self, down: bool, lane: i8, idx: i8) -> (i8, i8) {
        if down { (idx, lane) } else { (lane, idx) }
    }

    #[inline(always)]
    pub fn area(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_cover_the_board() {
        let dim = Dim { rows: 3, cols: 4 };
        assert_eq!(dim.area(), 12);
        let across = dim.across(2);
        assert_eq!((across.at(0), across.at(3)), (8, 11));
        let down = dim.down(1);
        assert_eq!((down.at(0), down.at(2)), (1, 9));
        assert_eq!(dim.lanes(true), 4);
        assert_eq!(dim.row_col(true, 1, 2), (2, 1));
        assert_eq!(dim.at_row_col(2, 1), down.at(2));
    }
}
