//! Square grid of bits, one per module, addressed by linear index `y * size + x`.

use core::ops::BitXorAssign;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BitGrid {
    size: usize,
    words: Vec<u32>,
}

impl BitGrid {
    /// Creates an all-zero grid with the given side length.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            words: vec![0u32; (size * size + 31) / 32],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells, `size * size`.
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size);
        y * self.size + x
    }

    pub fn get(&self, index: usize) -> bool {
        (self.words[index >> 5] >> (index & 31)) & 1 != 0
    }

    pub fn set(&mut self, index: usize, value: bool) {
        let bit = 1u32 << (index & 31);
        if value {
            self.words[index >> 5] |= bit;
        } else {
            self.words[index >> 5] &= !bit;
        }
    }

    pub fn get_xy(&self, x: usize, y: usize) -> bool {
        self.get(self.index(x, y))
    }

    pub fn set_xy(&mut self, x: usize, y: usize, value: bool) {
        let index = self.index(x, y);
        self.set(index, value);
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl BitXorAssign<&BitGrid> for BitGrid {
    fn bitxor_assign(&mut self, rhs: &BitGrid) {
        assert_eq!(self.size, rhs.size, "Grid sizes differ");
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a ^= *b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_count() {
        let mut grid = BitGrid::new(21);
        assert_eq!(grid.len(), 441);
        grid.set_xy(20, 20, true);
        grid.set_xy(0, 1, true);
        grid.set(31, true);
        grid.set(32, true);
        assert!(grid.get_xy(20, 20));
        assert!(grid.get(21));
        assert_eq!(grid.count_ones(), 4);
        grid.set(31, false);
        assert!(!grid.get(31));
        assert_eq!(grid.count_ones(), 3);
    }

    #[test]
    fn test_xor_twice_restores() {
        let mut grid = BitGrid::new(25);
        let mut other = BitGrid::new(25);
        for i in (0..grid.len()).step_by(3) {
            grid.set(i, true);
        }
        for i in (0..other.len()).step_by(7) {
            other.set(i, true);
        }
        let before = grid.clone();
        grid ^= &other;
        assert_ne!(grid, before);
        grid ^= &other;
        assert_eq!(grid, before);
    }
}
