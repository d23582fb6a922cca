use crate::Error;

/// Dense row-major grid of cells addressed by `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }

    /// Signed lookup; negative or overflowing indices yield `None`.
    pub fn get_signed(&self, x: isize, y: isize) -> Option<&T> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }
}

impl<T: Clone> Grid<T> {
    /// Zero-sized dimensions are allowed and produce an empty grid.
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.saturating_mul(height);
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::Grid;
    use crate::Error;

    #[test]
    fn indexing_is_row_major() {
        let g = Grid::from_vec(3, 2, vec![1u8, 2, 3, 4, 5, 6]).expect("valid grid");

        assert_eq!(g.row(0), &[1, 2, 3]);
        assert_eq!(g.row(1), &[4, 5, 6]);
        assert_eq!(g.get(0, 1), Some(&4));
        assert_eq!(g.get(3, 0), None);
        assert_eq!(g.get_signed(-1, 0), None);
        assert_eq!(g.get_signed(2, 1), Some(&6));
    }

    #[test]
    fn size_mismatch_is_reported() {
        let err = Grid::from_vec(2, 2, vec![0.0f32; 3]).expect_err("wrong length");
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn fill_and_mutate() {
        let mut g = Grid::new_fill(2, 2, 0.0f32);
        *g.get_mut(1, 1).expect("in bounds") = 3.5;
        assert_eq!(g.data(), &[0.0, 0.0, 0.0, 3.5]);

        g.fill(1.0);
        assert!(g.data().iter().all(|&v| v == 1.0));

        let empty = Grid::new_fill(0, 5, 0u8);
        assert!(empty.is_empty());
    }
}
