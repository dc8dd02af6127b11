use crate::CellCoord;

/// Dense square grid of per-cell values stored row-major in a flat vector.
///
/// All accessors are bounds-checked: reads outside the grid yield `None` and
/// writes outside the grid are ignored, so probing adapters can never fault
/// the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    size: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a `size × size` grid with every cell set to `fill`.
    #[must_use]
    pub fn filled(size: u32, fill: T) -> Self {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size,
            cells: vec![fill; capacity],
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Returns a reference to the value stored at `cell`.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Returns a mutable reference to the value stored at `cell`.
    pub fn get_mut(&mut self, cell: CellCoord) -> Option<&mut T> {
        self.index(cell).and_then(|index| self.cells.get_mut(index))
    }

    /// Stores `value` at `cell`; out-of-range writes are ignored.
    pub fn set(&mut self, cell: CellCoord, value: T) {
        if let Some(slot) = self.get_mut(cell) {
            *slot = value;
        }
    }

    /// Iterates over every cell coordinate paired with its value, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(index, value)| {
            let index = index as u32;
            (CellCoord::new(index % size, index / size), value)
        })
    }

    /// Iterates over every value, row by row.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl<T: Copy> Grid<T> {
    /// Returns a copy of the value stored at `cell`.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<T> {
        self.get(cell).copied()
    }
}
