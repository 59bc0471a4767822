use glam::Vec3;

/// Integer coordinate of one cell in an N×N×N lattice.
///
/// Coordinates are signed so that neighbour probing (`±1` on one axis) can
/// step outside the lattice before being rejected by [`Lattice::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
    pub k: i32,
}

impl Cell {
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }

    pub fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.i,
            1 => self.j,
            _ => self.k,
        }
    }

    pub fn with_axis(self, axis: usize, v: i32) -> Self {
        match axis {
            0 => Self { i: v, ..self },
            1 => Self { j: v, ..self },
            _ => Self { k: v, ..self },
        }
    }

    /// Resting position of the cell (its own coordinate).
    pub fn home(self) -> Vec3 {
        Vec3::new(self.i as f32, self.j as f32, self.k as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    n: usize,
}

impl Lattice {
    pub fn new(n: usize) -> Self {
        Self { n: n.max(1) }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.n * self.n * self.n
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let n = self.n as i32;
        (0..n).contains(&cell.i) && (0..n).contains(&cell.j) && (0..n).contains(&cell.k)
    }

    /// Flat storage index, `None` outside the lattice.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let n = self.n;
        Some((cell.i as usize * n + cell.j as usize) + cell.k as usize * n * n)
    }

    /// All cells, `i` outermost and `k` innermost.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let n = self.n as i32;
        (0..n).flat_map(move |i| (0..n).flat_map(move |j| (0..n).map(move |k| Cell::new(i, j, k))))
    }

    /// Centre of the lattice in cell units (`N / 2`).
    pub fn center(&self) -> f32 {
        self.n as f32 * 0.5
    }
}
