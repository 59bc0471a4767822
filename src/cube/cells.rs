use super::lattice::{Cell, Lattice};
use glam::Vec3;

/// Constants of the per-cell follow filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellDynamics {
    pub rate: f32,
    pub damping: f32,
    pub snap_epsilon: f32,
}

impl Default for CellDynamics {
    fn default() -> Self {
        Self {
            rate: 0.1,
            damping: 0.4,
            snap_epsilon: 0.01,
        }
    }
}

/// Current, previous and target position of every lattice cell.
#[derive(Debug, Clone)]
pub struct CellStore {
    lattice: Lattice,
    position: Vec<Vec3>,
    prev_position: Vec<Vec3>,
    target_position: Vec<Vec3>,
}

impl CellStore {
    /// Every cell resting on its own coordinate.
    pub fn identity(lattice: Lattice) -> Self {
        let mut position = vec![Vec3::ZERO; lattice.len()];
        for cell in lattice.cells() {
            if let Some(idx) = lattice.index(cell) {
                position[idx] = cell.home();
            }
        }
        Self {
            lattice,
            prev_position: position.clone(),
            target_position: position.clone(),
            position,
        }
    }

    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    pub fn position(&self, cell: Cell) -> Option<Vec3> {
        self.lattice.index(cell).map(|i| self.position[i])
    }

    pub fn prev_position(&self, cell: Cell) -> Option<Vec3> {
        self.lattice.index(cell).map(|i| self.prev_position[i])
    }

    pub fn target(&self, cell: Cell) -> Option<Vec3> {
        self.lattice.index(cell).map(|i| self.target_position[i])
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.position
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.target_position
    }

    /// Sets only the goal; the current motion carries on toward it.
    pub(crate) fn move_to(&mut self, cell: Cell, dst: Vec3) {
        let Some(idx) = self.lattice.index(cell) else {
            debug_assert!(false, "move_to outside lattice: {cell:?}");
            return;
        };
        self.target_position[idx] = dst;
    }

    /// Places the cell at `dst` with no residual motion.
    pub(crate) fn snap_to(&mut self, cell: Cell, dst: Vec3) {
        let Some(idx) = self.lattice.index(cell) else {
            debug_assert!(false, "snap_to outside lattice: {cell:?}");
            return;
        };
        self.position[idx] = dst;
        self.prev_position[idx] = dst;
        self.target_position[idx] = dst;
    }

    pub(crate) fn reset_identity(&mut self) {
        *self = Self::identity(self.lattice);
    }

    /// One tick of the damped follow filter for every cell.
    pub fn integrate(&mut self, dynamics: CellDynamics) {
        let damping = dynamics.damping;
        for ((s, p), t) in self
            .position
            .iter_mut()
            .zip(self.prev_position.iter_mut())
            .zip(self.target_position.iter())
        {
            let old = *s;
            for axis in 0..3 {
                s[axis] = follow(old[axis], p[axis], t[axis], dynamics.rate, damping, dynamics.snap_epsilon);
            }
            *p = old;
        }
    }

    /// Largest absolute coordinate over all current positions.
    pub fn max_abs_component(&self) -> f32 {
        self.position
            .iter()
            .map(|p| p.abs().max_element())
            .fold(0.0, f32::max)
    }

    pub fn all_settled(&self) -> bool {
        self.position
            .iter()
            .zip(self.prev_position.iter())
            .zip(self.target_position.iter())
            .all(|((s, p), t)| s == t && p == t)
    }
}

fn follow(s: f32, p: f32, t: f32, rate: f32, damping: f32, eps: f32) -> f32 {
    let v = s - p;
    let f = t - s;
    let n = if v.abs() + f.abs() < eps { t } else { s + rate * f + v };
    s * damping + n * (1.0 - damping)
}
