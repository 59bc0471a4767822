use glam::Vec3;

/// Look-at target that eases toward a goal the scene moves around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDrift {
    target: Vec3,
    goal: Vec3,
    follow: f32,
}

impl Default for CameraDrift {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            goal: Vec3::ZERO,
            follow: 0.1,
        }
    }
}

impl CameraDrift {
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    pub fn set_goal(&mut self, goal: Vec3) {
        self.goal = goal;
    }

    /// Random walk of the goal, pulled back toward the origin by `decay`.
    pub fn nudge(&mut self, rng: &mut fastrand::Rng, amount: f32, decay: f32) {
        for axis in 0..3 {
            self.goal[axis] += amount * (rng.f32() - 0.5);
            self.goal[axis] *= decay;
        }
    }

    pub fn ease(&mut self) {
        self.target = self.target * (1.0 - self.follow) + self.goal * self.follow;
    }
}
