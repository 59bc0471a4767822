use super::buffer::FieldBuffer;

/// Generations kept in the ring: one write slot plus a two-step history.
pub const RING_LEN: usize = 3;

/// Slot written at `tick`.
pub const fn next_index(tick: u64) -> usize {
    (tick % RING_LEN as u64) as usize
}

/// Slot holding the generation `n` ticks back from `tick` (`n` in `0..RING_LEN`).
pub const fn prior_index(tick: u64, n: usize) -> usize {
    let t = (tick % RING_LEN as u64) as usize;
    (t + RING_LEN - (n % RING_LEN)) % RING_LEN
}

#[derive(Debug, Clone)]
pub struct StateRing {
    slots: [FieldBuffer; RING_LEN],
}

impl StateRing {
    /// Every slot starts as a copy of `seed`.
    pub fn seeded(seed: FieldBuffer) -> Self {
        Self {
            slots: [seed.clone(), seed.clone(), seed],
        }
    }

    pub fn resolution(&self) -> usize {
        self.slots[0].resolution()
    }

    pub fn next(&self, tick: u64) -> &FieldBuffer {
        &self.slots[next_index(tick)]
    }

    pub fn prior(&self, tick: u64, n: usize) -> &FieldBuffer {
        &self.slots[prior_index(tick, n)]
    }

    /// Write slot for `tick` together with the two generations it reads.
    pub fn split(&mut self, tick: u64) -> (&mut FieldBuffer, &FieldBuffer, &FieldBuffer) {
        let [a, b, c] = &mut self.slots;
        match next_index(tick) {
            0 => (a, &*c, &*b),
            1 => (b, &*a, &*c),
            _ => (c, &*b, &*a),
        }
    }

    pub fn slots(&self) -> &[FieldBuffer; RING_LEN] {
        &self.slots
    }
}
