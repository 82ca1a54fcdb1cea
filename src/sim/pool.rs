//! Recycling obstacle store
//!
//! A fixed-size arena with an explicit free-index stack. Rows borrow
//! obstacle slots by id and hand them back when the obstacle leaves the
//! playfield; in steady state no allocation happens per frame. Capacity is
//! a hint, not a hard limit: running dry grows the arena instead of
//! failing a spawn.

use glam::Vec2;

/// Obstacle type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Road traffic
    Vehicle,
    /// Floating river platform
    Log,
    /// Long rail vehicle
    Train,
    /// Stationary decoration on safe rows
    Debris,
}

/// Handle into the pool arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleId(pub(crate) usize);

/// A pooled obstacle entity
///
/// While `active` the slot is exclusively owned by one row (recorded in
/// `row`). Inactive slots sit on the free stack and their fields carry no
/// meaning.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub active: bool,
    pub kind: ObstacleKind,
    /// Owning row index, recorded at spawn time
    pub row: u32,
    /// Center position in world pixels
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity, px/s (signed)
    pub vel_x: f32,
}

impl Obstacle {
    fn inert() -> Self {
        Self {
            active: false,
            kind: ObstacleKind::Debris,
            row: 0,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            vel_x: 0.0,
        }
    }

    /// Leading/trailing x extents
    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Arena-with-free-list obstacle pool
#[derive(Debug)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
    free: Vec<usize>,
}

impl ObstaclePool {
    /// Pre-populate `capacity` inert slots
    pub fn new(capacity: usize) -> Self {
        let slots = vec![Obstacle::inert(); capacity];
        // Popping from the back hands out low indices first
        let free = (0..capacity).rev().collect();
        Self { slots, free }
    }

    /// Take a slot out of the pool, allocating a new one if none is free.
    ///
    /// The returned slot is marked active; the caller fills in its fields.
    pub fn acquire(&mut self) -> ObstacleId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                log::debug!("obstacle pool exhausted, growing to {}", self.slots.len() + 1);
                self.slots.push(Obstacle::inert());
                self.slots.len() - 1
            }
        };
        self.slots[index].active = true;
        ObstacleId(index)
    }

    /// Return a slot to the pool, resetting it to an inert state.
    ///
    /// Callers must not retain the id afterwards. Releasing an already
    /// pooled slot is a programmer error.
    pub fn release(&mut self, id: ObstacleId) {
        let slot = &mut self.slots[id.0];
        assert!(slot.active, "double release of pooled obstacle {}", id.0);
        *slot = Obstacle::inert();
        self.free.push(id.0);
    }

    pub fn get(&self, id: ObstacleId) -> &Obstacle {
        &self.slots[id.0]
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> &mut Obstacle {
        &mut self.slots[id.0]
    }

    /// Slots currently lent out to rows
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Slots waiting on the free stack
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total arena size (initial capacity plus overflow growth)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over active slots (render/debug use)
    pub fn iter_active(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, o)| o.active)
            .map(|(i, o)| (ObstacleId(i), o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_release_roundtrip() {
        let mut pool = ObstaclePool::new(4);
        let id = pool.acquire();
        assert!(pool.get(id).active);
        assert_eq!(pool.active_count(), 1);

        pool.get_mut(id).vel_x = 120.0;
        pool.release(id);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 4);

        // The slot comes back inert
        let id2 = pool.acquire();
        assert_eq!(pool.get(id2).vel_x, 0.0);
    }

    #[test]
    fn test_overflow_grows_instead_of_failing() {
        let mut pool = ObstaclePool::new(2);
        let ids: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.active_count(), 5);
        assert_eq!(pool.len(), 5);
        for id in ids {
            pool.release(id);
        }
        assert_eq!(pool.free_count(), 5);
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn test_double_release_panics() {
        let mut pool = ObstaclePool::new(2);
        let id = pool.acquire();
        pool.release(id);
        pool.release(id);
    }

    proptest! {
        /// active + free is conserved across any acquire/release sequence
        #[test]
        fn prop_slot_conservation(ops in proptest::collection::vec(any::<bool>(), 1..200)) {
            let mut pool = ObstaclePool::new(8);
            let mut held: Vec<ObstacleId> = Vec::new();
            for acquire in ops {
                if acquire {
                    held.push(pool.acquire());
                } else if let Some(id) = held.pop() {
                    pool.release(id);
                }
                prop_assert_eq!(pool.active_count(), held.len());
                prop_assert_eq!(pool.active_count() + pool.free_count(), pool.len());
            }
        }
    }
}
