use crate::foundation::{
    core::Point,
    error::{PendvizError, PendvizResult},
};

/// Which pendulum mass a trail belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mass {
    First,
    Second,
}

impl Mass {
    pub const ALL: [Mass; 2] = [Mass::First, Mass::Second];
}

/// Fixed-capacity FIFO ring of recent positions.
///
/// Storage is allocated once; `head` is the slot of the oldest element. Once full, every push
/// overwrites exactly the oldest slot, so `len() <= capacity()` holds structurally.
#[derive(Clone, Debug)]
pub struct TrailWindow {
    slots: Vec<Point>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl TrailWindow {
    pub fn new(capacity: usize) -> PendvizResult<Self> {
        if capacity == 0 {
            return Err(PendvizError::validation("trail capacity must be >= 1"));
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Append `p`, evicting the oldest element when full. Returns the evicted point.
    pub fn push(&mut self, p: Point) -> Option<Point> {
        if self.slots.len() < self.capacity {
            self.slots.push(p);
            self.len += 1;
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], p);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub fn oldest(&self) -> Option<Point> {
        (!self.is_empty()).then(|| self.slots[self.head])
    }

    pub fn newest(&self) -> Option<Point> {
        (!self.is_empty()).then(|| self.slots[(self.head + self.len - 1) % self.capacity])
    }

    /// Oldest-to-newest iteration.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.capacity])
    }

    /// Contents in insertion order, ready to draw as a connected polyline.
    pub fn snapshot(&self) -> Vec<Point> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
        self.len = 0;
    }
}

/// One independent [`TrailWindow`] per mass.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    first: TrailWindow,
    second: TrailWindow,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> PendvizResult<Self> {
        Ok(Self {
            first: TrailWindow::new(capacity)?,
            second: TrailWindow::new(capacity)?,
        })
    }

    pub fn capacity(&self) -> usize {
        self.first.capacity()
    }

    pub fn window(&self, mass: Mass) -> &TrailWindow {
        match mass {
            Mass::First => &self.first,
            Mass::Second => &self.second,
        }
    }

    fn window_mut(&mut self, mass: Mass) -> &mut TrailWindow {
        match mass {
            Mass::First => &mut self.first,
            Mass::Second => &mut self.second,
        }
    }

    pub fn push(&mut self, mass: Mass, p: Point) -> Option<Point> {
        self.window_mut(mass).push(p)
    }

    pub fn snapshot(&self, mass: Mass) -> Vec<Point> {
        self.window(mass).snapshot()
    }

    pub fn len(&self, mass: Mass) -> usize {
        self.window(mass).len()
    }

    pub fn clear(&mut self) {
        self.first.clear();
        self.second.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trail/buffer.rs"]
mod tests;
