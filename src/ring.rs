//! Fixed-capacity circular buffer keeping the most recent elements.

use std::num::NonZeroUsize;

/// A ring of `capacity` slots that overwrites its oldest element once full.
///
/// Storage grows with the elements added, so a large capacity costs nothing
/// until it is filled.
#[derive(Debug)]
pub struct Ring<T> {
    elements: Vec<T>,
    capacity: usize,
    index: usize,
}

impl<T> Ring<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            elements: Vec::new(),
            capacity: capacity.get(),
            index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements currently retained.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn add(&mut self, v: T) {
        if self.elements.len() < self.capacity {
            self.elements.push(v);
        } else {
            self.elements[self.index] = v;
        }
        self.index = (self.index + 1) % self.capacity;
    }

    /// Position of the oldest retained element.
    fn start(&self) -> usize {
        if self.elements.len() < self.capacity {
            0
        } else {
            self.index
        }
    }

    /// Consume the ring, returning retained elements oldest first.
    pub fn into_vec(mut self) -> Vec<T> {
        let start = self.start();
        self.elements.rotate_left(start);
        self.elements
    }
}

impl<T: Clone> Ring<T> {
    /// Copy of the retained elements, oldest first.
    pub fn take(&self) -> Vec<T> {
        let (newest, oldest) = self.elements.split_at(self.start());
        oldest.iter().chain(newest).cloned().collect()
    }
}
