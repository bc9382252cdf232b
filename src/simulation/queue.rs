use std::collections::HashSet;

use crate::simulation::grid::Coord;

/// Remove duplicate coordinates, keeping the first occurrence of each.
pub fn dedupe<I>(coords: I) -> Vec<Coord>
where
    I: IntoIterator<Item = Coord>,
{
    UpdateQueue::from_candidates(coords).into_vec()
}

/// Ordered set of cells awaiting re-evaluation on the next step.
///
/// Insertion order is preserved; pushing a coordinate that is already queued
/// is a no-op.
#[derive(Clone, Debug, Default)]
pub struct UpdateQueue {
    order: Vec<Coord>,
    members: HashSet<Coord>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Collect candidates, first occurrence wins.
    pub fn from_candidates<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = Coord>,
    {
        let coords = coords.into_iter();
        let mut queue = Self::with_capacity(coords.size_hint().0);
        queue.extend(coords);
        queue
    }

    /// Queue a cell. Returns `false` if it was already queued.
    pub fn push(&mut self, coord: Coord) -> bool {
        let inserted = self.members.insert(coord);
        if inserted {
            self.order.push(coord);
        }
        inserted
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.members.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<Coord> {
        self.order
    }
}

impl Extend<Coord> for UpdateQueue {
    fn extend<I: IntoIterator<Item = Coord>>(&mut self, iter: I) {
        for coord in iter {
            self.push(coord);
        }
    }
}

impl FromIterator<Coord> for UpdateQueue {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self::from_candidates(iter)
    }
}

impl<'a> IntoIterator for &'a UpdateQueue {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Order-sensitive: two queues are equal when they would be evaluated the same way.
impl PartialEq for UpdateQueue {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for UpdateQueue {}
