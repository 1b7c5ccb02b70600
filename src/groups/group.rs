//! A single group of a partition.

use super::object::ObjectSet;
use crate::error::ObjectId;

/// Slot index of a group inside its [`super::Groups`] pool.
///
/// Identifiers are recycled once a group is released, so they only name a
/// group for as long as it stays in use.
pub type GroupId = usize;

/// A set of objects placed together.
///
/// Membership is only changed through [`super::Groups`], which keeps the
/// object→group mapping in sync and raises the `to_eval` flag so that the
/// cached aggregates get recomputed.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    objects: Vec<ObjectId>,
    to_eval: bool,
    centroid: Option<ObjectId>,
    avg_similarity: f64,
}

impl Group {
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            objects: Vec::new(),
            to_eval: true,
            centroid: None,
            avg_similarity: 0.0,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Member identifiers, in insertion order (modulo removals).
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether the cached aggregates are stale.
    pub fn to_eval(&self) -> bool {
        self.to_eval
    }

    /// Member with the highest summed similarity to the other members.
    ///
    /// `None` if the group is empty or the cache is stale.
    pub fn centroid(&self) -> Option<ObjectId> {
        if self.to_eval {
            None
        } else {
            self.centroid
        }
    }

    /// Average similarity over all member pairs (0 for fewer than two
    /// members). Only meaningful when [`to_eval`](Self::to_eval) is false.
    pub fn avg_similarity(&self) -> f64 {
        self.avg_similarity
    }

    pub(crate) fn push(&mut self, object: ObjectId) {
        self.objects.push(object);
        self.to_eval = true;
    }

    /// Removes `object`; returns whether it was present.
    pub(crate) fn remove(&mut self, object: ObjectId) -> bool {
        match self.objects.iter().position(|&o| o == object) {
            Some(pos) => {
                self.objects.swap_remove(pos);
                self.to_eval = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_objects(&mut self) -> Vec<ObjectId> {
        self.to_eval = true;
        std::mem::take(&mut self.objects)
    }

    /// Recomputes the centroid and the average intra-group similarity if
    /// the membership changed since the last call.
    pub fn compute(&mut self, objects: &ObjectSet) {
        if !self.to_eval {
            return;
        }
        self.to_eval = false;

        let n = self.objects.len();
        if n == 0 {
            self.centroid = None;
            self.avg_similarity = 0.0;
            return;
        }

        let mut sums = vec![0.0; n];
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let s = objects.similarity(self.objects[i], self.objects[j]);
                sums[i] += s;
                sums[j] += s;
                total += s;
            }
        }

        let mut best = 0;
        for i in 1..n {
            if sums[i] > sums[best] {
                best = i;
            }
        }
        self.centroid = Some(self.objects[best]);
        self.avg_similarity = if n > 1 {
            total / (n * (n - 1) / 2) as f64
        } else {
            0.0
        };
    }
}
