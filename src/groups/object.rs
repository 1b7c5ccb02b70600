//! Objects to be grouped and the validated set that holds them.

use crate::error::{GgaError, ObjectId, Result};

/// A scored link from one object to another (similarity, agreement or
/// disagreement).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub id: ObjectId,
    pub value: f64,
}

/// An item to be placed in exactly one group.
///
/// Neighbor lists are sparse (typically the top-k most related objects);
/// pairs that do not appear are treated as `0.0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    /// Dense zero-based identifier.
    pub id: ObjectId,
    /// Whether the object may form a singleton group by itself.
    pub social: bool,
    /// Objects sharing a parent are never grouped together.
    pub parent: Option<usize>,
    pub similarities: Vec<Neighbor>,
    pub agreements: Vec<Neighbor>,
    pub disagreements: Vec<Neighbor>,
}

impl Object {
    /// Creates a social object without parent or neighbors.
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            social: true,
            parent: None,
            similarities: Vec::new(),
            agreements: Vec::new(),
            disagreements: Vec::new(),
        }
    }

    pub fn with_social(mut self, social: bool) -> Self {
        self.social = social;
        self
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_similarity(mut self, id: ObjectId, value: f64) -> Self {
        self.similarities.push(Neighbor { id, value });
        self
    }

    pub fn with_agreement(mut self, id: ObjectId, value: f64) -> Self {
        self.agreements.push(Neighbor { id, value });
        self
    }

    pub fn with_disagreement(mut self, id: ObjectId, value: f64) -> Self {
        self.disagreements.push(Neighbor { id, value });
        self
    }
}

/// The objects of one run, indexed by identifier.
///
/// Construction checks that identifiers are `0..n` in order and that every
/// neighbor refers to another object of the set. Neighbor lists are sorted
/// by identifier so that pair lookups are logarithmic.
#[derive(Debug, Clone)]
pub struct ObjectSet {
    objects: Vec<Object>,
}

impl ObjectSet {
    /// Validates and indexes `objects`.
    ///
    /// # Errors
    /// - [`GgaError::NonContiguousIdentifiers`] if `objects[i].id != i`
    /// - [`GgaError::InvalidParameter`] for dangling, self-referencing,
    ///   duplicated or non-finite neighbor entries
    pub fn new(mut objects: Vec<Object>) -> Result<Self> {
        let n = objects.len();
        for (position, obj) in objects.iter().enumerate() {
            if obj.id != position {
                return Err(GgaError::NonContiguousIdentifiers {
                    position,
                    found: obj.id,
                });
            }
        }

        for obj in &mut objects {
            let id = obj.id;
            for (kind, list) in [
                ("similarity", &mut obj.similarities),
                ("agreement", &mut obj.agreements),
                ("disagreement", &mut obj.disagreements),
            ] {
                list.sort_by_key(|nb| nb.id);
                for (i, nb) in list.iter().enumerate() {
                    if nb.id >= n || nb.id == id {
                        return Err(GgaError::InvalidParameter(format!(
                            "object {id}: {kind} neighbor {} is not another object of the set",
                            nb.id
                        )));
                    }
                    if !nb.value.is_finite() {
                        return Err(GgaError::InvalidParameter(format!(
                            "object {id}: {kind} with {} is not finite",
                            nb.id
                        )));
                    }
                    if i > 0 && list[i - 1].id == nb.id {
                        return Err(GgaError::InvalidParameter(format!(
                            "object {id}: duplicate {kind} neighbor {}",
                            nb.id
                        )));
                    }
                }
            }
        }

        Ok(Self { objects })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// # Panics
    /// Panics if `id` is out of range.
    pub fn get(&self, id: ObjectId) -> &Object {
        &self.objects[id]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.objects.iter()
    }

    pub fn as_slice(&self) -> &[Object] {
        &self.objects
    }

    /// Similarity of `a` and `b`, looked up in `a`'s list first, then `b`'s.
    pub fn similarity(&self, a: ObjectId, b: ObjectId) -> f64 {
        pair_value(&self.objects[a].similarities, &self.objects[b].similarities, a, b)
    }

    pub fn agreement(&self, a: ObjectId, b: ObjectId) -> f64 {
        pair_value(&self.objects[a].agreements, &self.objects[b].agreements, a, b)
    }

    pub fn disagreement(&self, a: ObjectId, b: ObjectId) -> f64 {
        pair_value(&self.objects[a].disagreements, &self.objects[b].disagreements, a, b)
    }

    /// Whether `a` and `b` have the same parent.
    pub fn same_parent(&self, a: ObjectId, b: ObjectId) -> bool {
        match (self.objects[a].parent, self.objects[b].parent) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        }
    }
}

fn pair_value(list_a: &[Neighbor], list_b: &[Neighbor], a: ObjectId, b: ObjectId) -> f64 {
    lookup(list_a, b)
        .or_else(|| lookup(list_b, a))
        .unwrap_or(0.0)
}

fn lookup(list: &[Neighbor], id: ObjectId) -> Option<f64> {
    list.binary_search_by_key(&id, |nb| nb.id)
        .ok()
        .map(|i| list[i].value)
}
