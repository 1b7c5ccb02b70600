//! The partition: a pool of group slots plus the object→group mapping.

use super::group::{Group, GroupId};
use super::object::ObjectSet;
use crate::error::{GgaError, ObjectId, Result};

/// A partition of `n` objects into groups.
///
/// Groups live in a fixed-capacity pool of slots. A slot is either in the
/// *used* view (ordered, as seen by operators) or on the free list, and a
/// per-slot flag answers "is this slot in use" in O(1). The `assignment`
/// array maps every object to its group in O(1).
///
/// # Examples
///
/// ```
/// use u_gga::groups::Groups;
///
/// let mut groups = Groups::new(3, 3);
/// let g = groups.reserve_group().unwrap();
/// groups.insert_object(g, 0).unwrap();
/// groups.insert_object(g, 2).unwrap();
/// let h = groups.reserve_group().unwrap();
/// groups.insert_object(h, 1).unwrap();
///
/// assert!(groups.verify());
/// assert_eq!(groups.group_of(2), Some(g));
/// ```
#[derive(Debug, Clone)]
pub struct Groups {
    slots: Vec<Group>,
    free: Vec<GroupId>,
    used: Vec<GroupId>,
    in_use: Vec<bool>,
    assignment: Vec<Option<GroupId>>,
    max_groups: usize,
}

impl Groups {
    /// Creates an empty partition of `num_objects` objects with at most
    /// `max_groups` groups.
    pub fn new(num_objects: usize, max_groups: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            used: Vec::new(),
            in_use: Vec::new(),
            assignment: vec![None; num_objects],
            max_groups,
        }
    }

    /// Number of objects in the partition.
    pub fn num_objects(&self) -> usize {
        self.assignment.len()
    }

    /// Hard capacity of the group pool.
    pub fn max_groups(&self) -> usize {
        self.max_groups
    }

    /// Used groups, in operator order.
    pub fn used(&self) -> &[GroupId] {
        &self.used
    }

    /// Number of used groups.
    pub fn num_used(&self) -> usize {
        self.used.len()
    }

    /// Used groups, in operator order.
    pub fn used_groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.used.iter().map(move |&g| &self.slots[g])
    }

    /// # Panics
    /// Panics if `id` was never allocated.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.slots[id]
    }

    /// The group in slot `id`, if allocated.
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.slots.get(id)
    }

    /// Group holding `object`, if any.
    pub fn group_of(&self, object: ObjectId) -> Option<GroupId> {
        self.assignment.get(object).copied().flatten()
    }

    /// Whether `object` belongs to a group.
    pub fn is_assigned(&self, object: ObjectId) -> bool {
        self.group_of(object).is_some()
    }

    /// Number of objects holding a group.
    pub fn num_assigned(&self) -> usize {
        self.assignment.iter().filter(|a| a.is_some()).count()
    }

    /// Objects without a group, in increasing identifier order.
    pub fn unassigned(&self) -> Vec<ObjectId> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_none())
            .map(|(o, _)| o)
            .collect()
    }

    /// Whether slot `id` is in the used view.
    pub fn is_used(&self, id: GroupId) -> bool {
        self.in_use.get(id).copied().unwrap_or(false)
    }

    /// Takes a group from the free list, or allocates a new slot.
    ///
    /// The group is appended to the used view, empty.
    pub fn reserve_group(&mut self) -> Result<GroupId> {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                if self.slots.len() >= self.max_groups {
                    return Err(GgaError::CapacityExceeded {
                        capacity: self.max_groups,
                    });
                }
                let id = self.slots.len();
                self.slots.push(Group::new(id));
                self.in_use.push(false);
                id
            }
        };
        self.in_use[id] = true;
        self.used.push(id);
        Ok(id)
    }

    /// Returns an empty group to the free list.
    pub fn release_group(&mut self, id: GroupId) -> Result<()> {
        if !self.is_used(id) {
            return Err(GgaError::UnknownHandle(format!("group {id} is not in use")));
        }
        if !self.slots[id].is_empty() {
            return Err(GgaError::InvariantViolation(format!(
                "cannot release group {id}: it still holds {} objects",
                self.slots[id].len()
            )));
        }
        // The used view is ordered, so its entry is removed in place.
        if let Some(pos) = self.used.iter().position(|&g| g == id) {
            self.used.remove(pos);
        }
        self.in_use[id] = false;
        self.free.push(id);
        Ok(())
    }

    /// Adds `object` to group `id`.
    ///
    /// Fails with [`GgaError::AlreadyAssigned`] if the object is in any
    /// group already.
    pub fn insert_object(&mut self, id: GroupId, object: ObjectId) -> Result<()> {
        if object >= self.assignment.len() {
            return Err(GgaError::UnknownHandle(format!("object {object}")));
        }
        if !self.is_used(id) {
            return Err(GgaError::UnknownHandle(format!("group {id} is not in use")));
        }
        if let Some(current) = self.assignment[object] {
            return Err(GgaError::AlreadyAssigned {
                object,
                group: current,
            });
        }
        self.slots[id].push(object);
        self.assignment[object] = Some(id);
        Ok(())
    }

    /// Removes `object` from group `id`.
    pub fn delete_object(&mut self, id: GroupId, object: ObjectId) -> Result<()> {
        if self.group_of(object) != Some(id) {
            return Err(GgaError::NotMember { object, group: id });
        }
        self.slots[id].remove(object);
        self.assignment[object] = None;
        Ok(())
    }

    /// Moves `object` from its current group to `to`.
    pub fn move_object(&mut self, object: ObjectId, to: GroupId) -> Result<()> {
        let from = self.group_of(object).ok_or(GgaError::NotMember {
            object,
            group: to,
        })?;
        self.delete_object(from, object)?;
        self.insert_object(to, object)
    }

    /// Unassigns every member of group `id`; the group stays in use.
    pub fn empty_group(&mut self, id: GroupId) -> Result<Vec<ObjectId>> {
        if !self.is_used(id) {
            return Err(GgaError::UnknownHandle(format!("group {id} is not in use")));
        }
        let members = self.slots[id].take_objects();
        for &o in &members {
            self.assignment[o] = None;
        }
        Ok(members)
    }

    /// Empties and releases group `id`, returning its former members.
    pub fn delete_group(&mut self, id: GroupId) -> Result<Vec<ObjectId>> {
        let members = self.empty_group(id)?;
        self.release_group(id)?;
        Ok(members)
    }

    /// Releases every group and unassigns every object.
    pub fn clear(&mut self) {
        for g in &mut self.slots {
            g.take_objects();
        }
        self.assignment.iter_mut().for_each(|a| *a = None);
        self.used.clear();
        self.in_use.iter_mut().for_each(|u| *u = false);
        // Reversed so that slot 0 is handed out first.
        self.free = (0..self.slots.len()).rev().collect();
    }

    /// Swaps two positions of the used view. Membership is unchanged.
    ///
    /// # Panics
    /// Panics if a position is out of range.
    pub fn swap_used(&mut self, i: usize, j: usize) {
        self.used.swap(i, j);
    }

    /// Refreshes the cached aggregates of every stale used group.
    pub fn compute_groups(&mut self, objects: &ObjectSet) {
        for &g in &self.used {
            self.slots[g].compute(objects);
        }
    }

    /// Whether the object→group mapping and the group member lists agree,
    /// allowing unassigned objects and empty groups.
    pub fn is_consistent(&self) -> bool {
        let n = self.assignment.len();
        let mut slot_state = vec![0u8; self.slots.len()];
        for &g in &self.used {
            if g >= self.slots.len() || slot_state[g] != 0 {
                return false;
            }
            slot_state[g] = 1;
        }
        for &g in &self.free {
            if g >= self.slots.len() || slot_state[g] != 0 || !self.slots[g].is_empty() {
                return false;
            }
            slot_state[g] = 2;
        }
        if slot_state.iter().any(|&s| s == 0) || self.slots.len() > self.max_groups {
            return false;
        }
        if self.in_use.len() != self.slots.len()
            || slot_state
                .iter()
                .zip(&self.in_use)
                .any(|(&s, &u)| (s == 1) != u)
        {
            return false;
        }

        let mut seen = vec![false; n];
        for &g in &self.used {
            let group = &self.slots[g];
            if group.id() != g {
                return false;
            }
            for &o in group.objects() {
                if o >= n || seen[o] || self.assignment[o] != Some(g) {
                    return false;
                }
                seen[o] = true;
            }
        }
        self.assignment
            .iter()
            .zip(&seen)
            .all(|(a, &s)| a.is_some() == s)
    }

    /// Full validity check: consistent, every object assigned to exactly
    /// one group and no used group empty.
    ///
    /// O(objects + groups); meant for tests and debug checks.
    pub fn verify(&self) -> bool {
        self.is_consistent()
            && self.assignment.iter().all(Option::is_some)
            && self.used.iter().all(|&g| !self.slots[g].is_empty())
    }

    /// Members of each used group (sorted), in used order.
    pub fn partition(&self) -> Vec<Vec<ObjectId>> {
        self.used_groups()
            .map(|g| {
                let mut members = g.objects().to_vec();
                members.sort_unstable();
                members
            })
            .collect()
    }

    /// Order-independent form of [`partition`](Self::partition), for
    /// comparing partitions by content.
    pub fn canonical_partition(&self) -> Vec<Vec<ObjectId>> {
        let mut groups = self.partition();
        groups.sort();
        groups
    }
}
