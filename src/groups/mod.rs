//! Objects, groups and partitions.
//!
//! - [`Object`] / [`ObjectSet`]: the items to group, validated once per run
//! - [`Group`]: one cluster with cached aggregates
//! - [`Groups`]: a pool of group slots with O(1) object→group bookkeeping
//!
//! Objects are owned by the caller's [`ObjectSet`] and referenced by
//! identifier everywhere else; each [`Groups`] owns its group slots.

mod group;
mod object;
mod partition;

pub use group::{Group, GroupId};
pub use object::{Neighbor, Object, ObjectSet};
pub use partition::Groups;
