//! The placement loop driving a [`GroupingHeuristic`].

use super::types::{GroupingHeuristic, Placement};
use crate::error::{GgaError, ObjectId, Result};
use crate::groups::{GroupId, Groups, ObjectSet};
use crate::random::RandomSource;

/// Lifecycle of one heuristic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicState {
    /// Order built, nothing placed yet.
    Initialized,
    /// Waiting for [`HeuristicRun::select_next`].
    SelectNext,
    /// An object is selected and waits for [`HeuristicRun::place`].
    Place,
    /// Every object placed and the post-run pass done.
    Done,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicReport {
    /// Number of objects placed.
    pub placed: usize,
    /// Groups created during the run (some may have been dissolved by the
    /// post-run pass).
    pub opened: Vec<GroupId>,
}

/// One run of a heuristic over a set of pending objects.
///
/// ```text
/// Initialized → (SelectNext → Place)* → Done
/// ```
///
/// # Examples
///
/// ```
/// use u_gga::groups::{Groups, Object, ObjectSet};
/// use u_gga::heuristic::{FirstFit, GroupingConfig, HeuristicRun};
/// use u_gga::random::RandomSource;
///
/// let objects = ObjectSet::new((0..6).map(Object::new).collect()).unwrap();
/// let heuristic = FirstFit::from_config(&GroupingConfig::default().with_max_group_size(2));
/// let mut groups = Groups::new(6, 6);
/// let mut rng = RandomSource::new(1);
///
/// let mut run = HeuristicRun::new(&heuristic, &objects, (0..6).collect(), &mut rng);
/// run.run(&mut groups).unwrap();
/// assert!(groups.verify());
/// assert_eq!(groups.num_used(), 3);
/// ```
pub struct HeuristicRun<'a> {
    heuristic: &'a dyn GroupingHeuristic,
    objects: &'a ObjectSet,
    order: Vec<ObjectId>,
    cursor: usize,
    current: Option<ObjectId>,
    state: HeuristicState,
    opened: Vec<GroupId>,
}

impl<'a> HeuristicRun<'a> {
    /// Prepares a run over `pending`, ordered by the heuristic.
    pub fn new(
        heuristic: &'a dyn GroupingHeuristic,
        objects: &'a ObjectSet,
        mut pending: Vec<ObjectId>,
        rng: &mut RandomSource,
    ) -> Self {
        heuristic.build_order(objects, &mut pending, rng);
        Self {
            heuristic,
            objects,
            order: pending,
            cursor: 0,
            current: None,
            state: HeuristicState::Initialized,
            opened: Vec::new(),
        }
    }

    pub fn state(&self) -> HeuristicState {
        self.state
    }

    /// Processing order chosen by the heuristic.
    pub fn order(&self) -> &[ObjectId] {
        &self.order
    }

    /// Whether every pending object has been placed.
    pub fn is_end(&self) -> bool {
        self.cursor >= self.order.len() && self.current.is_none()
    }

    /// Selects the next object to place, if any.
    pub fn select_next(&mut self) -> Option<ObjectId> {
        if self.current.is_some() {
            return self.current;
        }
        let next = self.order.get(self.cursor).copied();
        if let Some(object) = next {
            self.cursor += 1;
            self.current = Some(object);
            self.state = HeuristicState::Place;
        }
        next
    }

    /// Places the selected object and returns its group.
    ///
    /// Fails with [`GgaError::GroupPoolExhausted`] if a new group is needed
    /// but none can be reserved.
    pub fn place(&mut self, groups: &mut Groups) -> Result<GroupId> {
        let object = self.current.ok_or_else(|| {
            GgaError::InvariantViolation("place called without a selected object".into())
        })?;

        let group = match self.heuristic.find_group(self.objects, groups, object) {
            Placement::Existing(g) => g,
            Placement::NewGroup => {
                let g = groups.reserve_group().map_err(|err| match err {
                    GgaError::CapacityExceeded { capacity } => {
                        GgaError::GroupPoolExhausted { object, capacity }
                    }
                    other => other,
                })?;
                self.opened.push(g);
                g
            }
        };
        groups.insert_object(group, object)?;

        self.current = None;
        self.state = HeuristicState::SelectNext;
        Ok(group)
    }

    /// Places every pending object, then runs the post-run pass.
    pub fn run(&mut self, groups: &mut Groups) -> Result<HeuristicReport> {
        while self.select_next().is_some() {
            self.place(groups)?;
        }
        self.heuristic.post_run(self.objects, groups, &self.opened)?;
        self.state = HeuristicState::Done;
        Ok(HeuristicReport {
            placed: self.cursor,
            opened: self.opened.clone(),
        })
    }
}

/// Runs `heuristic` over `pending` in one call.
pub fn run_heuristic(
    heuristic: &dyn GroupingHeuristic,
    objects: &ObjectSet,
    groups: &mut Groups,
    pending: Vec<ObjectId>,
    rng: &mut RandomSource,
) -> Result<HeuristicReport> {
    HeuristicRun::new(heuristic, objects, pending, rng).run(groups)
}
