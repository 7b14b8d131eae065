use std::collections::HashMap;

use crate::models::{Group, GroupId, TrainedTimeSeries};

/// Per-session cache of expensive results.
///
/// Trained series are keyed by group so revisiting a training page does not
/// rerun the parameter search. Everything is dropped by [`SessionCache::end_session`].
#[derive(Debug, Default, Clone)]
pub struct SessionCache {
    trained: HashMap<GroupId, Vec<TrainedTimeSeries>>,
    groups: Option<Vec<Group>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trained(&self, group_id: GroupId) -> Option<&[TrainedTimeSeries]> {
        self.trained.get(&group_id).map(|series| series.as_slice())
    }

    pub fn store_trained(&mut self, group_id: GroupId, series: Vec<TrainedTimeSeries>) {
        self.trained.insert(group_id, series);
    }

    pub fn groups(&self) -> Option<&[Group]> {
        self.groups.as_deref()
    }

    /// Replaces the listing of the last upload.
    pub fn store_groups(&mut self, groups: Vec<Group>) {
        self.groups = Some(groups);
    }

    pub fn end_session(&mut self) {
        debug!(
            "Ending session, dropping {} cached trainings",
            self.trained.len()
        );
        self.trained.clear();
        self.groups = None;
    }

    pub fn is_empty(&self) -> bool {
        self.trained.is_empty() && self.groups.is_none()
    }
}
