// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered, append-only collection of the current session's workouts.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::Workout;

/// Workouts in logging order, unique by id.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    workouts: Vec<Workout>,
    ids: HashSet<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from decoded workouts, dropping repeated ids.
    pub fn from_workouts(workouts: Vec<Workout>) -> Self {
        let mut store = Self::new();
        for workout in workouts {
            if let Err(e) = store.append(workout) {
                tracing::warn!(error = %e, "Skipping repeated workout");
            }
        }
        store
    }

    /// Add a workout at the end.
    pub fn append(&mut self, workout: Workout) -> Result<()> {
        if self.ids.contains(workout.id()) {
            return Err(AppError::DuplicateId(workout.id().to_string()));
        }
        self.ids.insert(workout.id().to_string());
        self.workouts.push(workout);
        Ok(())
    }

    /// Iterate in insertion order.
    ///
    /// The iterator borrows the store, so it cannot observe later appends;
    /// it is `Clone`, so it can be restarted.
    pub fn all(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    /// Owned copy of the current contents.
    pub fn snapshot(&self) -> Vec<Workout> {
        self.workouts.clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        if !self.ids.contains(id) {
            return None;
        }
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Undo the most recent append (used when persisting it failed).
    pub(crate) fn pop_last(&mut self) -> Option<Workout> {
        let workout = self.workouts.pop()?;
        self.ids.remove(workout.id());
        Some(workout)
    }

    pub(crate) fn clear(&mut self) {
        self.workouts.clear();
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, WorkoutForm};
    use chrono::Utc;

    fn workout(id: &str) -> Workout {
        let input = WorkoutForm::running(5.0, 25.0, 170.0).validate().unwrap();
        Workout::new(id.to_string(), Utc::now(), Location::new(0.0, 0.0), input)
    }

    #[test]
    fn test_append_keeps_order() {
        let mut store = SessionStore::new();
        store.append(workout("a")).unwrap();
        store.append(workout("b")).unwrap();
        store.append(workout("c")).unwrap();

        let ids: Vec<&str> = store.all().map(|w| w.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = SessionStore::new();
        store.append(workout("a")).unwrap();

        let err = store.append(workout("a")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateId(id) if id == "a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_all_is_restartable() {
        let mut store = SessionStore::new();
        store.append(workout("a")).unwrap();
        store.append(workout("b")).unwrap();

        let iter = store.all();
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);

        // A snapshot does not see later appends
        let snapshot = store.snapshot();
        store.append(workout("c")).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_find_by_id() {
        let mut store = SessionStore::new();
        let inserted = workout("a");
        store.append(inserted.clone()).unwrap();

        assert_eq!(store.find_by_id("a"), Some(&inserted));
        assert_eq!(store.find_by_id("missing"), None);
    }

    #[test]
    fn test_from_workouts_drops_repeats() {
        let store = SessionStore::from_workouts(vec![workout("a"), workout("a"), workout("b")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_pop_last_frees_id() {
        let mut store = SessionStore::new();
        store.append(workout("a")).unwrap();
        assert!(store.pop_last().is_some());
        assert!(store.is_empty());
        store.append(workout("a")).unwrap();
    }
}
