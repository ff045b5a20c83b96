//! In-memory project cache used to resolve timers without refetching.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::entries::Project;
use crate::sort::sort_projects;
use crate::timer::Timer;

/// Thread-safe snapshot of the last fetched projects, already sorted for display.
#[derive(Clone, Default)]
pub struct ProjectStore {
    projects: Arc<Mutex<Vec<Project>>>,
}

impl ProjectStore {
    /// Replaces current in-memory project snapshot.
    pub fn set(&self, items: Vec<Project>) {
        *self.lock() = items;
    }

    pub fn snapshot(&self) -> Vec<Project> {
        self.lock().clone()
    }

    pub fn find(&self, id: &str) -> Option<Project> {
        self.lock().iter().find(|project| project.id == id).cloned()
    }

    /// Replaces the cached timer of one project and restores display order.
    /// Returns false when the project is not cached.
    pub fn update_timer(&self, id: &str, timer: Timer) -> bool {
        let mut projects = self.lock();
        let Some(project) = projects.iter_mut().find(|project| project.id == id) else {
            return false;
        };
        project.timer = timer;
        sort_projects(&mut projects);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Project>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectStore;
    use crate::entries::Project;
    use crate::timer::{Timer, TimerSnapshot};
    use chrono::{TimeZone, Utc};

    fn project(id: &str) -> Project {
        named(id, &format!("Project {id}"))
    }

    fn named(id: &str, name: &str) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            color: None,
            enabled: true,
            billing_increment: None,
            timer: Timer::None,
        }
    }

    #[test]
    fn set_replaces_snapshot() {
        let store = ProjectStore::default();
        store.set(vec![project("1"), project("2")]);
        store.set(vec![project("3")]);
        let ids: Vec<String> = store.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn find_and_update_timer() {
        let store = ProjectStore::default();
        store.set(vec![project("1")]);
        assert!(store.find("2").is_none());

        let at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let timer = Timer::Running(TimerSnapshot::new("t", 5, at));
        assert!(store.update_timer("1", timer.clone()));
        assert!(!store.update_timer("2", Timer::None));
        assert_eq!(store.find("1").unwrap().timer, timer);
    }

    #[test]
    fn timer_update_restores_display_order() {
        let store = ProjectStore::default();
        store.set(vec![named("1", "Alpha"), named("2", "Zulu")]);

        let at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        assert!(store.update_timer("2", Timer::Running(TimerSnapshot::new("t", 0, at))));
        let ids: Vec<String> = store.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2", "1"]);

        assert!(store.update_timer("2", Timer::None));
        let ids: Vec<String> = store.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
