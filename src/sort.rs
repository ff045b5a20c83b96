//! Ordering of projects in the timer list: running first, then paused, then idle.

use std::cmp::Ordering;

use crate::entries::Project;
use crate::timer::TimerState;

pub const RUNNING_PRIORITY: u8 = 1;
pub const PAUSED_PRIORITY: u8 = 2;
pub const IDLE_PRIORITY: u8 = 3;

/// Lower numbers sort first.
pub fn timer_state_priority(state: Option<TimerState>) -> u8 {
    match state {
        Some(TimerState::Running) => RUNNING_PRIORITY,
        Some(TimerState::Paused) => PAUSED_PRIORITY,
        None => IDLE_PRIORITY,
    }
}

/// Case-insensitive first; on a tie lowercase sorts before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn compare_projects(a: &Project, b: &Project) -> Ordering {
    timer_state_priority(a.timer.state())
        .cmp(&timer_state_priority(b.timer.state()))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Stable in-place sort by timer priority, then name.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(compare_projects);
}
