mod entry;
mod ids;
mod project;
mod tag;
mod timer;
mod user;

pub use entry::{ApiEntry, CreateEntryRequest};
pub use project::ApiProject;
pub use tag::ApiTag;
pub use timer::{ApiTimer, ApiTimerState, LogTimerRequest};
pub use user::ApiUser;
