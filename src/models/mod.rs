pub mod check;
pub mod constants;
pub mod project;
pub mod task;

pub use check::{CheckResult, CheckStatus};
pub use project::{HostOs, Project};
pub use task::{Lesson, Task, TaskFile};
