pub mod employee;
pub mod feedback;
pub mod goal;
pub mod role;
pub mod task;

pub use employee::{Employee, Report};
pub use feedback::FeedbackEntry;
pub use goal::{Goal, GoalStatus, NewGoal};
pub use role::Role;
pub use task::{Review, Task, TaskStatus};
