//! Task module
//!
//! This module contains the task entity, the data source contract, the
//! two store implementations and the repository composing them.

mod local;
mod model;
mod observe;
mod remote;
mod repository;
mod source;
mod stats;

pub use local::LocalTaskStore;
pub use model::{Loadable, Task};
pub use remote::RemoteTaskStore;
pub use repository::TaskRepository;
pub use source::TaskDataSource;
pub use stats::{get_active_and_completed_stats, Stats};
