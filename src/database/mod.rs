pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use memory::MemoryTaskRepository;
pub use models::{Task, TaskDraft, TaskPatch};
pub use postgres::PgTaskRepository;
pub use repository::{DynTaskRepository, StoreError, TaskRepository};
