pub mod field;
pub mod render_utils;
pub mod task;
pub mod text;

pub use field::{FormKey, TextField, handle_form_key};
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState, Tasks};
