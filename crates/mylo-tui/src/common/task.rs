#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SignIn,
    SignUp,
    ProfileLoad,
    ProfileSave,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in `AppState`, mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Marks a new task as the active one, superseding any previous id.
    pub fn begin(&mut self, seq: &mut TaskSeq) -> TaskId {
        let id = seq.next_id();
        self.active = Some(id);
        id
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub sign_in: TaskState,
    pub sign_up: TaskState,
    pub profile_load: TaskState,
    pub profile_save: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::SignIn => &self.sign_in,
            TaskKind::SignUp => &self.sign_up,
            TaskKind::ProfileLoad => &self.profile_load,
            TaskKind::ProfileSave => &self.profile_save,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SignIn => &mut self.sign_in,
            TaskKind::SignUp => &mut self.sign_up,
            TaskKind::ProfileLoad => &mut self.profile_load,
            TaskKind::ProfileSave => &mut self.profile_save,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.sign_in.is_running()
            || self.sign_up.is_running()
            || self.profile_load.is_running()
            || self.profile_save.is_running()
    }

    /// Drops every in-flight task so late completions become inert.
    pub fn clear_all(&mut self) {
        self.sign_in.clear();
        self.sign_up.clear();
        self.profile_load.clear();
        self.profile_save.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_task_does_not_finish() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let first = state.begin(&mut seq);
        let second = state.begin(&mut seq);

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_cleared_task_is_inert() {
        let mut seq = TaskSeq::default();
        let mut tasks = Tasks::default();
        let id = tasks.profile_load.begin(&mut seq);
        tasks.clear_all();

        assert!(!tasks.is_any_running());
        assert!(!tasks.state_mut(TaskKind::ProfileLoad).finish_if_active(id));
    }
}
