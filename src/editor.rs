use tokio::sync::watch;

use crate::{error::ModelResult, models::Program};

/// Holds the program being edited and rebroadcasts every new value to
/// subscribers. All editing logic lives on [`Program`] itself.
pub struct ProgramEditor {
    state: watch::Sender<Program>,
}

impl ProgramEditor {
    pub fn new(program: Program) -> Self {
        Self {
            state: watch::Sender::new(program),
        }
    }

    pub fn current(&self) -> Program {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Program> {
        self.state.subscribe()
    }

    pub fn apply<F>(&self, edit: F)
    where
        F: FnOnce(&Program) -> Program,
    {
        let next = edit(&self.state.borrow());
        self.state.send_replace(next);
    }

    /// Like [`ProgramEditor::apply`], but a failed edit publishes nothing.
    pub fn try_apply<F>(&self, edit: F) -> ModelResult<()>
    where
        F: FnOnce(&Program) -> ModelResult<Program>,
    {
        let next = edit(&self.state.borrow())?;
        self.state.send_replace(next);
        Ok(())
    }

    pub fn into_program(self) -> Program {
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ModelError, models::Day};

    #[test]
    fn subscribers_see_each_edit() {
        let editor = ProgramEditor::new(Program::new_draft());
        let mut rx = editor.subscribe();
        assert!(!rx.has_changed().unwrap());

        editor.apply(|p| p.with_name("Push Day"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().name, "Push Day");

        editor.apply(|p| p.with_day_added(Day::new("Day 2")));
        assert_eq!(rx.borrow_and_update().days.len(), 2);
    }

    #[test]
    fn failed_edit_is_not_published() {
        let editor = ProgramEditor::new(Program::new_draft());
        let mut rx = editor.subscribe();

        let res = editor.try_apply(|p| p.with_day_replaced_at(5, Day::new("nope")));
        assert_eq!(res, Err(ModelError::IndexOutOfRange { index: 5, len: 1 }));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(editor.current(), Program::new_draft());

        editor
            .try_apply(|p| p.with_day_replaced_at(0, Day::new("Day 1 Revised")))
            .unwrap();
        assert_eq!(rx.borrow_and_update().days[0].name, "Day 1 Revised");
        assert_eq!(editor.into_program().days[0].name, "Day 1 Revised");
    }
}
