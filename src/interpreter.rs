use tracing::{debug, trace};

use crate::{ast::Program, bindings::Bindings, error::Error};

/// Runs a program by walking its syntax trees directly.
#[derive(Debug, Default)]
pub struct Interpreter {
    bindings: Bindings,
    output: Vec<i32>,
}

impl Interpreter {
    /// An interpreter with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Perform each action in program order against fresh bindings, stopping at the first error.
    /// Whatever was printed or bound before the error stays visible until the next run.
    pub fn run(&mut self, program: &Program) -> Result<(), Error> {
        self.bindings = Bindings::new();
        self.output.clear();
        for action in program.actions() {
            trace!(%action, "performing");
            action.perform(&mut self.bindings, &mut self.output)?;
        }
        debug!(
            actions = program.actions().len(),
            bindings = self.bindings.len(),
            "interpreted program"
        );
        Ok(())
    }

    /// The interpreter's variable bindings.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Values printed so far, oldest first.
    pub fn output(&self) -> &[i32] {
        &self.output
    }
}
