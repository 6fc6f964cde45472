// Lowering is a straight post-order walk: each node emits its operands' code and then its own instruction,
// so the machine always finds an operator's inputs sitting on top of the stack.

use tracing::debug;

use crate::ast::Program;

/// Turn a program into machine instruction text, one instruction per line, in program order.
pub fn compile(program: &Program) -> Vec<String> {
    let mut code = Vec::new();
    for action in program.actions() {
        action.lower(&mut code);
    }
    debug!(lines = code.len(), "compiled program");
    code
}
