use std::fmt::{Display, Write};
use std::str::FromStr;

use tracing::debug;

use crate::{
    ast::{BinaryOperator, UnaryOperator},
    bindings::Bindings,
    error::Error,
};

/// The operand stack.
pub mod stack;

pub use stack::InstructionStack;

macro_rules! binary_arithmetic {
    ($self:ident, $op:expr) => {{
        let b = $self.stack.pop()?;
        let a = $self.stack.pop()?;
        $self.stack.push($op.apply(a, b)?);
        Ok(())
    }};
}

/// A single instruction, in a parsed/type-safe format.
/// The text form (what `Display` writes and `FromStr` reads) is the only thing that travels between
/// the compiler and the machine. Execution lives on the `Machine`, so an instruction is pure data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Push a literal value
    Push(i32),
    /// Pop and print the top value
    Print,
    /// Pop the top value and bind it to a name
    Store(String),
    /// Push the value bound to a name
    Load(String),
    /// Negate the top value on the stack
    Negate,
    /// Replace the top value with its integer square root
    SquareRoot,
    /// If stack is TOP: b, a ..., pop two and push (a+b)
    Add,
    /// If stack is TOP: b, a ..., pop two and push (a-b)
    Subtract,
    /// If stack is TOP: b, a ..., pop two and push (a*b)
    Multiply,
    /// If stack is TOP: b, a ..., pop two and push (a/b)
    Divide,
    /// If stack is TOP: b, a ..., pop two and push (a%b)
    Modulus,
}

impl Instruction {
    const PUSH: &'static str = "PUSH";
    const PRINT: &'static str = "PRINT";
    const STORE: &'static str = "STORE";
    const LOAD: &'static str = "LOAD";
    const NEGATE: &'static str = "NEG";
    const SQUARE_ROOT: &'static str = "SQRT";
    const ADD: &'static str = "ADD";
    const SUBTRACT: &'static str = "SUB";
    const MULTIPLY: &'static str = "MUL";
    const DIVIDE: &'static str = "DIV";
    const MODULUS: &'static str = "MOD";

    /// Parse one line of instruction text. Blank lines parse to `None`.
    pub fn parse_line(line: &str) -> Result<Option<Instruction>, Error> {
        let mut fields = line.split_whitespace();
        let mnemonic = match fields.next() {
            Some(m) => m,
            None => return Ok(None),
        };
        let malformed = || Error::IllegalInstruction(line.trim().to_string());
        let instruction = match mnemonic {
            Self::PUSH => {
                let value = fields.next().ok_or_else(malformed)?;
                Instruction::Push(value.parse().map_err(|_| malformed())?)
            }
            Self::STORE => Instruction::Store(fields.next().ok_or_else(malformed)?.to_string()),
            Self::LOAD => Instruction::Load(fields.next().ok_or_else(malformed)?.to_string()),
            Self::PRINT => Instruction::Print,
            Self::NEGATE => Instruction::Negate,
            Self::SQUARE_ROOT => Instruction::SquareRoot,
            Self::ADD => Instruction::Add,
            Self::SUBTRACT => Instruction::Subtract,
            Self::MULTIPLY => Instruction::Multiply,
            Self::DIVIDE => Instruction::Divide,
            Self::MODULUS => Instruction::Modulus,
            other => return Err(Error::IllegalInstruction(other.to_string())),
        };
        Ok(Some(instruction))
    }
}

impl FromStr for Instruction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instruction::parse_line(s)?.ok_or_else(|| Error::IllegalInstruction(String::new()))
    }
}

impl From<UnaryOperator> for Instruction {
    fn from(operator: UnaryOperator) -> Self {
        match operator {
            UnaryOperator::Negate => Instruction::Negate,
            UnaryOperator::SquareRoot => Instruction::SquareRoot,
        }
    }
}

impl From<BinaryOperator> for Instruction {
    fn from(operator: BinaryOperator) -> Self {
        match operator {
            BinaryOperator::Add => Instruction::Add,
            BinaryOperator::Subtract => Instruction::Subtract,
            BinaryOperator::Multiply => Instruction::Multiply,
            BinaryOperator::Divide => Instruction::Divide,
            BinaryOperator::Modulus => Instruction::Modulus,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Push(value) => write!(f, "{} {}", Self::PUSH, value),
            Instruction::Print => write!(f, "{}", Self::PRINT),
            Instruction::Store(name) => write!(f, "{} {}", Self::STORE, name),
            Instruction::Load(name) => write!(f, "{} {}", Self::LOAD, name),
            Instruction::Negate => write!(f, "{}", Self::NEGATE),
            Instruction::SquareRoot => write!(f, "{}", Self::SQUARE_ROOT),
            Instruction::Add => write!(f, "{}", Self::ADD),
            Instruction::Subtract => write!(f, "{}", Self::SUBTRACT),
            Instruction::Multiply => write!(f, "{}", Self::MULTIPLY),
            Instruction::Divide => write!(f, "{}", Self::DIVIDE),
            Instruction::Modulus => write!(f, "{}", Self::MODULUS),
        }
    }
}

/// A Machine assembles instruction text and then executes it.
/// Its bindings are its own: nothing the tree-walking interpreter stored is visible here.
#[derive(Debug, Default)]
pub struct Machine {
    code: Vec<Instruction>,
    stack: InstructionStack,
    bindings: Bindings,
    output: Vec<i32>,
}

impl Machine {
    /// A machine with no code and empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A machine that will run already-parsed instructions.
    pub fn with_instructions(code: Vec<Instruction>) -> Self {
        Machine {
            code,
            ..Self::default()
        }
    }

    /// Parse each line and append it to the machine's code.
    /// Stops at the first bad line, in which case none of the lines are added.
    pub fn assemble<I, S>(&mut self, lines: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut assembled = Vec::new();
        for line in lines {
            if let Some(instruction) = Instruction::parse_line(line.as_ref())? {
                assembled.push(instruction);
            }
        }
        self.code.extend(assembled);
        debug!(instructions = self.code.len(), "assembled");
        Ok(())
    }

    /// Run every assembled instruction in order, starting from an empty stack and bindings.
    pub fn execute(&mut self) -> Result<(), Error> {
        self.stack.clear();
        self.bindings = Bindings::new();
        self.output.clear();

        let code = std::mem::take(&mut self.code);
        let result = code.iter().try_for_each(|instruction| {
            #[cfg(feature = "trace")]
            tracing::trace!(stack = ?self.stack, "{}", instruction);
            self.step(instruction)
        });
        self.code = code;
        debug!(
            ok = result.is_ok(),
            stack_depth = self.stack.len(),
            bindings = self.bindings.len(),
            "execution finished"
        );
        result
    }

    /// Execute a single instruction against the current machine state.
    pub fn step(&mut self, instruction: &Instruction) -> Result<(), Error> {
        match instruction {
            Instruction::Push(value) => {
                self.stack.push(*value);
                Ok(())
            }
            Instruction::Print => {
                let value = self.stack.pop()?;
                self.output.push(value);
                Ok(())
            }
            Instruction::Store(name) => {
                let value = self.stack.pop()?;
                self.bindings.set(name, value);
                Ok(())
            }
            Instruction::Load(name) => {
                let value = self
                    .bindings
                    .get(name)
                    .ok_or_else(|| Error::Uninitialized(name.clone()))?;
                self.stack.push(value);
                Ok(())
            }
            Instruction::Negate => self.unary_arithmetic(UnaryOperator::Negate),
            Instruction::SquareRoot => self.unary_arithmetic(UnaryOperator::SquareRoot),
            Instruction::Add => binary_arithmetic!(self, BinaryOperator::Add),
            Instruction::Subtract => binary_arithmetic!(self, BinaryOperator::Subtract),
            Instruction::Multiply => binary_arithmetic!(self, BinaryOperator::Multiply),
            Instruction::Divide => binary_arithmetic!(self, BinaryOperator::Divide),
            Instruction::Modulus => binary_arithmetic!(self, BinaryOperator::Modulus),
        }
    }

    fn unary_arithmetic(&mut self, operator: UnaryOperator) -> Result<(), Error> {
        let value = self.stack.pop()?;
        self.stack.push(operator.apply(value)?);
        Ok(())
    }

    /// The assembled code.
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// The operand stack as execution left it.
    pub fn stack(&self) -> &InstructionStack {
        &self.stack
    }

    /// The machine's variable bindings.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Values printed so far, oldest first.
    pub fn output(&self) -> &[i32] {
        &self.output
    }

    /// The assembled code as instruction text, one instruction per line.
    pub fn listing(&self) -> String {
        let mut ret = String::new();
        for instruction in &self.code {
            writeln!(&mut ret, "{}", instruction).expect("writing to string");
        }
        ret
    }
}
