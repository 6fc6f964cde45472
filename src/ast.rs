// Syntax trees for the prefix language. Every node can do two unrelated things with the same instance:
// walk itself to compute a value (evaluate/perform), or walk itself to emit machine code (lower).
// Node kinds are a closed set, so both are plain matches over the enums below rather than trait objects.

use std::fmt::Display;

use crate::{
    bindings::Bindings,
    error::Error,
    machine::Instruction,
};

/// Operators taking a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `!`, arithmetic negation
    Negate,
    /// `$`, integer (floor) square root
    SquareRoot,
}

impl UnaryOperator {
    /// The source symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Negate => "!",
            Self::SquareRoot => "$",
        }
    }

    /// The operator spelled by `token`, if it is one.
    pub fn from_symbol(token: &str) -> Option<Self> {
        match token {
            "!" => Some(Self::Negate),
            "$" => Some(Self::SquareRoot),
            _ => None,
        }
    }

    /// Apply the operator. This is the one definition of the arithmetic, shared by the interpreter and the machine.
    pub fn apply(&self, value: i32) -> Result<i32, Error> {
        match self {
            Self::Negate => Ok(value.wrapping_neg()),
            Self::SquareRoot if value < 0 => Err(Error::NegativeSquareRoot),
            // f64 represents every i32 exactly, and its sqrt is correctly rounded, so truncating gives the floor.
            Self::SquareRoot => Ok(f64::from(value).sqrt() as i32),
        }
    }
}

/// Operators taking two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`, truncating toward zero
    Divide,
    /// `%`, remainder with the sign of the dividend
    Modulus,
}

impl BinaryOperator {
    /// The source symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulus => "%",
        }
    }

    /// The operator spelled by `token`, if it is one.
    pub fn from_symbol(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            "%" => Some(Self::Modulus),
            _ => None,
        }
    }

    /// Compute `left <op> right` with wrapping 32-bit semantics.
    pub fn apply(&self, left: i32, right: i32) -> Result<i32, Error> {
        match self {
            Self::Add => Ok(left.wrapping_add(right)),
            Self::Subtract => Ok(left.wrapping_sub(right)),
            Self::Multiply => Ok(left.wrapping_mul(right)),
            Self::Divide | Self::Modulus if right == 0 => Err(Error::DivideByZero),
            Self::Divide => Ok(left.wrapping_div(right)),
            Self::Modulus => Ok(left.wrapping_rem(right)),
        }
    }
}

/// A value-producing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// An integer literal
    Constant(i32),
    /// A variable reference, resolved when evaluated
    Variable(String),
    /// `<op> operand`
    Unary {
        /// which operator
        operator: UnaryOperator,
        /// the single operand
        operand: Box<Expr>,
    },
    /// `<op> left right`
    Binary {
        /// which operator
        operator: BinaryOperator,
        /// evaluated first
        left: Box<Expr>,
        /// evaluated second
        right: Box<Expr>,
    },
}

impl Expr {
    /// Shorthand for building a unary node.
    pub fn unary(operator: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    /// Shorthand for building a binary node.
    pub fn binary(operator: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Compute the value of this expression, reading variables from `bindings`.
    /// Operands are evaluated left to right, so the first error in that order wins.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<i32, Error> {
        match self {
            Expr::Constant(value) => Ok(*value),
            Expr::Variable(name) => bindings
                .get(name)
                .ok_or_else(|| Error::Uninitialized(name.clone())),
            Expr::Unary { operator, operand } => operator.apply(operand.evaluate(bindings)?),
            Expr::Binary {
                operator,
                left,
                right,
            } => {
                let a = left.evaluate(bindings)?;
                let b = right.evaluate(bindings)?;
                operator.apply(a, b)
            }
        }
    }

    /// Append the instruction text computing this expression: operands first, then the operator consuming them.
    pub fn lower(&self, code: &mut Vec<String>) {
        match self {
            Expr::Constant(value) => code.push(Instruction::Push(*value).to_string()),
            Expr::Variable(name) => code.push(Instruction::Load(name.clone()).to_string()),
            Expr::Unary { operator, operand } => {
                operand.lower(code);
                code.push(Instruction::from(*operator).to_string());
            }
            Expr::Binary {
                operator,
                left,
                right,
            } => {
                left.lower(code);
                right.lower(code);
                code.push(Instruction::from(*operator).to_string());
            }
        }
    }
}

/// Infix rendering: binary operations are fully parenthesized, unary operators hug their operand.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Unary { operator, operand } => write!(f, "{}{}", operator.symbol(), operand),
            Expr::Binary {
                operator,
                left,
                right,
            } => write!(f, "( {} {} {} )", left, operator.symbol(), right),
        }
    }
}

/// A statement: does something, produces nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `= name value`
    Assignment {
        /// the variable being bound
        name: String,
        /// the new value
        value: Expr,
    },
    /// `@ value`
    Print(Expr),
}

impl Action {
    /// Carry out the statement against `bindings`, pushing anything printed onto `output`.
    pub fn perform(&self, bindings: &mut Bindings, output: &mut Vec<i32>) -> Result<(), Error> {
        match self {
            Action::Assignment { name, value } => {
                let value = value.evaluate(bindings)?;
                bindings.set(name, value);
            }
            Action::Print(value) => output.push(value.evaluate(bindings)?),
        }
        Ok(())
    }

    /// Append the instruction text for this statement.
    pub fn lower(&self, code: &mut Vec<String>) {
        match self {
            Action::Assignment { name, value } => {
                value.lower(code);
                code.push(Instruction::Store(name.clone()).to_string());
            }
            Action::Print(value) => {
                value.lower(code);
                code.push(Instruction::Print.to_string());
            }
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Assignment { name, value } => write!(f, "{} = {}", name, value),
            Action::Print(value) => write!(f, "Print {}", value),
        }
    }
}

/// A whole program: one action per statement, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program(Vec<Action>);

impl Program {
    /// Wrap a list of actions.
    pub fn new(actions: Vec<Action>) -> Self {
        Program(actions)
    }

    /// The statements, in order.
    pub fn actions(&self) -> &[Action] {
        &self.0
    }
}

/// The infix form of each statement on its own line.
impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for action in &self.0 {
            writeln!(f, "{}", action)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn constant_ops(operator: BinaryOperator, a: i32, b: i32) -> Expr {
        Expr::binary(operator, Expr::Constant(a), Expr::Constant(b))
    }

    #[test]
    fn test_render() {
        let expr = Expr::binary(
            BinaryOperator::Add,
            Expr::unary(UnaryOperator::Negate, Expr::Variable("x".into())),
            constant_ops(BinaryOperator::Multiply, 3, -4),
        );
        assert_eq!(expr.to_string(), "( !x + ( 3 * -4 ) )");
        assert_eq!(
            Expr::unary(UnaryOperator::SquareRoot, Expr::Constant(25)).to_string(),
            "$25"
        );

        let assign = Action::Assignment {
            name: "y".into(),
            value: expr.clone(),
        };
        assert_eq!(assign.to_string(), "y = ( !x + ( 3 * -4 ) )");
        assert_eq!(Action::Print(expr).to_string(), "Print ( !x + ( 3 * -4 ) )");
    }

    #[test]
    fn test_binary_evaluation() {
        let bindings = Bindings::new();
        let cases = [
            (BinaryOperator::Add, 10, 3, 13),
            (BinaryOperator::Subtract, 10, 3, 7),
            (BinaryOperator::Multiply, 10, 3, 30),
            (BinaryOperator::Divide, 10, 3, 3),
            (BinaryOperator::Modulus, 10, 3, 1),
            (BinaryOperator::Divide, -7, 2, -3),
            (BinaryOperator::Modulus, -7, 2, -1),
            (BinaryOperator::Modulus, 7, -2, 1),
            (BinaryOperator::Add, i32::MAX, 1, i32::MIN),
            (BinaryOperator::Divide, i32::MIN, -1, i32::MIN),
            (BinaryOperator::Modulus, i32::MIN, -1, 0),
        ];
        for (operator, a, b, expected) in cases {
            assert_eq!(
                constant_ops(operator, a, b).evaluate(&bindings),
                Ok(expected),
                "{:?} {} {}",
                operator,
                a,
                b
            );
        }
    }

    #[test]
    fn test_division_by_zero() {
        let bindings = Bindings::new();
        for a in [0, 1, -5, i32::MAX] {
            assert_eq!(
                constant_ops(BinaryOperator::Divide, a, 0).evaluate(&bindings),
                Err(Error::DivideByZero)
            );
            assert_eq!(
                constant_ops(BinaryOperator::Modulus, a, 0).evaluate(&bindings),
                Err(Error::DivideByZero)
            );
        }
    }

    #[test]
    fn test_unary_evaluation() {
        let bindings = Bindings::new();
        let sqrt = |v| Expr::unary(UnaryOperator::SquareRoot, Expr::Constant(v)).evaluate(&bindings);
        assert_eq!(sqrt(25), Ok(5));
        assert_eq!(sqrt(124), Ok(11));
        assert_eq!(sqrt(0), Ok(0));
        assert_eq!(sqrt(i32::MAX), Ok(46340));
        assert_eq!(sqrt(-1), Err(Error::NegativeSquareRoot));

        let negate = Expr::unary(UnaryOperator::Negate, Expr::Constant(-20));
        assert_eq!(negate.evaluate(&bindings), Ok(20));
    }

    #[test]
    fn test_variables() {
        let mut bindings = Bindings::new();
        let x = Expr::Variable("x".into());
        assert_eq!(x.evaluate(&bindings), Err(Error::Uninitialized("x".into())));
        bindings.set("x", 42);
        assert_eq!(x.evaluate(&bindings), Ok(42));
    }

    #[test]
    fn test_left_error_wins() {
        let bindings = Bindings::new();
        let expr = Expr::binary(
            BinaryOperator::Add,
            Expr::Variable("a".into()),
            Expr::unary(UnaryOperator::SquareRoot, Expr::Constant(-1)),
        );
        assert_eq!(expr.evaluate(&bindings), Err(Error::Uninitialized("a".into())));
    }

    #[test]
    fn test_perform() {
        let mut bindings = Bindings::new();
        let mut output = vec![];
        Action::Assignment {
            name: "x".into(),
            value: Expr::Constant(10),
        }
        .perform(&mut bindings, &mut output)
        .unwrap();
        Action::Print(Expr::Variable("x".into()))
            .perform(&mut bindings, &mut output)
            .unwrap();
        assert_eq!(output, vec![10]);
        assert_eq!(bindings.get("x"), Some(10));
    }

    #[test]
    fn test_lower() {
        let mut code = vec![];
        Action::Assignment {
            name: "z".into(),
            value: Expr::binary(
                BinaryOperator::Subtract,
                Expr::unary(UnaryOperator::SquareRoot, Expr::Variable("x".into())),
                Expr::unary(UnaryOperator::Negate, Expr::Constant(3)),
            ),
        }
        .lower(&mut code);
        Action::Print(constant_ops(BinaryOperator::Modulus, 10, 4)).lower(&mut code);
        assert_eq!(
            code,
            vec![
                "LOAD x", "SQRT", "PUSH 3", "NEG", "SUB", "STORE z", "PUSH 10", "PUSH 4", "MOD",
                "PRINT"
            ]
        );
    }
}
