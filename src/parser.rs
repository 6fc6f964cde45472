// The grammar is pure prefix notation: the leading token of every statement and every expression decides
// exactly how many sub-expressions follow, so a single token of lookahead and plain recursion is all it takes.

use tracing::{debug, trace};

use crate::{
    ast::{Action, BinaryOperator, Expr, Program, UnaryOperator},
    error::Error,
};

const ASSIGN: &str = "=";
const PRINT: &str = "@";

// Parser walks a cursor over borrowed tokens instead of removing them from the front of a list.
#[derive(Debug)]
struct Parser<'a, S> {
    tokens: &'a [S],
    position: usize,
}

impl<'a, S> Parser<'a, S>
where
    S: AsRef<str>,
{
    fn new(tokens: &'a [S]) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.position)?.as_ref();
        self.position += 1;
        Some(token)
    }

    // Same as advance, but running out of tokens is an error because we're mid-statement.
    fn expect_token(&mut self) -> Result<&'a str, Error> {
        self.advance().ok_or(Error::PrematureEnd)
    }

    fn program(&mut self) -> Result<Program, Error> {
        let mut actions = Vec::new();
        while !self.at_end() {
            let action = self.action()?;
            trace!(%action, "parsed statement");
            actions.push(action);
        }
        Ok(Program::new(actions))
    }

    fn action(&mut self) -> Result<Action, Error> {
        match self.expect_token()? {
            ASSIGN => {
                let name = self.expect_token()?.to_string();
                let value = self.expression()?;
                Ok(Action::Assignment { name, value })
            }
            PRINT => Ok(Action::Print(self.expression()?)),
            other => Err(Error::IllegalAction(other.to_string())),
        }
    }

    fn expression(&mut self) -> Result<Expr, Error> {
        let token = self.expect_token()?;
        if let Some(operator) = BinaryOperator::from_symbol(token) {
            let left = self.expression()?;
            let right = self.expression()?;
            return Ok(Expr::binary(operator, left, right));
        }
        if let Some(operator) = UnaryOperator::from_symbol(token) {
            return Ok(Expr::unary(operator, self.expression()?));
        }
        if is_identifier(token) {
            return Ok(Expr::Variable(token.to_string()));
        }
        token
            .parse()
            .map(Expr::Constant)
            .map_err(|_| Error::IllegalOperator(token.to_string()))
    }
}

fn is_identifier(token: &str) -> bool {
    token.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
}

/// Build a program from a sequence of tokens, one action per statement.
/// Any malformed statement stops the build; there is no error recovery.
pub fn parse<S>(tokens: &[S]) -> Result<Program, Error>
where
    S: AsRef<str>,
{
    let program = Parser::new(tokens).program()?;
    debug!(actions = program.actions().len(), "built program");
    Ok(program)
}

/// Split source text on whitespace and build a program from the resulting tokens.
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens: Vec<&str> = source.split_whitespace().collect();
    parse(&tokens)
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(source: &str) -> String {
        parse_source(source).expect("parsing succeeds").to_string()
    }

    #[test]
    fn test_statements() {
        assert_eq!(render("= x 10 @ x"), "x = 10\nPrint x\n");
        assert_eq!(
            render("= y + ! x 3 @ * $ y % -4 +7"),
            "y = ( !x + 3 )\nPrint ( $y * ( -4 % 7 ) )\n"
        );
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_prefix_nesting() {
        let program = parse(&["@", "-", "10", "3"]).unwrap();
        assert_eq!(
            program.actions(),
            &[Action::Print(Expr::binary(
                BinaryOperator::Subtract,
                Expr::Constant(10),
                Expr::Constant(3)
            ))]
        );
        assert_eq!(
            render("@ / - 1 2 * 3 4"),
            "Print ( ( 1 - 2 ) / ( 3 * 4 ) )\n"
        );
    }

    #[test]
    fn test_minus_sign_is_literal_not_operator() {
        // "-5" is a single token, so it's a literal rather than subtraction
        assert_eq!(render("@ -5"), "Print -5\n");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_source("@ + 1"), Err(Error::PrematureEnd));
        assert_eq!(parse_source("="), Err(Error::PrematureEnd));
        assert_eq!(parse_source("= x"), Err(Error::PrematureEnd));
        assert_eq!(
            parse_source("@ 1 print 2"),
            Err(Error::IllegalAction("print".into()))
        );
        assert_eq!(
            parse_source("@ + 1 #"),
            Err(Error::IllegalOperator("#".into()))
        );
        assert_eq!(
            parse_source("@ 99999999999"),
            Err(Error::IllegalOperator("99999999999".into()))
        );
        assert_eq!(parse_source("@ _x"), Err(Error::IllegalOperator("_x".into())));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("Total2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier(""));
    }
}
