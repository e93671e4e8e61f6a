//! Parser error types and helpers

use crate::lexer::Token;
use crate::messages::Message;
use thiserror::Error;

/// Why the parser stopped working on the current statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseAbort {
    /// A syntax error was reported; resynchronize and carry on
    #[error("statement abandoned after a syntax error")]
    Syntax,
    /// `passfail` stopped the run; unwind everything
    #[error("run halted")]
    Halt,
}

/// Result type used by every statement and expression handler
pub type ParseResult<T> = Result<T, ParseAbort>;

/// `Expected '{a}' and instead saw '{b}'.`
pub fn expected_token(expected: &str, got: &Token) -> Message {
    Message::ExpectedToken(expected.to_string(), got.describe())
}

/// `Unexpected '{a}'.`
pub fn unexpected_token(got: &Token) -> Message {
    Message::Unexpected(got.describe())
}

/// `Expected an identifier and instead saw '{a}'.`
pub fn expected_identifier(got: &Token) -> Message {
    Message::ExpectedIdentifier(got.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    #[test]
    fn test_expected_token_describes_end_of_input() {
        let eof = Lexer::new("").next_token().unwrap();
        let msg = expected_token(")", &eof);
        assert_eq!(msg.to_string(), "Expected ')' and instead saw '(end)'.");
    }

    #[test]
    fn test_expected_identifier() {
        let token = Lexer::new("42").next_token().unwrap();
        assert_eq!(
            expected_identifier(&token).to_string(),
            "Expected an identifier and instead saw '42'."
        );
    }
}
