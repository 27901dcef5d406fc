use thiserror::Error;

use crate::lexer::Token;

/// Structural problem found while parsing. Lexing never fails and rendering
/// never fails, so this is the only way a template is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected token: {token}, next token is {}", describe(.next))]
    UnexpectedToken { token: Token, next: Option<Token> },

    #[error("Uncompleted if branch. It must end with any of {}.", .expected.join(", "))]
    UnterminatedIf { expected: Vec<&'static str> },

    #[error(
        "Invalid if condition! At '{location}' (token {position}).\n\
         Check for errors in the variables like '{{' instead of '{{{{'."
    )]
    InvalidCondition { location: String, position: usize },
}

fn describe(token: &Option<Token>) -> String {
    match token {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}

/// Failure to read a binding document.
#[derive(Debug, Error)]
pub enum BindingsError {
    #[error("invalid bindings document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bindings document must be a JSON object")]
    NotAnObject,

    #[error("unsupported value for \"{name}\": only strings and booleans are allowed")]
    UnsupportedValue { name: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Bindings(#[from] BindingsError),
}
