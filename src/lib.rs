//! quickcode: a tiny template compiler for code snippets.
//!
//! A template is plain text with two kinds of markup:
//! - `{{name}}` placeholders, replaced by the bound value of `name`.
//! - `#if <condition> #then ... #elseif <condition> #then ... #else ... #endif`
//!   blocks, where a condition combines `{{flag}}` variables with `NOT`,
//!   `AND`, `OR` and parentheses. `AND`/`OR` are right-associative and share
//!   one precedence level; use parentheses to group.
//!
//! Everything else is literal text. Unrecognised syntax never fails to lex;
//! it simply stays text. Only structural problems (a stray `#endif`, a missing
//! `#endif`, a malformed condition) are errors, and they are reported before
//! any output is produced.
//!
//! Whitespace semantics:
//! - Spaces and at most one newline directly after `#then`, `#else` and
//!   `#endif` are dropped, so control tags can sit on their own lines.
//! - Nothing else is trimmed or injected.
//!
//! Rendering is forgiving: a missing binding renders as empty text and tests
//! as false, so a template can be rendered with a partial binding set.
//!
//! ```
//! use quickcode::{execute, Bindings, Value};
//!
//! let mut vars = Bindings::new();
//! vars.insert("name".into(), Value::from("Main"));
//! vars.insert("public".into(), Value::from(true));
//!
//! let out = execute("#if {{public}} #then pub #endif struct {{name}};", &vars).unwrap();
//! assert_eq!(out, "pub struct Main;");
//! ```

pub mod ast;
pub mod bindings;
pub mod condition;
pub mod detect;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod vars;

pub use ast::{Ast, Condition, Node};
pub use detect::detect;
pub use error::{BindingsError, Error, ParseError};
pub use eval::{Bindings, Evaluator, Value};
pub use lexer::{tokenize, Token};
pub use parser::Parser;
pub use vars::VarDecl;

/// Result of statically analysing a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub ast: Ast,
    /// One entry per distinct name, in order of first use.
    pub variables: Vec<VarDecl>,
}

fn parse(template: &str) -> Result<Ast, ParseError> {
    let tokens = tokenize(template);
    Parser::new(&tokens).parse()
}

/// Parses `template` and reports which variables it needs and how each one
/// is used.
pub fn compile(template: &str) -> Result<Compilation, ParseError> {
    let ast = parse(template)?;
    let variables = vars::extract_variables(&ast);
    log::debug!("compiled template with {} variables", variables.len());
    Ok(Compilation { ast, variables })
}

/// Renders `template` against `bindings`.
pub fn execute(template: &str, bindings: &Bindings) -> Result<String, ParseError> {
    let ast = parse(template)?;
    Ok(Evaluator::new(bindings).render(&ast))
}

/// Renders `template` against bindings read from a flat JSON object of
/// strings and booleans.
pub fn execute_json(template: &str, bindings_json: &str) -> Result<String, Error> {
    let bindings = bindings::from_json(bindings_json)?;
    Ok(execute(template, &bindings)?)
}
