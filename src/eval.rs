use std::collections::HashMap;
use std::fmt;

use crate::ast::*;

/// Runtime value bound to a variable name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
}

impl Value {
    /// Only a bound `true` satisfies a condition; strings never do.
    pub fn as_flag(&self) -> bool {
        matches!(self, Value::Bool(true))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

pub type Bindings = HashMap<String, Value>;

/// Renders an AST against a set of bindings. Missing names render as empty
/// text and test as false, so rendering never fails.
pub struct Evaluator<'b> {
    bindings: &'b Bindings,
}

impl<'b> Evaluator<'b> {
    pub fn new(bindings: &'b Bindings) -> Self {
        Self { bindings }
    }

    pub fn render(&self, ast: &[Node]) -> String {
        let mut output = String::new();
        self.render_into(ast, &mut output);
        output
    }

    fn render_into(&self, nodes: &[Node], output: &mut String) {
        for node in nodes {
            match node {
                Node::RawText(text) => output.push_str(text),
                Node::Variable(name) => {
                    if let Some(value) = self.bindings.get(name) {
                        output.push_str(&value.to_string());
                    }
                }
                Node::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    if self.eval_condition(condition) {
                        self.render_into(then_branch, output);
                    } else if let Some(else_branch) = else_branch {
                        self.render_into(else_branch, output);
                    }
                }
            }
        }
    }

    pub fn eval_condition(&self, condition: &Condition) -> bool {
        match condition {
            Condition::BoolVar(name) => self.bindings.get(name).is_some_and(Value::as_flag),
            Condition::Not(inner) => !self.eval_condition(inner),
            Condition::Brackets(inner) => self.eval_condition(inner),
            Condition::And(lhs, rhs) => {
                let (l, r) = (self.eval_condition(lhs), self.eval_condition(rhs));
                l && r
            }
            Condition::Or(lhs, rhs) => {
                let (l, r) = (self.eval_condition(lhs), self.eval_condition(rhs));
                l || r
            }
        }
    }
}
