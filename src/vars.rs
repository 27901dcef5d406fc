use std::collections::HashSet;

use crate::ast::*;

/// How a name is used by a template: interpolated as text or tested as a flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarDecl {
    Str(String),
    Bool(String),
}

impl VarDecl {
    pub fn name(&self) -> &str {
        match self {
            VarDecl::Str(name) | VarDecl::Bool(name) => name,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, VarDecl::Bool(_))
    }
}

/// Collects one declaration per distinct name, in depth-first order.
///
/// A name used both ways is declared `Bool`: the earlier `Str` entry is
/// removed and the `Bool` is appended at the point of its first boolean use.
pub fn extract_variables(ast: &[Node]) -> Vec<VarDecl> {
    let mut all = Vec::new();
    collect_nodes(ast, &mut all);
    resolve_conflicts(all)
}

fn collect_nodes(nodes: &[Node], out: &mut Vec<VarDecl>) {
    for node in nodes {
        match node {
            Node::RawText(_) => {}
            Node::Variable(name) => out.push(VarDecl::Str(name.clone())),
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                collect_condition(condition, out);
                collect_nodes(then_branch, out);
                if let Some(else_branch) = else_branch {
                    collect_nodes(else_branch, out);
                }
            }
        }
    }
}

fn collect_condition(condition: &Condition, out: &mut Vec<VarDecl>) {
    match condition {
        Condition::BoolVar(name) => out.push(VarDecl::Bool(name.clone())),
        Condition::Not(inner) | Condition::Brackets(inner) => collect_condition(inner, out),
        Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
            collect_condition(lhs, out);
            collect_condition(rhs, out);
        }
    }
}

fn resolve_conflicts(all: Vec<VarDecl>) -> Vec<VarDecl> {
    let mut seen = HashSet::new();
    let mut resolved: Vec<VarDecl> = Vec::new();
    for decl in all {
        if seen.insert(decl.name().to_string()) {
            resolved.push(decl);
            continue;
        }
        if !decl.is_bool() {
            continue;
        }
        if let Some(index) = resolved
            .iter()
            .position(|existing| existing.name() == decl.name() && !existing.is_bool())
        {
            log::debug!("variable `{}` is used as a flag, declaring it Bool", decl.name());
            resolved.remove(index);
            resolved.push(decl);
        }
    }
    resolved
}
