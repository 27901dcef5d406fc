//! Backtracking parser for `#if` conditions.
//!
//! ```text
//! condition := and_expr | or_expr | term
//! term      := brackets | not_expr | bool_var
//! and_expr  := term AND condition
//! or_expr   := term OR condition
//! not_expr  := NOT condition
//! brackets  := ( condition )
//! ```
//!
//! Every alternative runs on a copy of the cursor and only commits it on
//! success, so a failed attempt never moves the caller. `and_expr` and
//! `or_expr` share their leading `term`, so it is parsed once and the
//! operator decides which rule applies. `AND`/`OR` recurse into `condition`
//! for their right operand, which makes them right-associative.

use crate::ast::Condition;
use crate::lexer::{CondToken, Token};

#[derive(Debug, Clone, Copy)]
struct Cursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Cursor<'t> {
    fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    // `#then` ends the condition, so it never satisfies a grammar rule.
    fn consume(&mut self) -> Option<&'t Token> {
        let token = self.current();
        self.position += 1;
        match token {
            Some(Token::Then) => None,
            other => other,
        }
    }

    fn consume_cond(&mut self, expected: &CondToken) -> Option<()> {
        match self.consume() {
            Some(Token::Cond(token)) if token == expected => Some(()),
            _ => None,
        }
    }

    fn attempt<F>(&mut self, alternative: F) -> Option<Condition>
    where
        F: FnOnce(&mut Cursor<'t>) -> Option<Condition>,
    {
        let mut branch = *self;
        let node = alternative(&mut branch)?;
        *self = branch;
        Some(node)
    }
}

/// Parses the condition starting at `position` (just past `#if`/`#elseif`).
///
/// Returns the condition and the position just past the closing `#then`, or
/// `None` when no condition can be derived from the tokens.
pub fn parse_condition(tokens: &[Token], position: usize) -> Option<(Condition, usize)> {
    let mut cursor = Cursor { tokens, position };
    let condition = condition(&mut cursor)?;
    if let Some(Token::Then) = cursor.current() {
        cursor.position += 1;
    }
    Some((condition, cursor.position))
}

fn condition(cursor: &mut Cursor<'_>) -> Option<Condition> {
    let lhs = cursor.attempt(term)?;
    let combine: fn(Condition, Condition) -> Condition = match cursor.current() {
        Some(Token::Cond(CondToken::And)) => Condition::and,
        Some(Token::Cond(CondToken::Or)) => Condition::or,
        _ => return Some(lhs),
    };
    // A failed right operand leaves the cursor on the operator.
    match cursor.attempt(binary_rhs) {
        Some(rhs) => Some(combine(lhs, rhs)),
        None => Some(lhs),
    }
}

// Operator followed by the right operand of `and_expr`/`or_expr`.
fn binary_rhs(cursor: &mut Cursor<'_>) -> Option<Condition> {
    cursor.consume()?;
    condition(cursor)
}

fn term(cursor: &mut Cursor<'_>) -> Option<Condition> {
    cursor
        .attempt(brackets)
        .or_else(|| cursor.attempt(not_expr))
        .or_else(|| cursor.attempt(bool_var))
}

fn brackets(cursor: &mut Cursor<'_>) -> Option<Condition> {
    cursor.consume_cond(&CondToken::OpenParen)?;
    let inner = condition(cursor)?;
    cursor.consume_cond(&CondToken::CloseParen)?;
    Some(Condition::brackets(inner))
}

fn not_expr(cursor: &mut Cursor<'_>) -> Option<Condition> {
    cursor.consume_cond(&CondToken::Not)?;
    let inner = condition(cursor)?;
    Some(Condition::not(inner))
}

fn bool_var(cursor: &mut Cursor<'_>) -> Option<Condition> {
    match cursor.consume()? {
        Token::Cond(CondToken::BoolVariable(name)) => Some(Condition::var(name.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Token {
        Token::Cond(CondToken::BoolVariable(name.to_string()))
    }

    const AND: Token = Token::Cond(CondToken::And);
    const OR: Token = Token::Cond(CondToken::Or);
    const NOT: Token = Token::Cond(CondToken::Not);
    const OPEN: Token = Token::Cond(CondToken::OpenParen);
    const CLOSE: Token = Token::Cond(CondToken::CloseParen);

    #[test]
    fn single_bool_var() {
        let tokens = vec![
            Token::RawText("something".into()),
            Token::If,
            var("a"),
            Token::Then,
            Token::RawText("Okay".into()),
        ];
        assert_eq!(parse_condition(&tokens, 2), Some((Condition::var("a"), 4)));
    }

    #[test]
    fn and_with_negation() {
        let tokens = vec![Token::If, var("cond1"), AND, NOT, var("cond2"), Token::Then];
        assert_eq!(
            parse_condition(&tokens, 1),
            Some((
                Condition::and(Condition::var("cond1"), Condition::not(Condition::var("cond2"))),
                6
            ))
        );
    }

    #[test]
    fn and_is_right_associative() {
        let tokens = vec![Token::If, var("a"), AND, var("b"), AND, var("c"), Token::Then];
        let (condition, position) = parse_condition(&tokens, 1).unwrap();
        assert_eq!(
            condition,
            Condition::and(
                Condition::var("a"),
                Condition::and(Condition::var("b"), Condition::var("c"))
            )
        );
        assert_eq!(position, 7);
    }

    #[test]
    fn or_is_right_associative() {
        let tokens = vec![
            Token::If,
            var("a"),
            OR,
            var("b"),
            OR,
            var("c"),
            OR,
            var("d"),
            Token::Then,
            Token::RawText("Okay".into()),
        ];
        let (condition, position) = parse_condition(&tokens, 1).unwrap();
        assert_eq!(
            condition,
            Condition::or(
                Condition::var("a"),
                Condition::or(
                    Condition::var("b"),
                    Condition::or(Condition::var("c"), Condition::var("d"))
                )
            )
        );
        assert_eq!(position, 9);
    }

    #[test]
    fn brackets_group_the_left_operand() {
        let tokens = vec![
            Token::If,
            OPEN,
            var("a"),
            AND,
            var("b"),
            CLOSE,
            OR,
            NOT,
            var("c"),
            Token::Then,
        ];
        let (condition, _) = parse_condition(&tokens, 1).unwrap();
        assert_eq!(
            condition,
            Condition::or(
                Condition::brackets(Condition::and(Condition::var("a"), Condition::var("b"))),
                Condition::not(Condition::var("c"))
            )
        );
    }

    #[test]
    fn not_swallows_the_rest_of_the_condition() {
        let tokens = vec![Token::If, NOT, var("a"), AND, var("b"), Token::Then];
        let (condition, _) = parse_condition(&tokens, 1).unwrap();
        assert_eq!(
            condition,
            Condition::not(Condition::and(Condition::var("a"), Condition::var("b")))
        );
    }

    #[test]
    fn not_without_operand_fails() {
        let tokens = vec![Token::If, NOT, Token::Then];
        assert_eq!(parse_condition(&tokens, 1), None);
    }

    #[test]
    fn unbalanced_brackets_fail() {
        let tokens = vec![Token::If, OPEN, var("a"), Token::Then];
        assert_eq!(parse_condition(&tokens, 1), None);
    }

    #[test]
    fn thirty_levels_of_brackets_and_nots() {
        const DEPTH: usize = 30;

        let mut tokens = vec![Token::If];
        tokens.extend(std::iter::repeat(OPEN).take(DEPTH));
        tokens.extend(std::iter::repeat(NOT).take(DEPTH));
        tokens.push(var("a"));
        tokens.extend(std::iter::repeat(CLOSE).take(DEPTH));
        tokens.push(Token::Then);

        let mut expected = Condition::var("a");
        for _ in 0..DEPTH {
            expected = Condition::not(expected);
        }
        for _ in 0..DEPTH {
            expected = Condition::brackets(expected);
        }

        assert_eq!(parse_condition(&tokens, 1), Some((expected, tokens.len())));
    }

    #[test]
    fn failed_right_operand_falls_back_to_the_term() {
        let tokens = vec![Token::If, var("a"), OR, CLOSE, Token::Then];
        assert_eq!(parse_condition(&tokens, 1), Some((Condition::var("a"), 2)));
    }

    #[test]
    fn dangling_operator_is_left_for_the_caller() {
        let tokens = vec![Token::If, var("a"), AND, Token::Then];
        // `a` alone still parses; the cursor stops at the dangling AND.
        assert_eq!(parse_condition(&tokens, 1), Some((Condition::var("a"), 2)));
    }
}
