use crate::ast::*;
use crate::condition::parse_condition;
use crate::error::ParseError;
use crate::lexer::Token;

const BRANCH_END: [Token; 3] = [Token::ElseIf, Token::Else, Token::EndIf];
const ELSE_END: [Token; 1] = [Token::EndIf];

pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn consume(&mut self) -> Option<&'t Token> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    pub fn parse(&mut self) -> Result<Ast, ParseError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.consume() {
            self.parse_statement(token, &mut nodes)?;
        }
        log::debug!("parsed {} top-level statements", nodes.len());
        Ok(nodes)
    }

    fn parse_statement(&mut self, token: &'t Token, nodes: &mut Ast) -> Result<(), ParseError> {
        match token {
            Token::RawText(text) => nodes.push(Node::RawText(text.clone())),
            Token::Variable(name) => nodes.push(Node::Variable(name.clone())),
            Token::If => nodes.push(self.parse_if()?),
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: other.clone(),
                    next: self.peek().cloned(),
                })
            }
        }
        Ok(())
    }

    /// Parses an `#if` (or `#elseif`) block; the cursor sits just past the
    /// opening tag. An `#elseif` becomes a nested `If` that is the whole else
    /// branch, and the chain shares the final `#endif`.
    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let condition = self.parse_condition()?;
        let (then_branch, end) = self.parse_until(&BRANCH_END)?;

        let else_branch = match end {
            Token::ElseIf => Some(vec![self.parse_if()?]),
            Token::Else => Some(self.parse_until(&ELSE_END)?.0),
            _ => None,
        };

        Ok(Node::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        match parse_condition(self.tokens, self.position) {
            Some((condition, next)) => {
                self.position = next;
                Ok(condition)
            }
            None => Err(ParseError::InvalidCondition {
                location: self.location(),
                position: self.position,
            }),
        }
    }

    /// Parses statements until one of `end` is consumed, returning the
    /// statements and the terminator that stopped them.
    fn parse_until(&mut self, end: &[Token]) -> Result<(Ast, &'t Token), ParseError> {
        let mut nodes = Vec::new();
        loop {
            let token = self.consume().ok_or_else(|| ParseError::UnterminatedIf {
                expected: end
                    .iter()
                    .filter_map(|token| token.syntax())
                    .map(|syntax| syntax.tag)
                    .collect(),
            })?;
            if end.contains(token) {
                return Ok((nodes, token));
            }
            self.parse_statement(token, &mut nodes)?;
        }
    }

    /// Previous, current and next token around the cursor.
    fn location(&self) -> String {
        let start = self.position.saturating_sub(1);
        let end = (self.position + 2).min(self.tokens.len());
        self.tokens
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
