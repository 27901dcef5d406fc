use std::fmt;

/// Surface syntax of a token: the tag that opens it and, for tokens that
/// wrap a name, the tag that closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSyntax {
    pub tag: &'static str,
    pub end_tag: Option<&'static str>,
}

impl TokenSyntax {
    const fn open(tag: &'static str) -> Self {
        Self { tag, end_tag: None }
    }

    const fn wrapped(tag: &'static str, end_tag: &'static str) -> Self {
        Self {
            tag,
            end_tag: Some(end_tag),
        }
    }
}

/// Tokens that only exist between `#if`/`#elseif` and `#then`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CondToken {
    BoolVariable(String), // {{name}}
    Not,                  // NOT
    And,                  // AND
    Or,                   // OR
    OpenParen,            // (
    CloseParen,           // )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    RawText(String),
    Variable(String), // {{name}}
    If,               // #if
    Cond(CondToken),
    Then,   // #then
    ElseIf, // #elseif
    Else,   // #else
    EndIf,  // #endif
}

impl Token {
    pub const VARIABLE: TokenSyntax = TokenSyntax::wrapped("{{", "}}");
    pub const BOOL_VARIABLE: TokenSyntax = TokenSyntax::wrapped("{{", "}}");
    pub const IF: TokenSyntax = TokenSyntax::open("#if");
    pub const NOT: TokenSyntax = TokenSyntax::open("NOT");
    pub const AND: TokenSyntax = TokenSyntax::open("AND");
    pub const OR: TokenSyntax = TokenSyntax::open("OR");
    pub const OPEN_PAREN: TokenSyntax = TokenSyntax::open("(");
    pub const CLOSE_PAREN: TokenSyntax = TokenSyntax::open(")");
    pub const THEN: TokenSyntax = TokenSyntax::open("#then");
    pub const ELSE_IF: TokenSyntax = TokenSyntax::open("#elseif");
    pub const ELSE: TokenSyntax = TokenSyntax::open("#else");
    pub const END_IF: TokenSyntax = TokenSyntax::open("#endif");

    /// Syntax descriptor of this token, `None` for raw text.
    pub fn syntax(&self) -> Option<TokenSyntax> {
        let syntax = match self {
            Token::RawText(_) => return None,
            Token::Variable(_) => Self::VARIABLE,
            Token::If => Self::IF,
            Token::Cond(CondToken::BoolVariable(_)) => Self::BOOL_VARIABLE,
            Token::Cond(CondToken::Not) => Self::NOT,
            Token::Cond(CondToken::And) => Self::AND,
            Token::Cond(CondToken::Or) => Self::OR,
            Token::Cond(CondToken::OpenParen) => Self::OPEN_PAREN,
            Token::Cond(CondToken::CloseParen) => Self::CLOSE_PAREN,
            Token::Then => Self::THEN,
            Token::ElseIf => Self::ELSE_IF,
            Token::Else => Self::ELSE,
            Token::EndIf => Self::END_IF,
        };
        Some(syntax)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::RawText(text) => write!(f, "{:?}", text),
            Token::Variable(name) | Token::Cond(CondToken::BoolVariable(name)) => {
                write!(f, "{{{{{}}}}}", name)
            }
            other => match other.syntax() {
                Some(syntax) => f.write_str(syntax.tag),
                None => Ok(()),
            },
        }
    }
}

/// Tags that interrupt a run of raw text. `#elseif` is covered by `#else`.
const SPECIAL_TAGS: [TokenSyntax; 11] = [
    Token::VARIABLE,
    Token::IF,
    Token::OPEN_PAREN,
    Token::CLOSE_PAREN,
    Token::AND,
    Token::OR,
    Token::NOT,
    Token::BOOL_VARIABLE,
    Token::THEN,
    Token::ELSE,
    Token::END_IF,
];

#[derive(Debug, Clone, Copy)]
enum Rule {
    Variable,
    If,
    OpenParen,
    CloseParen,
    Not,
    BoolVariable,
    And,
    Or,
    Then,
    ElseIf,
    Else,
    EndIf,
}

// Priority order matters: `#elseif` must be tried before `#else`.
const RULES: [Rule; 12] = [
    Rule::Variable,
    Rule::If,
    Rule::OpenParen,
    Rule::CloseParen,
    Rule::Not,
    Rule::BoolVariable,
    Rule::And,
    Rule::Or,
    Rule::Then,
    Rule::ElseIf,
    Rule::Else,
    Rule::EndIf,
];

impl Rule {
    fn syntax(self) -> TokenSyntax {
        match self {
            Rule::Variable => Token::VARIABLE,
            Rule::If => Token::IF,
            Rule::OpenParen => Token::OPEN_PAREN,
            Rule::CloseParen => Token::CLOSE_PAREN,
            Rule::Not => Token::NOT,
            Rule::BoolVariable => Token::BOOL_VARIABLE,
            Rule::And => Token::AND,
            Rule::Or => Token::OR,
            Rule::Then => Token::THEN,
            Rule::ElseIf => Token::ELSE_IF,
            Rule::Else => Token::ELSE,
            Rule::EndIf => Token::END_IF,
        }
    }

    fn allowed(self, in_condition: bool) -> bool {
        match self {
            Rule::Variable | Rule::If | Rule::ElseIf | Rule::Else | Rule::EndIf => !in_condition,
            _ => in_condition,
        }
    }
}

/// Lexer state for a single template. One instance per `tokenize` call.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: usize,
    in_condition: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            in_condition: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    /// Produces the next raw (unprocessed) token. Raw text inside a
    /// condition is skipped, so this may consume input without yielding.
    pub fn next_token(&mut self) -> Option<Token> {
        while !self.remaining().is_empty() {
            if let Some(token) = self.match_rules() {
                log::trace!("lexed {} at {}", token, self.cursor);
                return Some(token);
            }
            if let Some(token) = self.raw_text() {
                return Some(token);
            }
        }
        None
    }

    fn match_rules(&mut self) -> Option<Token> {
        RULES.iter().find_map(|rule| self.try_rule(*rule))
    }

    fn try_rule(&mut self, rule: Rule) -> Option<Token> {
        if !rule.allowed(self.in_condition) {
            return None;
        }
        let syntax = rule.syntax();
        let rest = self.remaining();
        if !rest.starts_with(syntax.tag) {
            return None;
        }

        let (inner, consumed) = match syntax.end_tag {
            None => ("", syntax.tag.len()),
            Some(end_tag) => {
                let body = &rest[syntax.tag.len()..];
                let end = body.find(end_tag)?;
                (&body[..end], syntax.tag.len() + end + end_tag.len())
            }
        };
        self.advance(consumed);

        let token = match rule {
            Rule::Variable => Token::Variable(inner.trim().to_string()),
            Rule::If => {
                self.in_condition = true;
                Token::If
            }
            Rule::OpenParen => Token::Cond(CondToken::OpenParen),
            Rule::CloseParen => Token::Cond(CondToken::CloseParen),
            Rule::Not => Token::Cond(CondToken::Not),
            Rule::BoolVariable => Token::Cond(CondToken::BoolVariable(inner.trim().to_string())),
            Rule::And => Token::Cond(CondToken::And),
            Rule::Or => Token::Cond(CondToken::Or),
            Rule::Then => {
                self.in_condition = false;
                Token::Then
            }
            Rule::ElseIf => {
                self.in_condition = true;
                Token::ElseIf
            }
            Rule::Else => Token::Else,
            Rule::EndIf => Token::EndIf,
        };
        Some(token)
    }

    /// Consumes text up to the next special tag. A tag that sits right at the
    /// cursor but failed every rule (e.g. `{{` without `}}`) is consumed as a
    /// single character so the lexer always makes progress.
    fn raw_text(&mut self) -> Option<Token> {
        let rest = self.remaining();
        let next = SPECIAL_TAGS
            .iter()
            .filter_map(|syntax| rest.find(syntax.tag))
            .min()
            .unwrap_or(rest.len());

        if next == 0 {
            let ch = rest.chars().next()?;
            self.advance(ch.len_utf8());
            return Some(Token::RawText(ch.to_string()));
        }

        self.advance(next);
        if self.in_condition {
            None
        } else {
            Some(Token::RawText(rest[..next].to_string()))
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Turns template text into the final token sequence: lexes, drops empty
/// raw text, merges adjacent raw text and trims layout whitespace after
/// `#then`, `#else` and `#endif`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = merge_raw_texts(Tokenizer::new(text));
    beautify(&mut tokens);
    tokens.retain(|token| !matches!(token, Token::RawText(text) if text.is_empty()));
    log::debug!("tokenized {} bytes into {} tokens", text.len(), tokens.len());
    tokens
}

fn merge_raw_texts(tokens: impl IntoIterator<Item = Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::new();
    for token in tokens {
        if let Token::RawText(text) = &token {
            if text.is_empty() {
                continue;
            }
            if let Some(Token::RawText(prev)) = merged.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        merged.push(token);
    }
    merged
}

// Only the immediately preceding token is inspected.
fn beautify(tokens: &mut [Token]) {
    for i in 1..tokens.len() {
        if !matches!(tokens[i - 1], Token::Then | Token::Else | Token::EndIf) {
            continue;
        }
        if let Token::RawText(text) = &mut tokens[i] {
            let trimmed = drop_layout_whitespace(text);
            if trimmed.len() != text.len() {
                *text = trimmed.to_string();
            }
        }
    }
}

/// Strips leading spaces and then at most one newline.
fn drop_layout_whitespace(text: &str) -> &str {
    let text = text.trim_start_matches(' ');
    text.strip_prefix('\n').unwrap_or(text)
}
