/// Boolean expression between `#if`/`#elseif` and `#then`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    BoolVar(String),
    Not(Box<Condition>),
    Brackets(Box<Condition>), // explicit parentheses, evaluates to its inner condition
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn var(name: impl Into<String>) -> Self {
        Condition::BoolVar(name.into())
    }

    pub fn not(cond: Condition) -> Self {
        Condition::Not(Box::new(cond))
    }

    pub fn brackets(cond: Condition) -> Self {
        Condition::Brackets(Box::new(cond))
    }

    pub fn and(lhs: Condition, rhs: Condition) -> Self {
        Condition::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Condition, rhs: Condition) -> Self {
        Condition::Or(Box::new(lhs), Box::new(rhs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    RawText(String),
    Variable(String),
    If {
        condition: Condition,
        then_branch: Ast,
        else_branch: Option<Ast>, // `#elseif` chains nest another `If` here
    },
}

/// An ordered statement sequence. Every branch of an `If` is its own `Ast`.
pub type Ast = Vec<Node>;
