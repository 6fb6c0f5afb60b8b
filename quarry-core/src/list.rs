//! Comma separated lists of expressions

use crate::expr::Expr;
use crate::token::{Block, Token};

/// A comma separated list of expressions, eg. for columns or function
/// arguments
///
/// # Examples
/// ```
/// use quarry_core::{Block, CommaSeparated, Expr, Token};
///
/// let list = CommaSeparated::new([Expr::literal("hi"), Expr::literal("hello")]);
/// assert_eq!(list.flatten(), vec![Token::from("hi"), Token::from(","), Token::from("hello")]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommaSeparated {
    items: Vec<Expr>,
}

impl CommaSeparated {
    pub fn new<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, item: impl Into<Expr>) {
        self.items.push(item.into());
    }

    pub fn items(&self) -> &[Expr] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Block for CommaSeparated {
    fn flatten(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                tokens.push(Token::literal(","));
            }
            tokens.extend(item.flatten());
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variable;

    #[test]
    fn test_flatten_literals() {
        let list = CommaSeparated::new([Expr::literal("hi"), Expr::literal("hello")]);
        assert_eq!(
            list.flatten(),
            vec![Token::from("hi"), Token::from(","), Token::from("hello")]
        );
    }

    #[test]
    fn test_flatten_variables() {
        let a = Variable::new("a").unwrap();
        let b = Variable::new("b").unwrap();
        let list = CommaSeparated::new([a.clone(), b.clone()]);
        assert_eq!(
            list.flatten(),
            vec![Token::Param(a), Token::from(","), Token::Param(b)]
        );
    }

    #[test]
    fn test_single_item_has_no_comma() {
        let list = CommaSeparated::new([Expr::literal("only")]);
        assert_eq!(list.flatten(), vec![Token::from("only")]);
    }

    #[test]
    fn test_empty_list_flattens_to_nothing() {
        assert!(CommaSeparated::default().flatten().is_empty());
    }
}
