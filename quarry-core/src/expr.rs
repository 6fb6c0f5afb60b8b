//! Expression model: columns, variables, operators, BETWEEN and function calls

use std::fmt::{self, Display};
use std::ops::{Add, Div, Mul, Sub};

use crate::ident::{clean_ident, quote_ident};
use crate::list::CommaSeparated;
use crate::operator::Operator;
use crate::token::{Block, Token};
use crate::value::{Value, ValueType};
use crate::variable::{TypedDefault, Variable};
use crate::{Error, Result};

/// SQL table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
}

impl Table {
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::invalid_identifier(name));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a column from this table
    pub fn col(&self, column: &str) -> Result<Column> {
        Column::qualified(self.clone(), column)
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_ident(&self.name))
    }
}

/// SQL column, optionally qualified by its table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    table: Option<Table>,
    name: String,
}

impl Column {
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::invalid_identifier(name));
        }
        Ok(Self {
            table: None,
            name: name.to_string(),
        })
    }

    pub fn qualified(table: Table, name: &str) -> Result<Self> {
        let mut column = Self::new(name)?;
        column.table = Some(table);
        Ok(column)
    }

    /// Parse `column` or `table.column`
    ///
    /// # Examples
    /// ```
    /// use quarry_core::Column;
    ///
    /// let id = Column::parse("users.id").unwrap();
    /// assert_eq!(id.to_string(), "\"users\".\"id\"");
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        match name.split_once('.') {
            Some((table, column)) => Self::qualified(Table::new(table)?, column),
            None => Self::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Identifier used to name parameters bound against this column,
    /// `<table>_<column>` when qualified
    pub fn as_arg(&self) -> String {
        let name = clean_ident(&self.name);
        match &self.table {
            Some(table) => format!("{}_{name}", clean_ident(table.name())),
            None => name,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table {
            write!(f, "{table}.")?;
        }
        f.write_str(&quote_ident(&self.name))
    }
}

/// Binary expression: `lhs op rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub lhs: Box<Expr>,
    pub op: Operator,
    pub rhs: Box<Expr>,
}

impl Expression {
    pub fn new(lhs: impl Into<Expr>, op: Operator, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        }
    }
}

/// `val BETWEEN min AND max`
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    pub val: Box<Expr>,
    pub min: Box<Expr>,
    pub max: Box<Expr>,
}

impl Between {
    pub fn new(val: impl Into<Expr>, min: impl Into<Expr>, max: impl Into<Expr>) -> Self {
        Self {
            val: Box::new(val.into()),
            min: Box::new(min.into()),
            max: Box::new(max.into()),
        }
    }
}

/// SQL functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Function {
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::Count => "COUNT",
            Function::Sum => "SUM",
            Function::Avg => "AVG",
            Function::Min => "MIN",
            Function::Max => "MAX",
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL function call
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub func: Function,
    pub args: CommaSeparated,
}

impl FunctionCall {
    pub fn new<I, E>(func: Function, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self {
            func,
            args: CommaSeparated::new(args),
        }
    }

    /// `COUNT(*)`
    pub fn count_all() -> Self {
        Self::new(Function::Count, [Expr::literal("*")])
    }

    pub fn count(arg: impl Into<Expr>) -> Self {
        Self::new(Function::Count, [arg])
    }

    pub fn sum(arg: impl Into<Expr>) -> Self {
        Self::new(Function::Sum, [arg])
    }

    pub fn avg(arg: impl Into<Expr>) -> Self {
        Self::new(Function::Avg, [arg])
    }

    pub fn min(arg: impl Into<Expr>) -> Self {
        Self::new(Function::Min, [arg])
    }

    pub fn max(arg: impl Into<Expr>) -> Self {
        Self::new(Function::Max, [arg])
    }
}

/// Anything that can appear as an operand in a SQL expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Column),
    Variable(Variable),
    Expression(Expression),
    Between(Between),
    Function(FunctionCall),
    /// Raw SQL fragment, emitted verbatim.
    ///
    /// **Warning**: never build one from user input.
    Literal(String),
    List(CommaSeparated),
}

impl Expr {
    pub fn literal(sql: impl Into<String>) -> Self {
        Expr::Literal(sql.into())
    }

    /// Tokens for this value when nested inside another expression.
    /// Composite values are wrapped in parentheses.
    pub fn as_operand(&self) -> Vec<Token> {
        match self {
            Expr::Column(_) | Expr::Variable(_) | Expr::Literal(_) => self.flatten(),
            Expr::Expression(_) | Expr::Between(_) | Expr::Function(_) | Expr::List(_) => {
                let mut tokens = vec![Token::literal("(")];
                tokens.extend(self.flatten());
                tokens.push(Token::literal(")"));
                tokens
            }
        }
    }

    /// Whether this value evaluates to a boolean
    pub fn is_boolean(&self) -> bool {
        match self {
            Expr::Variable(var) => var.is_boolean(),
            Expr::Expression(expr) => expr.op.is_boolean(),
            Expr::Between(_) => true,
            Expr::Column(_) | Expr::Function(_) | Expr::Literal(_) | Expr::List(_) => false,
        }
    }

    /// Base name for variables synthesized against this value
    fn arg_stem(&self) -> String {
        match self {
            Expr::Column(column) => column.as_arg(),
            Expr::Variable(var) => var.name().to_string(),
            Expr::Function(call) => call.func.as_str().to_lowercase(),
            Expr::Expression(_) | Expr::Between(_) | Expr::Literal(_) | Expr::List(_) => {
                "expr".to_string()
            }
        }
    }

    /// Turn `other` into a value, synthesizing a variable named after this
    /// value when it isn't one already. Equality uses the bare name, every
    /// other operation appends `_<opname>`. A variable on the left always
    /// gets the suffix so the two sides never share a parameter slot.
    fn convert_operand(&self, other: impl IntoOperand, opname: &str) -> Expr {
        match other.into_operand() {
            Operand::Expr(expr) => expr,
            Operand::Bind(default) => {
                let mut name = self.arg_stem();
                if opname != Operator::Eq.name() || matches!(self, Expr::Variable(_)) {
                    name.push('_');
                    name.push_str(opname);
                }
                Expr::Variable(Variable::synthesized(name, default))
            }
        }
    }

    /// Build `self op other`, binding plain data through a synthesized
    /// variable named after this value
    pub fn compare(self, op: Operator, other: impl IntoOperand) -> Expr {
        let rhs = self.convert_operand(other, op.name());
        Expr::Expression(Expression::new(self, op, rhs))
    }
}

impl Block for Expr {
    fn flatten(&self) -> Vec<Token> {
        match self {
            Expr::Column(column) => vec![Token::literal(column.to_string())],
            Expr::Variable(var) => vec![Token::Param(var.clone())],
            Expr::Expression(expr) => {
                let mut tokens = expr.lhs.as_operand();
                tokens.push(Token::literal(expr.op.as_str()));
                tokens.extend(expr.rhs.as_operand());
                tokens
            }
            Expr::Between(between) => {
                let mut tokens = between.val.as_operand();
                tokens.push(Token::literal("BETWEEN"));
                tokens.extend(between.min.as_operand());
                tokens.push(Token::literal("AND"));
                tokens.extend(between.max.as_operand());
                tokens
            }
            Expr::Function(call) => {
                let mut tokens = vec![Token::literal(call.func.as_str()), Token::literal("(")];
                tokens.extend(call.args.flatten());
                tokens.push(Token::literal(")"));
                tokens
            }
            Expr::Literal(sql) => vec![Token::literal(sql.clone())],
            Expr::List(list) => list.flatten(),
        }
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Expr::Column(column)
    }
}

impl From<Variable> for Expr {
    fn from(var: Variable) -> Self {
        Expr::Variable(var)
    }
}

impl From<Expression> for Expr {
    fn from(expr: Expression) -> Self {
        Expr::Expression(expr)
    }
}

impl From<Between> for Expr {
    fn from(between: Between) -> Self {
        Expr::Between(between)
    }
}

impl From<FunctionCall> for Expr {
    fn from(call: FunctionCall) -> Self {
        Expr::Function(call)
    }
}

impl From<CommaSeparated> for Expr {
    fn from(list: CommaSeparated) -> Self {
        Expr::List(list)
    }
}

/// Right hand side of a comparison before conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Already a value, used as is
    Expr(Expr),
    /// Plain data, bound through a synthesized variable with this default
    Bind(TypedDefault),
}

/// Trait for types that can be used as comparison operands
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Operand {
        self
    }
}

macro_rules! operand_from_expr {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOperand for $ty {
                fn into_operand(self) -> Operand {
                    Operand::Expr(self.into())
                }
            }
        )*
    };
}

macro_rules! operand_from_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOperand for $ty {
                fn into_operand(self) -> Operand {
                    Operand::Bind(self.into())
                }
            }
        )*
    };
}

operand_from_expr!(Expr, Column, Variable, Expression, Between, FunctionCall, CommaSeparated);

operand_from_default!(
    TypedDefault,
    ValueType,
    Value,
    (),
    bool,
    i32,
    i64,
    f32,
    f64,
    String,
    &str,
    Vec<u8>,
    serde_json::Value,
);

#[cfg(feature = "uuid-support")]
operand_from_default!(uuid::Uuid);

#[cfg(feature = "datetime-support")]
operand_from_default!(chrono::DateTime<chrono::Utc>);

#[cfg(feature = "decimal-support")]
operand_from_default!(rust_decimal::Decimal);

impl<T> IntoOperand for Option<T>
where
    T: Into<Value>,
{
    fn into_operand(self) -> Operand {
        Operand::Bind(self.into())
    }
}

/// Expression building methods available on every value.
///
/// Comparisons accept plain data and bind it through a synthesized variable:
///
/// ```
/// use quarry_core::{Block, Column, ExprExt, compile};
///
/// let age = Column::new("age").unwrap();
/// let query = compile(&age.greater_than(18).flatten());
/// assert_eq!(query.text, "\"age\" > $1");
/// assert_eq!(query.parameters[0].name, "age_gt");
/// ```
pub trait ExprExt: Into<Expr> + Sized {
    fn equals(self, other: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Eq, other)
    }

    fn not_equals(self, other: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Ne, other)
    }

    fn less_equal(self, other: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Le, other)
    }

    fn less_than(self, other: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Lt, other)
    }

    fn greater_equal(self, other: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Ge, other)
    }

    fn greater_than(self, other: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Gt, other)
    }

    fn like(self, pattern: impl IntoOperand) -> Expr {
        self.into().compare(Operator::Like, pattern)
    }

    fn between(self, min: impl IntoOperand, max: impl IntoOperand) -> Expr {
        let val = self.into();
        let min = val.convert_operand(min, "min");
        let max = val.convert_operand(max, "max");
        Expr::Between(Between::new(val, min, max))
    }

    /// AND when either side is boolean, arithmetic `+` otherwise
    fn plus(self, other: impl Into<Expr>) -> Expr {
        let (lhs, rhs) = (self.into(), other.into());
        let op = if lhs.is_boolean() || rhs.is_boolean() {
            Operator::And
        } else {
            Operator::Add
        };
        Expr::Expression(Expression::new(lhs, op, rhs))
    }

    fn minus(self, other: impl Into<Expr>) -> Expr {
        Expr::Expression(Expression::new(self, Operator::Sub, other))
    }

    fn times(self, other: impl Into<Expr>) -> Expr {
        Expr::Expression(Expression::new(self, Operator::Mul, other))
    }

    /// OR when either side is boolean, arithmetic `/` otherwise
    fn divided_by(self, other: impl Into<Expr>) -> Expr {
        let (lhs, rhs) = (self.into(), other.into());
        let op = if lhs.is_boolean() || rhs.is_boolean() {
            Operator::Or
        } else {
            Operator::Div
        };
        Expr::Expression(Expression::new(lhs, op, rhs))
    }

    fn and_also(self, other: impl Into<Expr>) -> Expr {
        Expr::Expression(Expression::new(self, Operator::And, other))
    }

    fn or_else(self, other: impl Into<Expr>) -> Expr {
        Expr::Expression(Expression::new(self, Operator::Or, other))
    }
}

impl<T: Into<Expr>> ExprExt for T {}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        self.plus(rhs)
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        self.minus(rhs)
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        self.times(rhs)
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        self.divided_by(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(sql: &str) -> Expr {
        Expr::literal(sql)
    }

    fn param_name(expr: &Expr) -> &str {
        match expr {
            Expr::Variable(var) => var.name(),
            other => panic!("expected a variable, got {other:?}"),
        }
    }

    fn rhs(expr: &Expr) -> &Expr {
        match expr {
            Expr::Expression(expr) => &expr.rhs,
            other => panic!("expected an expression, got {other:?}"),
        }
    }

    #[test]
    fn test_column_rendering() {
        assert_eq!(Column::new("name\"").unwrap().to_string(), "\"name\"\"\"");
        let col = Table::new("table").unwrap().col("val").unwrap();
        assert_eq!(col.to_string(), "\"table\".\"val\"");
        assert_eq!(Expr::from(col.clone()).flatten(), vec![Token::from("\"table\".\"val\"")]);
        assert_eq!(Expr::from(col.clone()).as_operand(), Expr::from(col).flatten());
    }

    #[test]
    fn test_empty_names_rejected() {
        assert_eq!(Column::new("").unwrap_err(), Error::invalid_identifier(""));
        assert_eq!(Table::new("").unwrap_err(), Error::invalid_identifier(""));
    }

    #[test]
    fn test_parse_dotted() {
        let col = Column::parse("users.id").unwrap();
        assert_eq!(col.table().map(Table::name), Some("users"));
        assert_eq!(col.name(), "id");
        assert_eq!(Column::parse("id").unwrap(), Column::new("id").unwrap());
        assert!(Column::parse(".id").is_err());
        assert!(Column::parse("users.").is_err());
    }

    #[test]
    fn test_as_arg() {
        assert_eq!(Column::new("age").unwrap().as_arg(), "age");
        assert_eq!(Column::new("first name").unwrap().as_arg(), "firstname");
        let col = Table::new("users").unwrap().col("id").unwrap();
        assert_eq!(col.as_arg(), "users_id");
    }

    #[test]
    fn test_comparison_operators() {
        let cases: [(fn(Expr, Expr) -> Expr, Operator); 6] = [
            (|a: Expr, b: Expr| a.equals(b), Operator::Eq),
            (|a: Expr, b: Expr| a.not_equals(b), Operator::Ne),
            (|a: Expr, b: Expr| a.less_equal(b), Operator::Le),
            (|a: Expr, b: Expr| a.less_than(b), Operator::Lt),
            (|a: Expr, b: Expr| a.greater_equal(b), Operator::Ge),
            (|a: Expr, b: Expr| a.greater_than(b), Operator::Gt),
        ];
        for (build, op) in cases {
            let expr = build(lit("a"), lit("b"));
            assert_eq!(expr, Expr::Expression(Expression::new(lit("a"), op, lit("b"))));
            assert!(expr.is_boolean());
        }
    }

    #[test]
    fn test_like() {
        let expr = lit("a").like(lit("b"));
        assert_eq!(
            expr,
            Expr::Expression(Expression::new(lit("a"), Operator::Like, lit("b")))
        );
    }

    #[test]
    fn test_between() {
        let expr = lit("a").between(lit("b"), lit("c"));
        assert_eq!(expr, Expr::Between(Between::new(lit("a"), lit("b"), lit("c"))));
        assert!(expr.is_boolean());
        assert_eq!(
            expr.flatten(),
            vec![
                Token::from("a"),
                Token::from("BETWEEN"),
                Token::from("b"),
                Token::from("AND"),
                Token::from("c"),
            ]
        );
    }

    #[test]
    fn test_synthesized_names() {
        let age = Column::new("age").unwrap();
        assert_eq!(param_name(rhs(&age.clone().greater_than(5))), "age_gt");
        assert_eq!(param_name(rhs(&age.clone().less_equal(5))), "age_le");
        assert_eq!(param_name(rhs(&age.clone().not_equals(5))), "age_ne");
        assert_eq!(param_name(rhs(&age.clone().like("%1"))), "age_like");
        assert_eq!(param_name(rhs(&age.equals(5))), "age");

        let id = Table::new("users").unwrap().col("id").unwrap();
        assert_eq!(param_name(rhs(&id.equals(ValueType::I64))), "users_id");
    }

    #[test]
    fn test_variable_compared_with_data_gets_own_slot() {
        let x = Variable::new("x").unwrap();
        let expr = Expr::from(x.clone()).equals(5);
        assert_eq!(param_name(rhs(&expr)), "x_eq");

        let compiled = crate::compiler::compile(&expr.flatten());
        assert_eq!(compiled.text, "$1 = $2");
        assert_eq!(compiled.parameters.len(), 2);
        assert!(compiled.diagnostics.is_empty());
        assert_eq!(compiled.parameters[1].default, Some(Value::I32(5)));

        assert_eq!(param_name(rhs(&Expr::from(x).greater_than(5))), "x_gt");
    }

    #[test]
    fn test_between_synthesizes_min_and_max() {
        let expr = Column::new("price").unwrap().between(1, TypedDefault::NoDefault);
        let Expr::Between(between) = expr else {
            panic!("expected BETWEEN");
        };
        assert_eq!(param_name(&between.min), "price_min");
        assert_eq!(param_name(&between.max), "price_max");
    }

    #[test]
    fn test_synthesized_default_kinds() {
        let col = || Column::new("id").unwrap();
        let defaults = [
            (col().equals(TypedDefault::NoDefault), TypedDefault::NoDefault),
            (col().equals(()), TypedDefault::Null),
            (col().equals(None::<i32>), TypedDefault::Null),
            (col().equals(ValueType::I32), TypedDefault::Typed(ValueType::I32)),
            (col().equals(101), TypedDefault::Value(Value::I32(101))),
        ];
        for (expr, expected) in defaults {
            let Expr::Variable(var) = rhs(&expr) else {
                panic!("expected a variable");
            };
            assert_eq!(var.default(), &expected);
        }
    }

    #[test]
    fn test_existing_values_are_not_converted() {
        let var = Variable::new("who").unwrap();
        let expr = Column::new("name").unwrap().equals(var.clone());
        assert_eq!(rhs(&expr), &Expr::Variable(var));
    }

    #[test]
    fn test_plus_on_booleans_is_and() {
        let a = Column::new("a").unwrap().equals(1);
        let b = Column::new("b").unwrap().equals(2);
        let Expr::Expression(expr) = a + b else {
            panic!("expected an expression");
        };
        assert_eq!(expr.op, Operator::And);
    }

    #[test]
    fn test_plus_on_numbers_is_addition() {
        let a = Expr::from(Column::new("a").unwrap());
        let Expr::Expression(expr) = a + Column::new("b").unwrap() else {
            panic!("expected an expression");
        };
        assert_eq!(expr.op, Operator::Add);
        assert!(!Expr::Expression(expr).is_boolean());
    }

    #[test]
    fn test_divide_on_booleans_is_or() {
        let a = Column::new("a").unwrap().equals(1);
        let Expr::Expression(expr) = a / Column::new("b").unwrap() else {
            panic!("expected an expression");
        };
        assert_eq!(expr.op, Operator::Or);

        let n = Expr::from(Column::new("n").unwrap());
        let Expr::Expression(expr) = n / Column::new("d").unwrap() else {
            panic!("expected an expression");
        };
        assert_eq!(expr.op, Operator::Div);
    }

    #[test]
    fn test_boolean_variable_triggers_and() {
        let flag = Variable::with_default("flag", true).unwrap();
        let Expr::Expression(expr) = Column::new("x").unwrap().plus(flag) else {
            panic!("expected an expression");
        };
        assert_eq!(expr.op, Operator::And);
    }

    #[test]
    fn test_nested_expressions_are_parenthesized() {
        let expr = lit("a").equals(lit("b")).or_else(lit("c").equals(lit("d")));
        let text: Vec<_> = expr
            .flatten()
            .iter()
            .map(|t| t.as_literal().unwrap().to_string())
            .collect();
        assert_eq!(
            text,
            ["(", "a", "=", "b", ")", "OR", "(", "c", "=", "d", ")"]
        );
    }

    #[test]
    fn test_function_call() {
        let call = FunctionCall::count(Column::new("id").unwrap());
        let expr = Expr::from(call);
        assert_eq!(
            expr.flatten(),
            vec![
                Token::from("COUNT"),
                Token::from("("),
                Token::from("\"id\""),
                Token::from(")"),
            ]
        );
        assert_eq!(expr.as_operand().len(), 6);
        assert!(!expr.is_boolean());
    }

    #[test]
    fn test_function_stem() {
        let expr = FunctionCall::count_all().greater_than(10);
        assert_eq!(param_name(rhs(&expr)), "count_gt");
    }

    #[test]
    fn test_list_operand_is_parenthesized() {
        let list = CommaSeparated::new([lit("1"), lit("2")]);
        let expr = Expr::from(list);
        assert_eq!(expr.as_operand().first(), Some(&Token::from("(")));
        assert_eq!(expr.as_operand().last(), Some(&Token::from(")")));
    }
}
