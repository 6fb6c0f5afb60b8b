//! INSERT statement builder implementations

use quarry_core::{
    Block, Column, CommaSeparated, Error, Expr, IntoOperand, Operand, Result, Table, Token,
    TypedDefault, Variable,
};

use super::common::{record_error, IntoTable, QueryBuilder};
use super::select::SelectBuilder;

/// INSERT builder in initial state (before columns() is called).
/// Cannot be compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBuilderInitial {
    table: Result<Table>,
}

/// INSERT builder in complete state (after columns() is called).
///
/// Without explicit values every column is bound to a required parameter
/// named after it.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBuilderComplete {
    table: Result<Table>,
    columns: Vec<Column>,
    source: InsertSource,
    error: Option<Error>,
}

/// Where inserted rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// One required parameter per column
    Parameters(Vec<Variable>),
    /// `VALUES (...)` with one value per column
    Values(Vec<Expr>),
    /// `VALUES (...)` with caller supplied tokens
    Raw(Vec<Token>),
    /// Rows produced by a SELECT
    Select(Box<SelectBuilder>),
}

impl InsertBuilderInitial {
    /// Create a new INSERT builder in initial state
    pub fn new<T: IntoTable>(table: T) -> Self {
        Self {
            table: table.into_table(),
        }
    }

    /// Name the target columns, transitioning to InsertBuilderComplete
    ///
    /// # Examples
    /// ```
    /// use quarry::{insert, QueryBuilder};
    ///
    /// let query = insert("user").columns(["name", "email"]).to_query().unwrap();
    /// assert_eq!(
    ///     query.sql(),
    ///     "INSERT INTO \"user\" (\"name\", \"email\") VALUES ($1, $2)"
    /// );
    /// assert_eq!(query.signature().to_string(), "(name, email)");
    /// ```
    pub fn columns<I, S>(self, columns: I) -> InsertBuilderComplete
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut error = None;
        let mut parsed = Vec::new();
        let mut params = Vec::new();
        for name in columns {
            let column = match Column::parse(name.as_ref()) {
                Ok(column) => column,
                Err(err) => {
                    record_error(&mut error, Err(err));
                    continue;
                }
            };
            match column_variable(&column, TypedDefault::NoDefault) {
                Ok(var) => params.push(var),
                Err(err) => record_error(&mut error, Err(err)),
            }
            parsed.push(column);
        }
        InsertBuilderComplete {
            table: self.table,
            columns: parsed,
            source: InsertSource::Parameters(params),
            error,
        }
    }
}

impl InsertBuilderComplete {
    /// Insert one row of values, one per column.
    ///
    /// Plain data is bound through a parameter named after its column, with
    /// the data as default.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: IntoOperand,
    {
        let operands: Vec<Operand> = values.into_iter().map(IntoOperand::into_operand).collect();
        if let Err(err) = self.check_arity(operands.len()) {
            record_error(&mut self.error, Err(err));
            return self;
        }

        let converted = self
            .columns
            .iter()
            .zip(operands)
            .map(|(column, operand)| match operand {
                Operand::Expr(expr) => Ok(expr),
                Operand::Bind(default) => Ok(column_variable(column, default)?.into()),
            })
            .collect::<Result<Vec<Expr>>>();
        match converted {
            Ok(values) => self.source = InsertSource::Values(values),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Insert the rows returned by a SELECT
    pub fn values_from_select(mut self, select: SelectBuilder) -> Self {
        match self.check_arity(select.columns().len()) {
            Ok(()) => self.source = InsertSource::Select(Box::new(select)),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Use raw tokens inside `VALUES (...)`, unchecked
    pub fn values_raw<I, T>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        self.source = InsertSource::Raw(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn source(&self) -> &InsertSource {
        &self.source
    }

    fn check_arity(&self, found: usize) -> Result<()> {
        if found != self.columns.len() {
            return Err(Error::arity_mismatch(self.columns.len(), found));
        }
        Ok(())
    }
}

fn column_variable(column: &Column, default: TypedDefault) -> Result<Variable> {
    Variable::with_default(&column.as_arg(), default)
}

fn table_tokens(table: &Result<Table>) -> Vec<Token> {
    match table {
        Ok(table) => vec![Token::from("INSERT INTO"), table.to_string().into()],
        Err(_) => vec![Token::from("INSERT INTO")],
    }
}

impl Block for InsertBuilderInitial {
    fn flatten(&self) -> Vec<Token> {
        table_tokens(&self.table)
    }
}

impl Block for InsertBuilderComplete {
    fn flatten(&self) -> Vec<Token> {
        let mut tokens = table_tokens(&self.table);
        tokens.push("(".into());
        tokens.extend(CommaSeparated::new(self.columns.iter().cloned()).flatten());
        tokens.push(")".into());

        let values = match &self.source {
            InsertSource::Select(select) => {
                tokens.extend(select.flatten());
                return tokens;
            }
            InsertSource::Parameters(params) => {
                CommaSeparated::new(params.iter().cloned()).flatten()
            }
            InsertSource::Values(values) => CommaSeparated::new(values.iter().cloned()).flatten(),
            InsertSource::Raw(raw) => raw.clone(),
        };
        tokens.push("VALUES".into());
        tokens.push("(".into());
        tokens.extend(values);
        tokens.push(")".into());
        tokens
    }
}

impl QueryBuilder for InsertBuilderInitial {
    fn validate(&self) -> Result<()> {
        self.table.as_ref().map_err(Clone::clone)?;
        Err(Error::invalid_query(
            "INSERT requires columns to be specified with .columns()",
        ))
    }
}

impl QueryBuilder for InsertBuilderComplete {
    fn validate(&self) -> Result<()> {
        self.table.as_ref().map_err(Clone::clone)?;
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.columns.is_empty() {
            return Err(Error::invalid_query("INSERT requires at least one column"));
        }
        if let InsertSource::Select(select) = &self.source {
            select.validate()?;
        }
        Ok(())
    }
}
