//! Callable argument binders for compiled queries

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compiler::CompiledQuery;
use crate::params::ParameterEntry;
use crate::value::{Value, ValueType};
use crate::{Error, Result};

/// Arguments for one binder call: positional values followed by keywords
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a keyword argument, replacing an earlier one with the same name
    pub fn named(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.named.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.named.push((name.to_string(), value)),
        }
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &[(String, Value)] {
        &self.named
    }
}

impl<T: Into<Value>> FromIterator<T> for Args {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }
}

/// A query ready for a driver: text plus arguments in positional order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundQuery {
    pub sql: String,
    pub args: Vec<Value>,
    /// Declared type of each parameter, aligned with `args`
    #[serde(default)]
    pub type_hints: Vec<Option<ValueType>>,
}

impl BoundQuery {
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

impl From<BoundQuery> for (String, Vec<Value>) {
    fn from(query: BoundQuery) -> Self {
        query.into_parts()
    }
}

/// Callable view over a compiled query.
///
/// Cloning is cheap and the binder never mutates the compiled query, so one
/// binder can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct Binder {
    query: Arc<CompiledQuery>,
}

impl Binder {
    pub fn new(query: CompiledQuery) -> Self {
        Self {
            query: Arc::new(query),
        }
    }

    pub fn compiled(&self) -> &CompiledQuery {
        &self.query
    }

    pub fn sql(&self) -> &str {
        &self.query.text
    }

    pub fn parameters(&self) -> &[ParameterEntry] {
        &self.query.parameters
    }

    /// Parameters a caller has to supply
    pub fn required(&self) -> impl Iterator<Item = &ParameterEntry> {
        self.parameters().iter().filter(|p| p.is_required())
    }

    /// Parameters that fall back to their default
    pub fn optional(&self) -> impl Iterator<Item = &ParameterEntry> {
        self.parameters().iter().filter(|p| !p.is_required())
    }

    /// The call signature, e.g. `(name, page: INTEGER = 1)`
    pub fn signature(&self) -> Signature<'_> {
        Signature {
            parameters: self.parameters(),
        }
    }

    /// Bind a call's arguments.
    ///
    /// Positional arguments fill parameters in order. Each remaining
    /// parameter takes its keyword argument if given, else its default.
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{mkquery, Args, Token, Value, Variable};
    ///
    /// let tokens = vec![
    ///     Token::from(Variable::new("name").unwrap()),
    ///     Token::from(Variable::with_default("page", 1).unwrap()),
    /// ];
    /// let query = mkquery(&tokens);
    ///
    /// let bound = query.call(Args::new().arg("oxy")).unwrap();
    /// assert_eq!(bound.sql, "$1 $2");
    /// assert_eq!(bound.args, vec![Value::from("oxy"), Value::I32(1)]);
    ///
    /// let bound = query.call(Args::new().named("page", 3).named("name", "x")).unwrap();
    /// assert_eq!(bound.args, vec![Value::from("x"), Value::I32(3)]);
    /// ```
    pub fn call(&self, args: Args) -> Result<BoundQuery> {
        let Args {
            positional,
            mut named,
        } = args;
        let parameters = self.parameters();

        if positional.len() > parameters.len() {
            return Err(Error::TooManyArguments {
                expected: parameters.len(),
                given: positional.len(),
            });
        }

        let mut values = positional;
        for param in &parameters[values.len()..] {
            let supplied = named
                .iter()
                .position(|(name, _)| *name == param.name)
                .map(|i| named.remove(i).1);
            let value = match (supplied, &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => default.clone(),
                (None, None) => return Err(Error::missing_argument(&param.name)),
            };
            values.push(value);
        }

        if !named.is_empty() {
            return Err(Error::UnexpectedKeywordArgument {
                names: named.into_iter().map(|(name, _)| name).collect(),
            });
        }

        tracing::trace!(sql = %self.sql(), args = values.len(), "bound query arguments");
        Ok(BoundQuery {
            sql: self.query.text.clone(),
            args: values,
            type_hints: parameters.iter().map(|p| p.type_hint).collect(),
        })
    }

    /// Bind positional arguments only
    pub fn call_positional<I, T>(&self, values: I) -> Result<BoundQuery>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.call(values.into_iter().collect())
    }

    /// Bind keyword arguments only
    pub fn call_named<I, S, T>(&self, pairs: I) -> Result<BoundQuery>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<Value>,
    {
        let args = pairs
            .into_iter()
            .fold(Args::new(), |args, (name, value)| args.named(name.as_ref(), value));
        self.call(args)
    }
}

/// Displayable call signature of a binder
#[derive(Debug, Clone, Copy)]
pub struct Signature<'a> {
    parameters: &'a [ParameterEntry],
}

impl Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}
