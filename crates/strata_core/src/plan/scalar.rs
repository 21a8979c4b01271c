use std::{fmt, sync::Arc};

use crate::value::{Row, Value};

type Eval = dyn Fn(&Row) -> Value + Send + Sync;

/// A compiled scalar expression over a row.
///
/// The body is opaque to the compiler, which only places it in the program's
/// scalar pool. The label names it in rendered programs.
#[derive(Clone)]
pub struct Scalar {
    label: Arc<str>,
    eval: Arc<Eval>,
}

impl Scalar {
    pub fn new(label: &str, eval: impl Fn(&Row) -> Value + Send + Sync + 'static) -> Self {
        Self {
            label: Arc::from(label),
            eval: Arc::new(eval),
        }
    }

    /// The field at `index`, null when the row is narrower.
    pub fn column(index: usize) -> Self {
        Self::new(&format!("#{index}"), move |row| {
            row.field(index).cloned().unwrap_or(Value::Null)
        })
    }

    pub fn literal(value: Value) -> Self {
        let label = value.to_string();
        Self::new(&label, move |_| value.clone())
    }

    /// Equality, null if either side is null.
    pub fn equals(&self, other: &Scalar) -> Self {
        let (left, right) = (self.clone(), other.clone());
        Self::new(&format!("{} = {}", self.label, other.label), move |row| {
            match (left.eval(row), right.eval(row)) {
                (Value::Null, _) | (_, Value::Null) => Value::Null,
                (l, r) => Value::Bool(l == r),
            }
        })
    }

    pub fn eval(&self, row: &Row) -> Value {
        (self.eval)(row)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scalar").field(&self.label).finish()
    }
}
