//! # Values, rows and shapes
//! A row is either a single value, or a fixed width tuple of values. The
//! static layout of the rows in a sequence is its [`ElementShape`].

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

use itertools::Itertools;
use proc_macro2::{Literal, TokenStream};
use quote::{quote, ToTokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Str,
    /// Matches every type, for columns the upstream planner leaves untyped.
    Any,
}

impl ScalarType {
    pub fn matches(self, other: ScalarType) -> bool {
        self == other || self == ScalarType::Any || other == ScalarType::Any
    }

    /// Null is accepted by every type.
    pub fn accepts(self, value: &Value) -> bool {
        match value.ty() {
            None => true,
            Some(ty) => self.matches(ty),
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Str => "str",
            ScalarType::Any => "any",
        })
    }
}

/// A single value.
///
/// Values are totally ordered: first by kind (`Null < Bool < number < Str`)
/// then by content. Integers and floats are compared exactly as numbers, so
/// `Int(1) == Float(1.0)`. Floats otherwise follow [`f64::total_cmp`], with
/// `-0.0 == 0.0`. Equality and hashing agree with this ordering, so values
/// can be used as join and group keys.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// The type of the value, `None` for null.
    pub fn ty(&self) -> Option<ScalarType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ScalarType::Bool),
            Value::Int(_) => Some(ScalarType::Int),
            Value::Float(_) => Some(ScalarType::Float),
            Value::Str(_) => Some(ScalarType::Str),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Only `Bool(true)` passes a predicate.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric addition skipping nulls. Integer overflow widens to a float,
    /// non-numeric operands produce null.
    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Null, x) | (x, Value::Null) => x.clone(),
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map(Value::Int)
                .unwrap_or(Value::Float(*a as f64 + *b as f64)),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                Value::Float(*a as f64 + b)
            }
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            _ => Value::Null,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) => 3,
        }
    }
}

/// `2^63`, the first float above every `i64`.
const INT_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The integer a float is equal to, if any.
fn whole(f: f64) -> Option<i64> {
    (f.trunc() == f && (-INT_BOUND..INT_BOUND).contains(&f)).then_some(f as i64)
}

/// Compares without rounding the integer to a float.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= INT_BOUND {
        return Ordering::Less;
    }
    if f < -INT_BOUND {
        return Ordering::Greater;
    }
    let truncated = f.trunc();
    i.cmp(&(truncated as i64))
        .then_with(|| truncated.partial_cmp(&f).unwrap_or(Ordering::Equal))
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => cmp_floats(*a, *b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => match whole(*f) {
                Some(i) => i.hash(state),
                None => f.to_bits().hash(state),
            },
            Value::Str(s) => s.hash(state),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl ToTokens for Value {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let tks = match self {
            Value::Null => quote!(null),
            Value::Bool(b) => quote!(#b),
            Value::Int(i) => Literal::i64_suffixed(*i).into_token_stream(),
            Value::Float(x) if x.is_nan() => quote!(f64::NAN),
            Value::Float(x) if x.is_infinite() && *x > 0.0 => quote!(f64::INFINITY),
            Value::Float(x) if x.is_infinite() => quote!(f64::NEG_INFINITY),
            Value::Float(x) => Literal::f64_suffixed(*x).into_token_stream(),
            Value::Str(s) => Literal::string(s).into_token_stream(),
        };
        tokens.extend(tks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    Scalar(Value),
    Tuple(Arc<[Value]>),
}

impl Row {
    pub fn tuple(values: impl IntoIterator<Item = Value>) -> Self {
        Row::Tuple(values.into_iter().collect())
    }

    /// The fields of the row, a scalar row has a single field.
    pub fn values(&self) -> &[Value] {
        match self {
            Row::Scalar(v) => std::slice::from_ref(v),
            Row::Tuple(vs) => vs,
        }
    }

    pub fn field(&self, index: usize) -> Option<&Value> {
        self.values().get(index)
    }

    pub fn width(&self) -> usize {
        self.values().len()
    }

    /// The tuple of this row's fields followed by `other`'s.
    pub fn concat(&self, other: &Row) -> Row {
        Row::tuple(self.values().iter().chain(other.values()).cloned())
    }
}

impl ToTokens for Row {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Row::Scalar(v) => v.to_tokens(tokens),
            Row::Tuple(vs) => {
                let vs = vs.iter();
                tokens.extend(quote!((#(#vs,)*)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ScalarType,
}

/// The static layout of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementShape {
    Scalar(ScalarType),
    Tuple(Vec<Column>),
}

impl ElementShape {
    pub fn tuple<'a>(columns: impl IntoIterator<Item = (&'a str, ScalarType)>) -> Self {
        ElementShape::Tuple(
            columns
                .into_iter()
                .map(|(name, ty)| Column {
                    name: name.to_owned(),
                    ty,
                })
                .collect(),
        )
    }

    pub fn width(&self) -> usize {
        match self {
            ElementShape::Scalar(_) => 1,
            ElementShape::Tuple(cols) => cols.len(),
        }
    }

    fn columns(&self) -> Vec<Column> {
        match self {
            ElementShape::Scalar(ty) => vec![Column {
                name: String::from("_"),
                ty: *ty,
            }],
            ElementShape::Tuple(cols) => cols.clone(),
        }
    }

    /// The shape of [`Row::concat`] over rows of both shapes.
    pub fn concat(&self, other: &ElementShape) -> ElementShape {
        let mut columns = self.columns();
        columns.extend(other.columns());
        ElementShape::Tuple(columns)
    }

    /// Shapes are compared positionally by type, column names are ignored.
    pub fn is_compatible(&self, expected: &ElementShape) -> bool {
        match (self, expected) {
            (ElementShape::Scalar(a), ElementShape::Scalar(b)) => a.matches(*b),
            (ElementShape::Tuple(a), ElementShape::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ty.matches(y.ty))
            }
            _ => false,
        }
    }

    /// Whether a row fits this shape.
    pub fn admits(&self, row: &Row) -> bool {
        match (self, row) {
            (ElementShape::Scalar(ty), Row::Scalar(v)) => ty.accepts(v),
            (ElementShape::Tuple(cols), Row::Tuple(vs)) => {
                cols.len() == vs.len() && cols.iter().zip(vs.iter()).all(|(c, v)| c.ty.accepts(v))
            }
            _ => false,
        }
    }
}

impl Display for ElementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementShape::Scalar(ty) => write!(f, "{ty}"),
            ElementShape::Tuple(cols) => write!(
                f,
                "({})",
                cols.iter()
                    .format_with(", ", |c, f| f(&format_args!("{}: {}", c.name, c.ty)))
            ),
        }
    }
}
