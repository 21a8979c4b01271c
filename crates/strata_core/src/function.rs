//! # Table functions
//! Parameterised generators of tables. Several functions may share a name in
//! a schema, forming an overload set that is searched in insertion order.

use std::sync::Arc;

use crate::{
    error::CatalogError,
    table::Table,
    value::{ElementShape, ScalarType, Value},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: ScalarType,
}

impl Parameter {
    pub fn new(name: &str, ty: ScalarType) -> Self {
        Self {
            name: name.to_owned(),
            ty,
        }
    }
}

pub trait TableFunction: Send + Sync {
    fn parameters(&self) -> &[Parameter];

    /// The shape of the tables produced.
    fn shape(&self) -> &ElementShape;

    fn apply(&self, args: &[Value]) -> Result<Arc<dyn Table>, CatalogError>;

    /// Whether this overload can be applied to `args`.
    fn accepts(&self, args: &[Value]) -> bool {
        let params = self.parameters();
        params.len() == args.len() && params.iter().zip(args).all(|(p, a)| p.ty.accepts(a))
    }
}

type Apply = dyn Fn(&[Value]) -> Result<Arc<dyn Table>, CatalogError> + Send + Sync;

/// A table function implemented by a closure.
pub struct FnTableFunction {
    parameters: Vec<Parameter>,
    shape: ElementShape,
    apply: Box<Apply>,
}

impl FnTableFunction {
    pub fn new(
        parameters: Vec<Parameter>,
        shape: ElementShape,
        apply: impl Fn(&[Value]) -> Result<Arc<dyn Table>, CatalogError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            parameters,
            shape,
            apply: Box::new(apply),
        }
    }
}

impl TableFunction for FnTableFunction {
    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn shape(&self) -> &ElementShape {
        &self.shape
    }

    fn apply(&self, args: &[Value]) -> Result<Arc<dyn Table>, CatalogError> {
        (self.apply)(args)
    }
}
