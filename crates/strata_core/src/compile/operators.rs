//! Compiling each operator, given the compiled blocks of its inputs.

use itertools::Itertools;
use tracing::trace;

use super::{
    block::{Block, Expr, Matching, Stmt},
    Implementor,
};
use crate::{
    error::{CatalogError, CompileError},
    plan::{self, Key, Operator},
    schema::{resolve_path, Schema},
    value::ElementShape,
};

pub trait Implement {
    /// Produce the block for this operator.
    /// - `inputs` are the compiled blocks of [`Operator::children`], in order.
    /// - Sources resolve their tables against [`Implementor::schema`] and
    ///   [`Implementor::register`] them.
    fn implement(
        &self,
        self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError>;
}

impl Implement for Operator {
    fn implement(
        &self,
        self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        match self {
            Operator::Scan(op) => op.implement(self_key, implementor, inputs),
            Operator::Call(op) => op.implement(self_key, implementor, inputs),
            Operator::Values(op) => op.implement(self_key, implementor, inputs),
            Operator::Filter(op) => op.implement(self_key, implementor, inputs),
            Operator::Project(op) => op.implement(self_key, implementor, inputs),
            Operator::Aggregate(op) => op.implement(self_key, implementor, inputs),
            Operator::Sort(op) => op.implement(self_key, implementor, inputs),
            Operator::Take(op) => op.implement(self_key, implementor, inputs),
            Operator::Join(op) => op.implement(self_key, implementor, inputs),
            Operator::Union(op) => op.implement(self_key, implementor, inputs),
        }
    }
}

/// The single input of a row at a time or blocking operator.
fn single(inputs: Vec<Block>) -> (Vec<Stmt>, Box<Expr>) {
    let Ok(Block { stmts, expr }) = inputs.into_iter().exactly_one() else {
        panic!("operator expects exactly one input")
    };
    (stmts, Box::new(expr))
}

fn lookup_schema<'a>(
    implementor: &Implementor<'a>,
    path: &[String],
) -> Result<&'a dyn Schema, CompileError> {
    resolve_path(implementor.schema(), path).ok_or_else(|| CompileError::SchemaNotFound {
        path: path.iter().join("."),
    })
}

impl Implement for plan::Scan {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        _inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let schema = lookup_schema(implementor, &self.schema)?;
        if !schema.resolve_table_typed(&self.table, &self.shape)?.is_found() {
            return Err(CompileError::TableNotFound {
                schema: schema.navigation().to_string(),
                name: self.table.clone(),
            });
        }
        // by name from the schema checked, so a zero parameter function is
        // applied again when run
        let navigation = schema.table_navigation(&self.table);
        trace!(table = %self.table, %navigation, "resolved scan");
        Ok(Block::expr(implementor.register(Expr::Scan(navigation))))
    }
}

impl Implement for plan::Call {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        _inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let schema = lookup_schema(implementor, &self.schema)?;
        let Some(table) = schema.resolve_function(&self.function, &self.args)?.into_table() else {
            return Err(CompileError::NoMatchingOverload {
                name: self.function.clone(),
                arity: self.args.len(),
            });
        };
        if !table.shape().is_compatible(&self.shape) {
            return Err(CatalogError::ShapeMismatch {
                name: self.function.clone(),
                expected: self.shape.clone(),
                found: table.shape().clone(),
            }
            .into());
        }
        let navigation = schema
            .navigation()
            .clone()
            .call(&self.function, self.args.clone());
        Ok(Block::expr(implementor.register(Expr::Scan(navigation))))
    }
}

impl Implement for plan::Values {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        _implementor: &mut Implementor<'_>,
        _inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        Ok(Block::expr(Expr::Values(self.rows.iter().cloned().collect())))
    }
}

impl Implement for plan::Filter {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, input) = single(inputs);
        let predicate = implementor.bind_scalar(&self.predicate);
        Ok(Block {
            stmts,
            expr: Expr::Filter { input, predicate },
        })
    }
}

impl Implement for plan::Project {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, input) = single(inputs);
        let exprs = self
            .exprs
            .iter()
            .map(|expr| implementor.bind_scalar(expr))
            .collect();
        Ok(Block {
            stmts,
            expr: Expr::Project {
                input,
                exprs,
                as_scalar: matches!(self.shape, ElementShape::Scalar(_)),
            },
        })
    }
}

impl Implement for plan::Aggregate {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, input) = single(inputs);
        let group_by = self
            .group_by
            .iter()
            .map(|key| implementor.bind_scalar(key))
            .collect();
        let calls = self
            .calls
            .iter()
            .map(|call| (call.kind, call.arg.as_ref().map(|arg| implementor.bind_scalar(arg))))
            .collect();
        Ok(Block {
            stmts,
            expr: Expr::Aggregate {
                input,
                group_by,
                calls,
                as_scalar: matches!(self.shape, ElementShape::Scalar(_)),
            },
        })
    }
}

impl Implement for plan::Sort {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, input) = single(inputs);
        let keys = self
            .keys
            .iter()
            .map(|(key, order)| (implementor.bind_scalar(key), *order))
            .collect();
        Ok(Block {
            stmts,
            expr: Expr::Sort { input, keys },
        })
    }
}

impl Implement for plan::Take {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        _implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, input) = single(inputs);
        Ok(Block {
            stmts,
            expr: Expr::Take { input, n: self.n },
        })
    }
}

impl Implement for plan::Join {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, exprs) = Block::merge(inputs);
        let Some((left, right)) = exprs.into_iter().collect_tuple() else {
            panic!("a join has a left and a right input")
        };
        let matching = match &self.kind {
            plan::JoinKind::Cross => Matching::Cross,
            plan::JoinKind::Predicate(pred) => Matching::Pred(implementor.bind_scalar(pred)),
            plan::JoinKind::Equi { left, right } => Matching::Equi {
                left: left.iter().map(|key| implementor.bind_scalar(key)).collect(),
                right: right.iter().map(|key| implementor.bind_scalar(key)).collect(),
            },
        };
        Ok(Block {
            stmts,
            expr: Expr::Join {
                left: Box::new(left),
                right: Box::new(right),
                matching,
            },
        })
    }
}

impl Implement for plan::Union {
    fn implement(
        &self,
        _self_key: Key<Operator>,
        _implementor: &mut Implementor<'_>,
        inputs: Vec<Block>,
    ) -> Result<Block, CompileError> {
        let (stmts, exprs) = Block::merge(inputs);
        Ok(Block {
            stmts,
            expr: Expr::Union(exprs),
        })
    }
}
