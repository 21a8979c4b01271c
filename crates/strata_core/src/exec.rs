//! # Running programs
//! Evaluates a [`Program`] using the operators of any [`Physical`] strategy.
//!
//! Every scan re-navigates from the root schema it is run with, so a program
//! can run against any catalog with the layout it was compiled against.
//!
//! A name used once is evaluated where it is used. A name used more than once
//! (a shared sub-plan) is read in full while the pipeline is built, and
//! replayed to every use.

use std::{cell::RefCell, cmp::Ordering, sync::Arc};

use conveyor::{Iter, Physical};
use rustc_hash::FxHashMap;
use tracing::instrument;

use crate::{
    compile::{Expr, Matching, Name, Program, ScalarRef},
    error::ExecError,
    plan::{AggKind, Scalar, SortOrder},
    schema::Schema,
    table::RowStream,
    value::{Row, Value},
};

impl Program {
    /// Run with lazy operators. Shared sub-plans are read in full before this
    /// returns. Everything else is read only as the stream is pulled.
    pub fn execute(&self, root: &dyn Schema) -> Result<RowStream, ExecError> {
        self.execute_with::<Iter>(root)
    }

    #[instrument(name = "exec::execute", level = "debug", skip_all, fields(strategy = std::any::type_name::<P>()))]
    pub fn execute_with<P: Physical>(&self, root: &dyn Schema) -> Result<RowStream, ExecError> {
        let mut runner = Runner {
            root,
            scalars: self.scalars(),
            bindings: FxHashMap::default(),
            uses: FxHashMap::default(),
            shared: RefCell::new(FxHashMap::default()),
        };
        let stmts = self.body().stmts.iter().map(|stmt| (&stmt.name, &stmt.value));
        for (name, value) in self.registry().iter().chain(stmts) {
            runner.bind(name, value)?;
        }
        let output = &self.body().expr;
        runner.check(output)?;
        runner.count_uses(output);
        Ok(P::export_stream(runner.eval::<P>(output)?))
    }

    pub fn collect(&self, root: &dyn Schema) -> Result<Vec<Row>, ExecError> {
        Ok(self.execute(root)?.collect())
    }
}

struct Runner<'a> {
    root: &'a dyn Schema,
    scalars: &'a [Scalar],
    bindings: FxHashMap<&'a Name, &'a Expr>,
    uses: FxHashMap<&'a Name, usize>,
    shared: RefCell<FxHashMap<Name, Arc<[Row]>>>,
}

impl<'a> Runner<'a> {
    /// Every name used must already be bound.
    fn check(&self, expr: &Expr) -> Result<(), ExecError> {
        match expr
            .vars()
            .into_iter()
            .find(|name| !self.bindings.contains_key(*name))
        {
            Some(name) => Err(ExecError::UndefinedBinding(name.clone())),
            None => Ok(()),
        }
    }

    fn bind(&mut self, name: &'a Name, value: &'a Expr) -> Result<(), ExecError> {
        self.check(value)?;
        self.count_uses(value);
        self.bindings.insert(name, value);
        Ok(())
    }

    fn count_uses(&mut self, expr: &'a Expr) {
        for name in expr.vars() {
            *self.uses.entry(name).or_insert(0) += 1;
        }
    }

    /// The rows of a shared name, read when first built into the pipeline.
    fn shared_rows<P: Physical>(&self, name: &Name, bound: &Expr) -> Result<Arc<[Row]>, ExecError> {
        if let Some(rows) = self.shared.borrow().get(name) {
            return Ok(rows.clone());
        }
        let rows: Arc<[Row]> = P::export_stream(self.eval::<P>(bound)?).collect();
        self.shared.borrow_mut().insert(name.clone(), rows.clone());
        Ok(rows)
    }

    fn scalar(&self, scalar: ScalarRef) -> Scalar {
        self.scalars[scalar.index()].clone()
    }

    fn scalar_list(&self, scalars: &[ScalarRef]) -> Arc<[Scalar]> {
        scalars.iter().map(|scalar| self.scalar(*scalar)).collect()
    }

    fn eval<P: Physical>(&self, expr: &Expr) -> Result<P::Stream<Row>, ExecError> {
        Ok(match expr {
            Expr::Var(name) => {
                let bound = *self
                    .bindings
                    .get(name)
                    .ok_or_else(|| ExecError::UndefinedBinding(name.clone()))?;
                if self.uses.get(name).copied().unwrap_or(0) > 1 {
                    replay::<P>(self.shared_rows::<P>(name, bound)?)
                } else {
                    self.eval::<P>(bound)?
                }
            }
            Expr::Scan(navigation) => {
                let table = navigation.resolve_table(self.root)?;
                P::consume_stream(table.rows()?)
            }
            Expr::Values(rows) => replay::<P>(rows.clone()),
            Expr::Filter { input, predicate } => {
                let predicate = self.scalar(*predicate);
                P::filter(self.eval::<P>(input)?, move |row| predicate.eval(row).is_true())
            }
            Expr::Project {
                input,
                exprs,
                as_scalar,
            } => {
                let exprs = self.scalar_list(exprs);
                let as_scalar = *as_scalar;
                P::map(self.eval::<P>(input)?, move |row| {
                    pack(as_scalar, exprs.iter().map(|expr| expr.eval(&row)))
                })
            }
            Expr::Join {
                left,
                right,
                matching,
            } => {
                let (left, right) = (self.eval::<P>(left)?, self.eval::<P>(right)?);
                let pairs = match matching {
                    Matching::Cross => P::cross_join(left, right),
                    Matching::Pred(pred) => {
                        let pred = self.scalar(*pred);
                        P::predicate_join(left, right, move |l, r| pred.eval(&l.concat(r)).is_true())
                    }
                    Matching::Equi {
                        left: left_keys,
                        right: right_keys,
                    } => {
                        let left = without_null_keys::<P>(left, self.scalar_list(left_keys));
                        let right = without_null_keys::<P>(right, self.scalar_list(right_keys));
                        let (left_keys, right_keys) =
                            (self.scalar_list(left_keys), self.scalar_list(right_keys));
                        P::equi_join(
                            left,
                            right,
                            move |row| key_values(&left_keys, row),
                            move |row| key_values(&right_keys, row),
                        )
                    }
                };
                P::map(pairs, |(l, r)| l.concat(&r))
            }
            Expr::Aggregate {
                input,
                group_by,
                calls,
                as_scalar,
            } => {
                let input = self.eval::<P>(input)?;
                let calls: Arc<[(AggKind, Option<Scalar>)]> = calls
                    .iter()
                    .map(|(kind, arg)| (*kind, arg.map(|arg| self.scalar(arg))))
                    .collect();
                let as_scalar = *as_scalar;
                if group_by.is_empty() {
                    let step_calls = calls.clone();
                    let folded = P::fold(input, initial(&calls), move |accs, row| {
                        accumulate(&step_calls, accs, &row)
                    });
                    P::map(folded, move |accs| pack(as_scalar, accs))
                } else {
                    let keys = self.scalar_list(group_by);
                    let groups = P::group_by(input, move |row| (key_values(&keys, &row), row));
                    P::map(groups, move |(key, rows)| {
                        let accs = rows
                            .iter()
                            .fold(initial(&calls), |accs, row| accumulate(&calls, accs, row));
                        pack(as_scalar, key.into_iter().chain(accs))
                    })
                }
            }
            Expr::Sort { input, keys } => {
                let keys: Arc<[(Scalar, SortOrder)]> = keys
                    .iter()
                    .map(|(key, order)| (self.scalar(*key), *order))
                    .collect();
                P::sort(self.eval::<P>(input)?, move |a, b| compare(&keys, a, b))
            }
            Expr::Take { input, n } => P::take(self.eval::<P>(input)?, *n),
            Expr::Union(inputs) => {
                let mut streams = inputs.iter().map(|input| self.eval::<P>(input));
                let first = streams
                    .next()
                    .unwrap_or_else(|| Ok(P::consume_stream(std::iter::empty())))?;
                streams.try_fold(first, |acc, stream| Ok::<_, ExecError>(P::union(acc, stream?)))?
            }
        })
    }
}

fn replay<P: Physical>(rows: Arc<[Row]>) -> P::Stream<Row> {
    P::consume_stream((0..rows.len()).map(move |i| rows[i].clone()))
}

fn pack(as_scalar: bool, values: impl IntoIterator<Item = Value>) -> Row {
    if as_scalar {
        Row::Scalar(values.into_iter().next().unwrap_or(Value::Null))
    } else {
        Row::tuple(values)
    }
}

fn key_values(keys: &[Scalar], row: &Row) -> Vec<Value> {
    keys.iter().map(|key| key.eval(row)).collect()
}

/// Null keys never compare equal, so rows with them cannot match.
fn without_null_keys<P: Physical>(stream: P::Stream<Row>, keys: Arc<[Scalar]>) -> P::Stream<Row> {
    P::filter(stream, move |row| keys.iter().all(|key| !key.eval(row).is_null()))
}

fn compare(keys: &[(Scalar, SortOrder)], a: &Row, b: &Row) -> Ordering {
    keys.iter()
        .map(|(key, order)| {
            let ordering = key.eval(a).cmp(&key.eval(b));
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn initial(calls: &[(AggKind, Option<Scalar>)]) -> Vec<Value> {
    calls
        .iter()
        .map(|(kind, _)| match kind {
            AggKind::Count => Value::Int(0),
            AggKind::Sum | AggKind::Min | AggKind::Max => Value::Null,
        })
        .collect()
}

fn accumulate(calls: &[(AggKind, Option<Scalar>)], mut accs: Vec<Value>, row: &Row) -> Vec<Value> {
    for (acc, (kind, arg)) in accs.iter_mut().zip(calls) {
        let current = std::mem::replace(acc, Value::Null);
        *acc = step(*kind, current, arg.as_ref().map(|arg| arg.eval(row)));
    }
    accs
}

/// Nulls are skipped, `count(*)` (no argument) counts every row.
fn step(kind: AggKind, acc: Value, value: Option<Value>) -> Value {
    match (kind, value) {
        (_, Some(Value::Null)) => acc,
        (AggKind::Count, _) => acc.add(&Value::Int(1)),
        (_, None) => acc,
        (AggKind::Sum, Some(value)) => acc.add(&value),
        (AggKind::Min, Some(value)) if acc.is_null() || value < acc => value,
        (AggKind::Max, Some(value)) if acc.is_null() || value > acc => value,
        (AggKind::Min | AggKind::Max, Some(_)) => acc,
    }
}
