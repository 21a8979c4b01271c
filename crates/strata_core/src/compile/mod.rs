//! # Plan compilation
//! The [`Implementor`] walks a plan from its root in post-order. For each
//! operator it first compiles every input, in order, through
//! [`Implementor::visit_child`], then hands the compiled input blocks to the
//! operator's [`Implement::implement`].
//!
//! ## Sharing
//! An operator consumed by several parents is compiled once. Its block is
//! hoisted into the registry under a fresh name, and each consumer receives a
//! reference to that name. Generated code therefore grows with the number of
//! operators, not with the number of paths through the plan.
//!
//! ## Output
//! A [`Program`]: the registry (an insertion ordered map of names to
//! expressions, each name defined before use), the root block and the pool
//! of scalars referenced.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace};

use crate::{
    error::CompileError,
    plan::{Idx, Key, Operator, Plan, Scalar},
    schema::Schema,
};

mod block;
mod namer;
mod operators;
mod options;
mod program;

pub use block::{Block, Expr, Matching, Name, ScalarRef, Stmt};
pub use namer::CompileNamer;
pub use operators::Implement;
pub use options::CompileOptions;
pub use program::Program;

/// Observed steps of a compilation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Visit {
        parent: usize,
        ordinal: usize,
        child: usize,
    },
    /// An operator's block is complete.
    Implemented(usize),
}

pub struct Implementor<'imm> {
    plan: &'imm Plan,
    schema: &'imm dyn Schema,
    options: &'imm CompileOptions,
    namer: CompileNamer,
    registry: IndexMap<Name, Expr>,
    scalars: Vec<Scalar>,
    consumers: FxHashMap<Idx<'imm, Operator>, usize>,
    compiled: FxHashMap<Idx<'imm, Operator>, Name>,
    events: Vec<Event>,
}

impl<'imm> Implementor<'imm> {
    pub fn new(plan: &'imm Plan, schema: &'imm dyn Schema, options: &'imm CompileOptions) -> Self {
        Self {
            plan,
            schema,
            options,
            namer: CompileNamer::new(),
            registry: IndexMap::new(),
            scalars: Vec::new(),
            consumers: FxHashMap::default(),
            compiled: FxHashMap::default(),
            events: Vec::new(),
        }
    }

    /// Compile the plan reachable from `root`.
    #[instrument(name = "compile::implement_root", level = "debug", skip(self), fields(root = root.arr_idx()))]
    pub fn implement_root(&mut self, root: Key<Operator>) -> Result<Block, CompileError> {
        self.consumers = self.plan.consumers(root);
        self.implement(root)
    }

    /// Compile the input `child` of `parent`, which must be its `ordinal`th
    /// child.
    pub fn visit_child(
        &mut self,
        parent: Key<Operator>,
        ordinal: usize,
        child: Key<Operator>,
    ) -> Result<Block, CompileError> {
        assert!(
            self.plan.get_operator(parent).children().get(ordinal) == Some(&child),
            "visited a child out of order"
        );
        trace!(parent = parent.arr_idx(), ordinal, child = child.arr_idx(), "visit");
        self.events.push(Event::Visit {
            parent: parent.arr_idx(),
            ordinal,
            child: child.arr_idx(),
        });

        let idx = Idx::new(child, self.plan);
        if let Some(name) = self.compiled.get(&idx) {
            return Ok(Block::var(name.clone()));
        }

        let block = self.visit_child_internal(child)?;
        if self.consumers.get(&idx).copied().unwrap_or(0) > 1 {
            let name = self.hoist(block);
            debug!(child = child.arr_idx(), %name, "shared operator");
            self.compiled.insert(idx, name.clone());
            Ok(Block::var(name))
        } else {
            Ok(block)
        }
    }

    fn visit_child_internal(&mut self, child: Key<Operator>) -> Result<Block, CompileError> {
        self.implement(child)
    }

    fn implement(&mut self, key: Key<Operator>) -> Result<Block, CompileError> {
        let op = self.plan.get_operator(key);
        let mut inputs = Vec::new();
        for (ordinal, child) in op.children().into_iter().enumerate() {
            inputs.push(self.visit_child(key, ordinal, child)?);
        }

        let mut block = op.implement(key, self, inputs)?;
        self.events.push(Event::Implemented(key.arr_idx()));

        if self.options.bind_intermediates && !matches!(block.expr, Expr::Var(_)) {
            let name = self.namer.operator_local(key);
            let value = std::mem::replace(&mut block.expr, Expr::Var(name.clone()));
            block.stmts.push(Stmt { name, value });
        }
        Ok(block)
    }

    /// Move a block's bindings into the registry, returning the name of its
    /// output.
    fn hoist(&mut self, block: Block) -> Name {
        let Block { stmts, expr } = block;
        for Stmt { name, value } in stmts {
            self.registry.insert(name, value);
        }
        match expr {
            Expr::Var(name) => name,
            expr => self.register_name(expr),
        }
    }

    fn register_name(&mut self, expr: Expr) -> Name {
        let name = self.namer.next_registered();
        debug!(%name, "registered");
        self.registry.insert(name.clone(), expr);
        name
    }

    /// Bind a sequence to a fresh name in the registry, returning a reference
    /// to it. Every call mints a new name.
    pub fn register(&mut self, expr: Expr) -> Expr {
        Expr::Var(self.register_name(expr))
    }

    /// Add a scalar to the program's pool.
    pub fn bind_scalar(&mut self, scalar: &Scalar) -> ScalarRef {
        let scalar_ref = self.namer.next_scalar();
        self.scalars.push(scalar.clone());
        scalar_ref
    }

    pub fn schema(&self) -> &'imm dyn Schema {
        self.schema
    }

    pub fn plan(&self) -> &'imm Plan {
        self.plan
    }

    pub fn registry(&self) -> &IndexMap<Name, Expr> {
        &self.registry
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn finish(self, body: Block, root: Key<Operator>) -> Result<Program, CompileError> {
        Program::new(
            self.registry,
            body,
            self.scalars,
            self.plan.shape(root),
            self.options.pipeline_name.as_deref(),
        )
    }
}

/// Compile the plan reachable from `root` against `schema`.
#[instrument(name = "compile", level = "debug", skip_all, fields(root = root.arr_idx()))]
pub fn compile(
    plan: &Plan,
    root: Key<Operator>,
    schema: &dyn Schema,
    options: &CompileOptions,
) -> Result<Program, CompileError> {
    let mut implementor = Implementor::new(plan, schema, options);
    let body = implementor.implement_root(root)?;
    let program = implementor.finish(body, root)?;
    debug!(
        registered = program.registry().len(),
        scalars = program.scalars().len(),
        "compiled"
    );

    if let Some(path) = &options.debug_file {
        std::fs::write(path, program.pretty()?).map_err(|source| CompileError::DebugOutput {
            path: path.clone(),
            source,
        })?;
    }
    Ok(program)
}
