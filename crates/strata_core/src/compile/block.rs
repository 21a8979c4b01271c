//! The intermediate representation produced by compiling operators.
//!
//! A [`Block`] is the fragment for one operator: statements binding names,
//! and a final [`Expr`] for the operator's output. Expressions refer to
//! scalars by [`ScalarRef`] into the program's scalar pool, and to earlier
//! results by [`Name`].

use std::{
    fmt::{self, Display},
    sync::Arc,
};

use proc_macro2::{Literal, Span, TokenStream};
use quote::{quote, ToTokens};
use syn::Ident;

use crate::{
    plan::{AggKind, SortOrder},
    schema::Navigation,
    value::Row,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    pub(crate) fn new(name: String) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToTokens for Name {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        Ident::new(&self.0, Span::call_site()).to_tokens(tokens)
    }
}

/// An index into the scalar pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarRef(pub(crate) usize);

impl ScalarRef {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ToTokens for ScalarRef {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        Ident::new(&format!("s{}", self.0), Span::call_site()).to_tokens(tokens)
    }
}

#[derive(Debug, Clone)]
pub enum Matching {
    Cross,
    Pred(ScalarRef),
    Equi {
        left: Vec<ScalarRef>,
        right: Vec<ScalarRef>,
    },
}

#[derive(Debug, Clone)]
pub enum Expr {
    Var(Name),
    /// Re-obtain a table from the root, and read it.
    Scan(Navigation),
    Values(Arc<[Row]>),
    Filter {
        input: Box<Expr>,
        predicate: ScalarRef,
    },
    Project {
        input: Box<Expr>,
        exprs: Vec<ScalarRef>,
        as_scalar: bool,
    },
    Join {
        left: Box<Expr>,
        right: Box<Expr>,
        matching: Matching,
    },
    Aggregate {
        input: Box<Expr>,
        group_by: Vec<ScalarRef>,
        calls: Vec<(AggKind, Option<ScalarRef>)>,
        as_scalar: bool,
    },
    Sort {
        input: Box<Expr>,
        keys: Vec<(ScalarRef, SortOrder)>,
    },
    Take {
        input: Box<Expr>,
        n: usize,
    },
    Union(Vec<Expr>),
}

impl Expr {
    /// Names used by this expression, in order of appearance.
    pub fn vars(&self) -> Vec<&Name> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars<'a>(&'a self, vars: &mut Vec<&'a Name>) {
        match self {
            Expr::Var(name) => vars.push(name),
            Expr::Scan(_) | Expr::Values(_) => {}
            Expr::Filter { input, .. }
            | Expr::Project { input, .. }
            | Expr::Aggregate { input, .. }
            | Expr::Sort { input, .. }
            | Expr::Take { input, .. } => input.collect_vars(vars),
            Expr::Join { left, right, .. } => {
                left.collect_vars(vars);
                right.collect_vars(vars);
            }
            Expr::Union(inputs) => {
                for input in inputs {
                    input.collect_vars(vars)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub name: Name,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub expr: Expr,
}

impl Block {
    pub fn expr(expr: Expr) -> Self {
        Self {
            stmts: Vec::new(),
            expr,
        }
    }

    pub fn var(name: Name) -> Self {
        Self::expr(Expr::Var(name))
    }

    /// Concatenate the statements of several blocks, keeping their order.
    pub fn merge(blocks: Vec<Block>) -> (Vec<Stmt>, Vec<Expr>) {
        let mut stmts = Vec::new();
        let mut exprs = Vec::with_capacity(blocks.len());
        for block in blocks {
            stmts.extend(block.stmts);
            exprs.push(block.expr);
        }
        (stmts, exprs)
    }
}

impl ToTokens for Matching {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Matching::Cross => quote!(cross()),
            Matching::Pred(pred) => quote!(pred(#pred)),
            Matching::Equi { left, right } => quote!(equi([#(#left),*], [#(#right),*])),
        })
    }
}

fn agg_call(kind: AggKind, arg: Option<ScalarRef>) -> TokenStream {
    match (kind, arg) {
        (AggKind::Count, None) => quote!(count_all()),
        (AggKind::Count, Some(arg)) => quote!(count(#arg)),
        (AggKind::Sum, arg) => quote!(sum(#arg)),
        (AggKind::Min, arg) => quote!(min(#arg)),
        (AggKind::Max, arg) => quote!(max(#arg)),
    }
}

impl ToTokens for Expr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Expr::Var(name) => quote!(#name),
            Expr::Scan(navigation) => quote!(scan(#navigation)),
            Expr::Values(rows) => {
                let rows = rows.iter();
                quote!(values([#(#rows),*]))
            }
            Expr::Filter { input, predicate } => quote!(filter(#input, #predicate)),
            Expr::Project {
                input,
                exprs,
                as_scalar,
            } => {
                if *as_scalar {
                    quote!(project_scalar(#input, #(#exprs),*))
                } else {
                    quote!(project(#input, [#(#exprs),*]))
                }
            }
            Expr::Join {
                left,
                right,
                matching,
            } => quote!(join(#left, #right, #matching)),
            Expr::Aggregate {
                input,
                group_by,
                calls,
                ..
            } => {
                let calls = calls.iter().map(|(kind, arg)| agg_call(*kind, *arg));
                quote!(aggregate(#input, [#(#group_by),*], [#(#calls),*]))
            }
            Expr::Sort { input, keys } => {
                let keys = keys.iter().map(|(key, order)| match order {
                    SortOrder::Asc => quote!(asc(#key)),
                    SortOrder::Desc => quote!(desc(#key)),
                });
                quote!(sort(#input, [#(#keys),*]))
            }
            Expr::Take { input, n } => {
                let n = Literal::usize_unsuffixed(*n);
                quote!(take(#input, #n))
            }
            Expr::Union(inputs) => quote!(union([#(#inputs),*])),
        })
    }
}

impl ToTokens for Stmt {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Stmt { name, value } = self;
        tokens.extend(quote!(let #name = #value;))
    }
}

impl ToTokens for Block {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Block { stmts, expr } = self;
        tokens.extend(quote!({ #(#stmts)* #expr }))
    }
}
