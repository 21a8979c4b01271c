//! Paths from the root catalog to its entries.
//!
//! Compiled programs never capture schemas or tables. Each scan holds a
//! [`Navigation`], resolved again against whichever root the program is run
//! with.

use std::{
    any::TypeId,
    fmt::{self, Display},
    sync::Arc,
};

use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

use super::Schema;
use crate::{error::ExecError, table::Table, value::Value};

/// A checked conversion of a schema to a concrete schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Narrowing {
    type_id: TypeId,
    type_name: &'static str,
}

impl Narrowing {
    /// The narrowing to `S`, or `None` if `S` is `dyn Schema` (which every
    /// schema already is).
    pub fn of<S: Schema + ?Sized + 'static>() -> Option<Self> {
        if TypeId::of::<S>() == TypeId::of::<dyn Schema>() {
            None
        } else {
            Some(Self {
                type_id: TypeId::of::<S>(),
                type_name: std::any::type_name::<S>(),
            })
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn admits(&self, schema: &dyn Schema) -> bool {
        schema.as_any().type_id() == self.type_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    SubSchema(String),
    Narrow(Narrowing),
    Table(String),
    Call { name: String, args: Vec<Value> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Navigation {
    steps: Vec<Step>,
}

impl Navigation {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn sub_schema(mut self, name: &str) -> Self {
        self.steps.push(Step::SubSchema(name.to_owned()));
        self
    }

    pub fn narrow(mut self, narrowing: Narrowing) -> Self {
        self.steps.push(Step::Narrow(narrowing));
        self
    }

    pub fn table(mut self, name: &str) -> Self {
        self.steps.push(Step::Table(name.to_owned()));
        self
    }

    pub fn call(mut self, name: &str, args: Vec<Value>) -> Self {
        self.steps.push(Step::Call {
            name: name.to_owned(),
            args,
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether this navigates to the sub-schema `name` of `parent`, with or
    /// without a narrowing.
    pub fn is_sub_schema_of(&self, parent: &Navigation, name: &str) -> bool {
        match self.steps.strip_prefix(parent.steps.as_slice()) {
            Some([Step::SubSchema(sub)] | [Step::SubSchema(sub), Step::Narrow(_)]) => sub == name,
            _ => false,
        }
    }

    fn error(&self, reason: String) -> ExecError {
        ExecError::Navigation {
            path: self.to_string(),
            reason,
        }
    }

    fn walk<'a>(&self, root: &'a dyn Schema, steps: &[Step]) -> Result<&'a dyn Schema, ExecError> {
        let mut schema = root;
        for step in steps {
            schema = match step {
                Step::SubSchema(name) => schema
                    .resolve_sub_schema(name)
                    .ok_or_else(|| self.error(format!("no sub-schema `{name}`")))?,
                Step::Narrow(narrowing) if narrowing.admits(schema) => schema,
                Step::Narrow(narrowing) => {
                    return Err(self.error(format!("schema is not a `{}`", narrowing.type_name())))
                }
                Step::Table(_) | Step::Call { .. } => {
                    return Err(self.error(String::from("tables have no entries")))
                }
            };
        }
        Ok(schema)
    }

    /// Follow a path of sub-schemas and narrowings.
    pub fn resolve_schema<'a>(&self, root: &'a dyn Schema) -> Result<&'a dyn Schema, ExecError> {
        self.walk(root, &self.steps)
    }

    /// Follow a path ending in a table or a table function call.
    pub fn resolve_table(&self, root: &dyn Schema) -> Result<Arc<dyn Table>, ExecError> {
        let Some((last, schema_steps)) = self.steps.split_last() else {
            return Err(self.error(String::from("the root is not a table")));
        };
        let schema = self.walk(root, schema_steps)?;
        let resolution = match last {
            Step::Table(name) => schema.resolve_table(name)?,
            Step::Call { name, args } => schema.resolve_function(name, args)?,
            Step::SubSchema(_) | Step::Narrow(_) => {
                return Err(self.error(String::from("path ends at a schema")))
            }
        };
        resolution
            .into_table()
            .ok_or_else(|| self.error(String::from("table not found")))
    }
}

impl Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for step in &self.steps {
            match step {
                Step::SubSchema(name) | Step::Table(name) => write!(f, ".{name}")?,
                Step::Narrow(narrowing) => write!(f, ".<{}>", narrowing.type_name())?,
                Step::Call { name, args } => write!(f, ".{name}({})", args.iter().join(", "))?,
            }
        }
        Ok(())
    }
}

impl ToTokens for Narrowing {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match syn::parse_str::<syn::Type>(self.type_name) {
            Ok(ty) => ty.to_tokens(tokens),
            Err(_) => self.type_name.to_tokens(tokens),
        }
    }
}

impl ToTokens for Navigation {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let steps = self.steps.iter().map(|step| match step {
            Step::SubSchema(name) => quote!(.sub_schema(#name)),
            Step::Narrow(narrowing) => quote!(.narrow::<#narrowing>()),
            Step::Table(name) => quote!(.table(#name)),
            Step::Call { name, args } => quote!(.call(#name, (#(#args,)*))),
        });
        tokens.extend(quote!(root #(#steps)*))
    }
}
