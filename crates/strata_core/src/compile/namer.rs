use syn::Ident;

use super::{block::ScalarRef, Name};
use crate::{
    error::CompileError,
    plan::{Key, Operator},
};

const DEFAULT_PIPELINE: &str = "pipeline";

/// Mints the names used in a program.
/// - registry entries `v0, v1, ..` in order of registration, never reused
/// - scalars `s0, s1, ..`
/// - operator locals `op_<n>` after the operator's index in the plan
pub struct CompileNamer {
    registered: usize,
    scalars: usize,
}

impl CompileNamer {
    pub fn new() -> Self {
        Self {
            registered: 0,
            scalars: 0,
        }
    }

    pub fn next_registered(&mut self) -> Name {
        let name = Name::new(format!("v{}", self.registered));
        self.registered += 1;
        name
    }

    pub fn next_scalar(&mut self) -> ScalarRef {
        let scalar = ScalarRef(self.scalars);
        self.scalars += 1;
        scalar
    }

    pub fn operator_local(&self, key: Key<Operator>) -> Name {
        Name::new(format!("op_{}", key.arr_idx()))
    }
}

pub fn pipeline_ident(name: Option<&str>) -> Result<Ident, CompileError> {
    let name = name.unwrap_or(DEFAULT_PIPELINE);
    syn::parse_str::<Ident>(name)
        .map_err(|e| CompileError::Render(format!("`{name}` cannot name a pipeline: {e}")))
}
