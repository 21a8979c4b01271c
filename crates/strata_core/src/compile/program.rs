use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::Ident;

use super::{
    block::{Block, Expr},
    namer::pipeline_ident,
    Name,
};
use crate::{error::CompileError, plan::Scalar, value::ElementShape};

/// A compiled plan.
///
/// Runs with [`Program::execute`], and renders as a rust function of the root
/// schema for inspection.
pub struct Program {
    registry: IndexMap<Name, Expr>,
    body: Block,
    scalars: Vec<Scalar>,
    shape: ElementShape,
    pipeline: Ident,
}

impl Program {
    pub(crate) fn new(
        registry: IndexMap<Name, Expr>,
        body: Block,
        scalars: Vec<Scalar>,
        shape: ElementShape,
        pipeline_name: Option<&str>,
    ) -> Result<Self, CompileError> {
        Ok(Self {
            registry,
            body,
            scalars,
            shape,
            pipeline: pipeline_ident(pipeline_name)?,
        })
    }

    /// Named intermediate results, in order of definition.
    pub fn registry(&self) -> &IndexMap<Name, Expr> {
        &self.registry
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn scalars(&self) -> &[Scalar] {
        &self.scalars
    }

    /// The shape of the rows produced.
    pub fn shape(&self) -> &ElementShape {
        &self.shape
    }

    /// Render as formatted rust.
    pub fn pretty(&self) -> Result<String, CompileError> {
        let file = syn::parse2::<syn::File>(self.to_token_stream())
            .map_err(|e| CompileError::Render(e.to_string()))?;
        Ok(prettyplease::unparse(&file))
    }
}

impl ToTokens for Program {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self {
            registry,
            body: Block { stmts, expr },
            scalars,
            pipeline,
            ..
        } = self;
        let scalars = scalars.iter().enumerate().map(|(i, scalar)| {
            let ident = Ident::new(&format!("s{i}"), proc_macro2::Span::call_site());
            let label = scalar.label();
            quote!(let #ident = scalar(#label);)
        });
        let registry = registry.iter().map(|(name, value)| quote!(let #name = #value;));
        tokens.extend(quote! {
            pub fn #pipeline(root: &dyn Schema) -> impl Iterator<Item = Row> {
                #(#scalars)*
                #(#registry)*
                #(#stmts)*
                #expr
            }
        })
    }
}
