use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

/// What a field contributes to the descriptor.
#[derive(Debug, Default)]
pub(crate) enum FieldRole {
    /// A plain field member.
    #[default]
    Field,
    /// `#[serializable(base)]` or `#[serializable(base = "..")]`.
    Base(Option<LitStr>),
    /// `#[serializable(skip)]`.
    Skip,
}

/// Field-level attributes.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub role: FieldRole,
    role_span: Option<Span>,
}

impl FieldAttributes {
    /// Collects every `#[serializable(...)]` on a field.
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|attr| super::is_serializable(attr)) {
            attr.parse_nested_meta(|meta| result.parse_meta(meta))?;
        }

        if result.rename.is_some() && !matches!(result.role, FieldRole::Field) {
            return Err(syn::Error::new(
                result.role_span.unwrap_or_else(Span::call_site),
                "`rename` cannot be combined with `base` or `skip`, use `base = \"..\"` to name a base",
            ));
        }
        Ok(result)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") {
            if self.rename.is_some() {
                return Err(meta.error("duplicate `rename` attribute"));
            }
            self.rename = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("base") {
            let name = if meta.input.peek(Token![=]) {
                Some(meta.value()?.parse()?)
            } else {
                None
            };
            self.set_role(&meta, FieldRole::Base(name))?;
        } else if meta.path.is_ident("skip") {
            self.set_role(&meta, FieldRole::Skip)?;
        } else {
            return Err(meta.error("unknown attribute, expected `rename`, `base` or `skip`"));
        }
        Ok(())
    }

    fn set_role(&mut self, meta: &ParseNestedMeta, role: FieldRole) -> syn::Result<()> {
        if self.role_span.is_some() {
            return Err(meta.error("`base` and `skip` may only appear once, and not together"));
        }
        self.role_span = Some(meta.path.require_ident()?.span());
        self.role = role;
        Ok(())
    }
}
