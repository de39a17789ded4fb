use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Type};

use super::attributes::FieldAttributes;
use super::{FieldRole, TypeAttributes};

/// A field that becomes a member of the descriptor.
pub(crate) struct StructMember<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// The member key, `None` for a base stored under its descriptor's name.
    pub name: Option<LitStr>,
    pub is_base: bool,
}

/// A parsed `#[derive(Serializable)]` input.
pub(crate) struct SerializableStruct<'a> {
    fg_reflect_path: syn::Path,
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    members: Vec<StructMember<'a>>,
}

impl<'a> SerializableStruct<'a> {
    pub fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let fields = match &ast.data {
            Data::Struct(data) => &data.fields,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Serializable` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Serializable` cannot be derived for unions",
                ));
            }
        };

        if let Fields::Unnamed(unnamed) = fields {
            return Err(syn::Error::new(
                unnamed.span(),
                "`Serializable` can only be derived for structs with named fields",
            ));
        }

        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "`Serializable` types must be `'static` and cannot have lifetime parameters",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut members = Vec::new();
        for field in fields {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };

            let (name, is_base) = match field_attrs.role {
                FieldRole::Skip => continue,
                FieldRole::Base(name) => (name, true),
                FieldRole::Field => {
                    let name = field_attrs
                        .rename
                        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
                    (Some(name), false)
                }
            };

            members.push(StructMember {
                ident,
                ty: &field.ty,
                name,
                is_base,
            });
        }

        let info = Self {
            fg_reflect_path: crate::path::fg_reflect(),
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            members,
        };
        info.check_unique_names()?;
        Ok(info)
    }

    /// Member names known at expansion time must be unique. Bases stored
    /// under their descriptor's name are checked when the descriptor is built.
    fn check_unique_names(&self) -> syn::Result<()> {
        let fields = self.members.iter().filter_map(|member| member.name.as_ref());
        let accessors = self.attrs.accessors.iter().map(|accessor| &accessor.name);

        let mut seen: Vec<String> = Vec::new();
        for name in fields.chain(accessors) {
            let value = name.value();
            if seen.contains(&value) {
                return Err(syn::Error::new(name.span(), format!("duplicate member `{value}`")));
            }
            seen.push(value);
        }
        Ok(())
    }

    #[inline]
    pub fn fg_reflect_path(&self) -> &syn::Path {
        &self.fg_reflect_path
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub fn generics(&self) -> &'a Generics {
        self.generics
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn members(&self) -> &[StructMember<'a>] {
        &self.members
    }

    /// Whether the type has type or const parameters.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }
}
