use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Path};

/// How the descriptor constructs fresh values.
#[derive(Debug, Default)]
pub(crate) enum Factory {
    /// `Default::default`.
    #[default]
    Default,
    /// `#[serializable(make = path)]`.
    Make(Path),
    /// `#[serializable(no_default)]`.
    None,
}

/// `#[serializable(accessor(name = "..", get = path, set = path))]`
#[derive(Debug)]
pub(crate) struct AccessorAttribute {
    pub name: LitStr,
    pub get: Path,
    pub set: Path,
}

/// Type-level attributes.
#[derive(Debug, Default)]
pub(crate) struct TypeAttributes {
    pub name: Option<LitStr>,
    pub factory: Factory,
    pub accessors: Vec<AccessorAttribute>,
    pub auto_register: Option<Span>,
    factory_span: Option<Span>,
}

impl TypeAttributes {
    /// Collects every `#[serializable(...)]` on the type.
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|attr| super::is_serializable(attr)) {
            attr.parse_nested_meta(|meta| result.parse_meta(meta))?;
        }
        Ok(result)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            if self.name.is_some() {
                return Err(meta.error("duplicate `name` attribute"));
            }
            self.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("make") {
            let path: Path = meta.value()?.parse()?;
            self.set_factory(&meta, Factory::Make(path))?;
        } else if meta.path.is_ident("no_default") {
            self.set_factory(&meta, Factory::None)?;
        } else if meta.path.is_ident("accessor") {
            self.accessors.push(Self::parse_accessor(&meta)?);
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(meta.path.require_ident()?.span());
        } else {
            return Err(meta.error(
                "unknown attribute, expected `name`, `make`, `no_default`, `accessor` or `auto_register`",
            ));
        }
        Ok(())
    }

    fn set_factory(&mut self, meta: &ParseNestedMeta, factory: Factory) -> syn::Result<()> {
        if self.factory_span.is_some() {
            return Err(meta.error("`make` and `no_default` may only appear once, and not together"));
        }
        self.factory_span = Some(meta.path.require_ident()?.span());
        self.factory = factory;
        Ok(())
    }

    fn parse_accessor(meta: &ParseNestedMeta) -> syn::Result<AccessorAttribute> {
        let mut name: Option<LitStr> = None;
        let mut get: Option<Path> = None;
        let mut set: Option<Path> = None;

        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("name") {
                name = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("get") {
                get = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("set") {
                set = Some(inner.value()?.parse()?);
            } else {
                return Err(inner.error("expected `name`, `get` or `set`"));
            }
            Ok(())
        })?;

        match (name, get, set) {
            (Some(name), Some(get), Some(set)) => Ok(AccessorAttribute { name, get, set }),
            _ => Err(meta.error("`accessor` requires `name`, `get` and `set`")),
        }
    }
}
