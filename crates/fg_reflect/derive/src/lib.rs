//! See following macros:
//!
//! - [`Serializable`]
//! - [`impl_auto_register`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static SERIALIZABLE_ATTRIBUTE_NAME: &str = "serializable";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Derive `Serializable`
///
/// `#[derive(Serializable)]` gives a struct with named fields a
/// `ClassDescriptor`, stored in a static cell and built on first use.
///
/// Every field becomes a member, keyed by the field name, in declaration
/// order. All members are mandatory when reading.
///
/// ```rust, ignore
/// #[derive(Serializable, Default)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
/// ```
///
/// Generic structs are supported. Each type parameter must itself be
/// `Serializable`, and every instantiation gets its own descriptor named
/// after its arguments, e.g. `Tagged<f32>`.
///
/// ## Type Attributes
///
/// ### `name`
///
/// Overrides the descriptor name (the default is the type's identifier).
///
/// ```rust, ignore
/// #[derive(Serializable, Default)]
/// #[serializable(name = "core.Health")]
/// struct Health { /* ... */ }
/// ```
///
/// ### `make` / `no_default`
///
/// By default fresh values are created with `Default::default`. Use
/// `make = path` to name another `fn() -> Self`, or `no_default` to
/// provide no factory at all. Such a type can then only be read in place;
/// reading it as a fresh value fails with `NotConstructible`.
///
/// ```rust, ignore
/// #[derive(Serializable)]
/// #[serializable(make = Spawner::idle)]
/// struct Spawner { rate: f32 }
/// ```
///
/// ### `accessor`
///
/// Adds a member backed by a getter and a setter instead of a field.
/// Accessor members come after the field members, in attribute order.
///
/// ```rust, ignore
/// #[derive(Serializable, Default)]
/// #[serializable(accessor(name = "opacity", get = Sprite::opacity, set = Sprite::set_opacity))]
/// struct Sprite {
///     #[serializable(skip)]
///     alpha: u8,
/// }
/// ```
///
/// ### `auto_register`
///
/// Submits the type for [`TypeRegistry::auto_register`]. A no-op for
/// generic types and when the `auto_register` feature is disabled.
///
/// [`TypeRegistry::auto_register`]: https://docs.rs/fg_reflect/latest/fg_reflect/registry/struct.TypeRegistry.html#method.auto_register
///
/// ## Field Attributes
///
/// - `rename = "key"`: store the field under `key`.
/// - `base`: mark the field as a composed base struct, stored under the
///   name of the field type's descriptor.
/// - `base = "key"`: as `base`, stored under `key`.
/// - `skip`: leave the field out. It keeps its factory value when read.
///
/// ```rust, ignore
/// #[derive(Serializable, Default)]
/// struct Enemy {
///     #[serializable(base)]
///     actor: Actor,
///     #[serializable(rename = "hp")]
///     health: u32,
///     #[serializable(skip)]
///     cached_path: Vec<Vec2>,
/// }
/// ```
#[proc_macro_derive(Serializable, attributes(serializable))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let info = match derive_data::SerializableStruct::from_input(&ast) {
        Ok(info) => info,
        Err(err) => return err.into_compile_error().into(),
    };

    let serializable_impls = impls::impl_serializable(&info);
    let auto_register_impls = impls::get_auto_register_impl(&info);

    TokenStream::from(quote! {
        const _: () = {
            #serializable_impls

            #auto_register_impls
        };
    })
}

/// Add the type to the automatic registry.
///
/// If the feature is not enabled, this macro will not do anything.
///
/// The type must be concrete (no uncertain generic parameters).
///
/// ## Example
///
/// ```ignore
/// impl_auto_register!(foo::Foo);
/// impl_auto_register!(Vec<u32>); // Ok
/// impl_auto_register!(Vec<T>); // Error
/// ```
///
/// This does not conflict with the `serializable(auto_register)` attribute.
#[proc_macro]
pub fn impl_auto_register(_input: TokenStream) -> TokenStream {
    #[cfg(not(feature = "auto_register"))]
    return utils::empty().into();

    #[cfg(feature = "auto_register")]
    {
        let type_path = syn::parse_macro_input!(_input as syn::Type);

        let fg_reflect_path = path::fg_reflect();
        let auto_register_ = path::auto_register_(&fg_reflect_path);

        TokenStream::from(quote! {
            const _: () = {
                #auto_register_::inventory::submit!{
                    #auto_register_::__AutoRegisterFunc(
                        <#type_path as #auto_register_::__RegisterType>::__register
                    )
                }
            };
        })
    }
}
