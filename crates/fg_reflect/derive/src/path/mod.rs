//! Paths of the `fg_reflect` items used by generated code, kept in one
//! place so that moving an item only touches this module.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `fg_reflect` crate.
///
/// 1. For crates that depend on `fg_reflect`, `::fg_reflect` is returned.
/// 2. For crates that depend on a facade (`forge`, `fg_core`, `fg`),
///    `::facade::reflect` is returned.
/// 3. Otherwise `::fg_reflect` is returned, which may be incorrect.
///
/// Reading the manifest is relatively expensive, so the path is obtained
/// once per expansion and passed around.
pub(crate) fn fg_reflect() -> syn::Path {
    fg_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("fg_reflect"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn serializable_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::Serializable
    }
}

#[inline(always)]
pub(crate) fn type_descriptor_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::descriptor::TypeDescriptor
    }
}

#[inline(always)]
pub(crate) fn type_name_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::descriptor::type_name
    }
}

#[inline(always)]
pub(crate) fn class_descriptor_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::class::ClassDescriptor
    }
}

#[inline(always)]
pub(crate) fn non_generic_descriptor_cell_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::registry::NonGenericDescriptorCell
    }
}

#[inline(always)]
pub(crate) fn generic_descriptor_cell_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::registry::GenericDescriptorCell
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(fg_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #fg_reflect_path::__macro_exports::auto_register
    }
}
