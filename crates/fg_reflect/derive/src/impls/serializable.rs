use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericParam, LitStr};

use crate::derive_data::{AccessorAttribute, Factory, SerializableStruct};

/// Implement `Serializable` with a `ClassDescriptor` built on first use.
pub(crate) fn impl_serializable(info: &SerializableStruct) -> TokenStream {
    let fg_reflect_path = info.fg_reflect_path();
    let serializable_ = crate::path::serializable_(fg_reflect_path);
    let type_descriptor_ = crate::path::type_descriptor_(fg_reflect_path);
    let class_descriptor_ = crate::path::class_descriptor_(fg_reflect_path);

    let ident = info.ident();
    let name = get_name_expression(info);
    let members = get_member_tokens(info);
    let accessors = info.attrs().accessors.iter().map(get_accessor_tokens);
    let factory = get_factory_tokens(&info.attrs().factory);

    let builder = quote! {
        #class_descriptor_::<Self>::builder(#name)
            #(#members)*
            #(#accessors)*
            #factory
            .build()
    };

    let body = if info.impl_with_generic() {
        let cell_ = crate::path::generic_descriptor_cell_(fg_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert(|| #builder)
        }
    } else {
        let cell_ = crate::path::non_generic_descriptor_cell_(fg_reflect_path);
        quote! {
            static CELL: #cell_<#class_descriptor_<#ident>> = #cell_::new();
            CELL.get_or_init(|| #builder)
        }
    };

    let (impl_generics, ty_generics, _) = info.generics().split_for_impl();
    let where_clause = get_where_clause(info);

    quote! {
        impl #impl_generics #serializable_ for #ident #ty_generics #where_clause {
            fn descriptor() -> &'static dyn #type_descriptor_<Self> {
                #body
            }
        }
    }
}

/// The descriptor name.
///
/// Non-generic types use a literal. Generic types append their arguments
/// at runtime, e.g. `"Tagged<f32>"`.
fn get_name_expression(info: &SerializableStruct) -> TokenStream {
    let base = match &info.attrs().name {
        Some(name) => name.clone(),
        None => LitStr::new(&info.ident().to_string(), info.ident().span()),
    };

    if !info.impl_with_generic() {
        return quote!(#base);
    }

    let type_name_ = crate::path::type_name_(info.fg_reflect_path());
    let arguments: Vec<TokenStream> = info
        .generics()
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(param) => {
                let ident = &param.ident;
                Some(quote!(#type_name_::<#ident>()))
            }
            GenericParam::Const(param) => {
                let ident = &param.ident;
                Some(quote!(#ident))
            }
            GenericParam::Lifetime(_) => None,
        })
        .collect();

    let placeholders = vec!["{}"; arguments.len()].join(", ");
    let format = format!("{{}}<{placeholders}>");

    quote! {
        ::std::format!(#format, #base, #(#arguments),*)
    }
}

fn get_member_tokens<'a>(info: &'a SerializableStruct) -> impl Iterator<Item = TokenStream> + 'a {
    info.members().iter().map(|member| {
        let ident = member.ident;
        let get = quote!(|value| &value.#ident);
        let get_mut = quote!(|value| &mut value.#ident);

        match (&member.name, member.is_base) {
            (Some(name), false) => quote!(.field(#name, #get, #get_mut)),
            (Some(name), true) => quote!(.base_named(#name, #get, #get_mut)),
            (None, _) => quote!(.base(#get, #get_mut)),
        }
    })
}

fn get_accessor_tokens(accessor: &AccessorAttribute) -> TokenStream {
    let AccessorAttribute { name, get, set } = accessor;
    quote!(.accessor(#name, #get, #set))
}

fn get_factory_tokens(factory: &Factory) -> TokenStream {
    match factory {
        Factory::Default => quote!(.with_default()),
        Factory::Make(path) => quote!(.factory(#path)),
        Factory::None => crate::utils::empty(),
    }
}

/// Keeps the user's bounds. Generic types additionally require every type
/// parameter and member type to be `Serializable`, and `Self: Default`
/// when `Default::default` is the factory.
fn get_where_clause(info: &SerializableStruct) -> TokenStream {
    let mut predicates: Vec<TokenStream> = info
        .generics()
        .where_clause
        .iter()
        .flat_map(|clause| clause.predicates.iter())
        .map(|predicate| quote!(#predicate))
        .collect();

    if info.impl_with_generic() {
        let serializable_ = crate::path::serializable_(info.fg_reflect_path());

        predicates.extend(info.generics().type_params().map(|param| {
            let ident = &param.ident;
            quote!(#ident: #serializable_)
        }));
        predicates.extend(info.members().iter().map(|member| {
            let ty = member.ty;
            quote!(#ty: #serializable_)
        }));
        if matches!(info.attrs().factory, Factory::Default) {
            predicates.push(quote!(Self: ::core::default::Default));
        }
    }

    if predicates.is_empty() {
        crate::utils::empty()
    } else {
        quote!(where #(#predicates),*)
    }
}
