use crate::derive_data::SerializableStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(info: &SerializableStruct) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    let Some(span) = info.attrs().auto_register else {
        return crate::utils::empty();
    };

    // Invalid for generic types.
    if info.impl_with_generic() {
        return crate::utils::empty();
    }

    let auto_register_ = crate::path::auto_register_(info.fg_reflect_path());
    let ident = info.ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &SerializableStruct) -> proc_macro2::TokenStream {
    crate::utils::empty()
}
