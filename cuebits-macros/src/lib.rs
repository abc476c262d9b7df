use darling::util::Ignored;
use darling::{FromDeriveInput, FromField, ast};
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use proc_macro::TokenStream;

#[derive(FromField)]
#[darling(attributes(debug_fields))]
struct FieldOpts {
    ident: Option<syn::Ident>,

    /// Leave the field out of the dump.
    #[darling(default)]
    skip: bool,

    /// Key to print instead of the field name.
    #[darling(default)]
    rename: Option<String>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(debug_fields), supports(struct_any))]
struct DebugFieldsOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<Ignored, FieldOpts>,
}

/// Implements `cuebits::DebugFields` by listing every field in declaration
/// order, rendered with its `Debug` implementation.
#[proc_macro_derive(DebugFields, attributes(debug_fields))]
pub fn derive_debug_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match DebugFieldsOpts::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => {
            return TokenStream::from(e.write_errors());
        }
    };

    let name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let fields = opts
        .data
        .take_struct()
        .unwrap_or_else(|| unreachable!("DebugFields can only be derived for structs"));

    let (keys, members): (Vec<String>, Vec<syn::Member>) = fields
        .fields
        .into_iter()
        .enumerate()
        .filter(|(_, f)| !f.skip)
        .map(|(i, f)| match f.ident {
            Some(ident) => (
                f.rename.unwrap_or_else(|| ident.to_string()),
                syn::Member::from(ident),
            ),
            None => (
                f.rename.unwrap_or_else(|| i.to_string()),
                syn::Index::from(i).into(),
            ),
        })
        .unzip();

    let expanded = quote! {
        impl #impl_generics ::cuebits::DebugFields for #name #ty_generics #where_clause {
            fn debug_fields(&self) -> ::std::vec::Vec<(&'static str, ::std::string::String)> {
                ::std::vec![
                    #( (#keys, ::std::format!("{:?}", &self.#members)), )*
                ]
            }
        }
    };

    TokenStream::from(expanded)
}
