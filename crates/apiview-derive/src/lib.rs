use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, DeriveInput};

#[proc_macro_derive(IntoRecord)]
pub fn derive_into_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let mut generics = input.generics.clone();
    let (_, ty_generics, _) = input.generics.split_for_impl();
    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#name #ty_generics: ::apiview::__serde::Serialize));
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::apiview::IntoRecord for #name #ty_generics #where_clause {
            fn into_record(self) -> ::std::result::Result<::apiview::Record, ::apiview::ViewError> {
                ::apiview::Record::from_serialize(&self)
            }

            fn into_collection_record(
                self,
            ) -> ::std::result::Result<::apiview::CollectionRecord, ::apiview::ViewError> {
                ::apiview::CollectionRecord::from_serialize(&self)
            }
        }
    };

    TokenStream::from(expanded)
}
