use heck::{ToShoutySnakeCase, ToSnakeCase};
use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Ident, ItemStruct, LitStr, parse_macro_input};

pub fn expand(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields: Vec<(Ident, LitStr)> = input
        .fields
        .iter()
        .filter_map(|f| f.ident.as_ref())
        .map(|field| {
            let plain = field.unraw().to_string();
            let const_name = Ident::new(&plain.to_shouty_snake_case(), field.span());
            let key = LitStr::new(&plain.to_snake_case(), field.span());
            (const_name, key)
        })
        .collect();

    let consts = fields.iter().map(|(const_name, key)| {
        quote! {
            #[allow(dead_code)]
            pub const #const_name: &'static str = #key;
        }
    });
    let keys = fields.iter().map(|(_, key)| key);

    let expanded = quote! {
        #input

        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#consts)*

            /// Wire keys of every named field, in declaration order.
            #[allow(dead_code)]
            pub const FIELD_NAMES: &'static [&'static str] = &[#(#keys),*];

            #[allow(dead_code)]
            pub fn is_field_name(key: &str) -> bool {
                Self::FIELD_NAMES.contains(&key)
            }
        }
    };

    TokenStream::from(expanded)
}
