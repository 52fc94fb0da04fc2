extern crate proc_macro;

use proc_macro::TokenStream;

mod define_field_names;

/// Attaches a `&'static str` constant per named field (`text` -> `TEXT`),
/// a `FIELD_NAMES` slice and an `is_field_name` lookup to a struct.
#[proc_macro_attribute]
pub fn define_field_names(attr: TokenStream, item: TokenStream) -> TokenStream {
    define_field_names::expand(attr, item)
}
