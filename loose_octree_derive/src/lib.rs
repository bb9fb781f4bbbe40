mod bounded;

/// Derive macro generating an implementation of the trait `Bounded`.
///
/// The bounding box is read from a `bounds` field, or built from `center` and `extent` fields.
/// A field named `octree_id` receives the identifier of the element in its octree.
#[proc_macro_derive(Bounded)]
pub fn bounded_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse(input);

    bounded::impl_bounded(ast).unwrap_or_else(|e| syn::Error::to_compile_error(&e).into())
}

fn get_field<'a>(name: &str, data: &'a syn::DataStruct) -> Option<&'a syn::Field> {
    data.fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
}
