use crate::get_field;

pub fn impl_bounded(input: syn::Result<syn::DeriveInput>) -> syn::Result<proc_macro::TokenStream> {
    let mut input = input?;

    let data_struct = match &input.data {
        syn::Data::Struct(data_struct) => data_struct,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "the `Bounded` trait can only be derived for struct types",
            ))
        }
    };

    let (bounds_method, predicates) = bounds_method(data_struct)?;
    let set_element_id_method = get_field("octree_id", data_struct).map(|_| {
        quote::quote! {
            #[inline]
            fn set_element_id(&mut self, id: ::loose_octree::ElementId) {
                self.octree_id = ::core::option::Option::Some(id);
            }
        }
    });

    input
        .generics
        .make_where_clause()
        .predicates
        .extend(predicates);

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = &input.ident;

    Ok(quote::quote! {
        impl #impl_generics ::loose_octree::Bounded for #name #ty_generics #where_clause {
            #bounds_method

            #set_element_id_method
        }
    }
    .into())
}

fn bounds_method(
    data_struct: &syn::DataStruct,
) -> syn::Result<(proc_macro2::TokenStream, Vec<syn::WherePredicate>)> {
    if let Some(field) = get_field("bounds", data_struct) {
        let ty = &field.ty;

        return Ok((
            quote::quote! {
                #[inline]
                fn bounds(&self) -> ::loose_octree::BoxCenterAndExtent {
                    ::core::convert::Into::into(::core::clone::Clone::clone(&self.bounds))
                }
            },
            vec![syn::parse_quote! {
                #ty: ::core::clone::Clone
                    + ::core::convert::Into<::loose_octree::BoxCenterAndExtent>
            }],
        ));
    }

    match (
        get_field("center", data_struct),
        get_field("extent", data_struct),
    ) {
        (Some(center), Some(extent)) => {
            let (center_ty, extent_ty) = (&center.ty, &extent.ty);

            Ok((
                quote::quote! {
                    #[inline]
                    fn bounds(&self) -> ::loose_octree::BoxCenterAndExtent {
                        ::loose_octree::BoxCenterAndExtent::new(
                            ::core::convert::Into::into(::core::clone::Clone::clone(&self.center)),
                            ::core::convert::Into::into(::core::clone::Clone::clone(&self.extent)),
                        )
                    }
                },
                vec![
                    syn::parse_quote! {
                        #center_ty: ::core::clone::Clone
                            + ::core::convert::Into<::loose_octree::glam::Vec3>
                    },
                    syn::parse_quote! {
                        #extent_ty: ::core::clone::Clone
                            + ::core::convert::Into<::loose_octree::glam::Vec3>
                    },
                ],
            ))
        }
        _ => Err(syn::Error::new_spanned(
            &data_struct.fields,
            "no `bounds` field, or `center` and `extent` fields",
        )),
    }
}
