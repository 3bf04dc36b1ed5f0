use crate::args::RouterArgs;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Fields, ItemStruct};

pub fn router_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as RouterArgs);
    let input = parse_macro_input!(item as ItemStruct);
    generate_router_impl(&args, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_router_impl(args: &RouterArgs, mut input: ItemStruct) -> syn::Result<TokenStream2> {
    let constructor = generate_constructor(&input)?;

    // `#[default]` is only meaningful to the constructor
    for field in input.fields.iter_mut() {
        field.attrs.retain(|attr| !attr.path().is_ident("default"));
    }

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let prefix = args.prefix.iter();
    let shared = args.shared.builder_calls();

    Ok(quote! {
        #input

        impl #impl_generics ::httprouter::RouterDecl for #struct_name #ty_generics #where_clause {
            fn router_spec() -> ::httprouter::RouterSpec {
                ::httprouter::RouterSpec::new()
                    #(.prefix(#prefix))*
                    #shared
            }
        }

        #constructor
    })
}

/// `new(..)` taking every field not marked `#[default]`, in declaration order
fn generate_constructor(input: &ItemStruct) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.fields {
        Fields::Named(fields) => {
            let mut params = Vec::new();
            let mut inits = Vec::new();
            for field in &fields.named {
                let field_name = &field.ident;
                let field_type = &field.ty;
                if field.attrs.iter().any(|attr| attr.path().is_ident("default")) {
                    inits.push(quote! { #field_name: ::core::default::Default::default() });
                } else {
                    params.push(quote! { #field_name: #field_type });
                    inits.push(quote! { #field_name });
                }
            }
            quote! {
                #vis fn new(#(#params),*) -> Self {
                    Self { #(#inits),* }
                }
            }
        }
        Fields::Unit => quote! {
            #vis fn new() -> Self {
                Self
            }
        },
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "#[router] supports structs with named fields and unit structs",
            ))
        }
    };

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #[allow(dead_code, clippy::new_without_default, clippy::too_many_arguments)]
            #body
        }
    })
}
