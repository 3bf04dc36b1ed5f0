use crate::args::{RouteArgs, RoutesArgs, WebSocketArgs};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Attribute, Expr, FnArg, Ident, ImplItem, ImplItemFn,
    ItemImpl, Lit, Meta, Type,
};

const MARKERS: [&str; 8] = [
    "get", "post", "put", "patch", "delete", "route", "websocket", "lifespan",
];
const PARAM_KINDS: [&str; 3] = ["body", "param", "query"];

#[derive(Clone, Copy)]
enum ParamKind {
    Body,
    Param,
    Query,
    Raw,
}

struct ParamInfo {
    ty: Type,
    kind: ParamKind,
}

enum MemberKind {
    Http(Box<RouteArgs>),
    WebSocket(WebSocketArgs),
    Lifespan,
}

struct MemberInfo {
    kind: MemberKind,
    fn_name: Ident,
    has_receiver: bool,
    params: Vec<ParamInfo>,
    docs: Option<String>,
}

pub fn routes_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as RoutesArgs);
    let input = parse_macro_input!(item as ItemImpl);
    generate_routes_impl(&args, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_routes_impl(args: &RoutesArgs, input: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[routes] goes on an inherent impl block",
        ));
    }

    let mut members: Vec<MemberInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();
    let mut lifespan_seen = false;

    for item in input.items.iter() {
        let ImplItem::Fn(method) = item else {
            clean_items.push(item.clone());
            continue;
        };
        let Some(member) = extract_member_info(method)? else {
            clean_items.push(item.clone());
            continue;
        };
        if let MemberKind::Lifespan = member.kind {
            if lifespan_seen {
                return Err(syn::Error::new_spanned(
                    &method.sig.ident,
                    "a router declares at most one #[lifespan]",
                ));
            }
            lifespan_seen = true;
        }
        members.push(member);

        let mut clean_method = method.clone();
        clean_method.attrs.retain(|attr| !is_marker_attr(attr));
        for input in clean_method.sig.inputs.iter_mut() {
            if let FnArg::Typed(pat_type) = input {
                pat_type.attrs.retain(|attr| !is_param_attr(attr));
            }
        }
        clean_items.push(ImplItem::Fn(clean_method));
    }

    let declarations = members.iter().map(generate_declaration);

    let self_ty = &input.self_ty;
    let attrs = &input.attrs;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let mut router_generics = input.generics.clone();
    let state: Type = match &args.state {
        Some(state) => state.clone(),
        None => {
            router_generics.params.push(parse_quote! {
                __S: ::core::clone::Clone + ::core::marker::Send + ::core::marker::Sync + 'static
            });
            parse_quote!(__S)
        }
    };
    let (router_impl_generics, _, router_where_clause) = router_generics.split_for_impl();

    Ok(quote! {
        #(#attrs)*
        impl #impl_generics #self_ty #where_clause {
            #(#clean_items)*
        }

        impl #router_impl_generics ::httprouter::Router<#state> for #self_ty #router_where_clause {
            fn router_spec() -> ::core::option::Option<::httprouter::RouterSpec> {
                #[allow(unused_imports)]
                use ::httprouter::__private::{ViaDecl as _, ViaFallback as _};
                (&&::httprouter::__private::Probe::<Self>::new()).router_spec()
            }

            fn declare(
                self: ::std::sync::Arc<Self>,
                routes: &mut ::httprouter::Declarations<#state>,
            ) {
                #(#declarations)*
            }
        }
    })
}

fn generate_declaration(member: &MemberInfo) -> TokenStream2 {
    let fn_name = &member.fn_name;
    let (capture, target) = if member.has_receiver {
        (
            quote! { let router = ::std::sync::Arc::clone(&self); },
            quote! { router. },
        )
    } else {
        (quote! {}, quote! { Self:: })
    };

    match &member.kind {
        MemberKind::Http(args) => {
            let spec = generate_route_spec(args, member);

            let extractor_patterns = member.params.iter().enumerate().map(|(i, p)| {
                let temp_ident = format_ident!("__p_{}", i);
                let ty = &p.ty;
                match p.kind {
                    ParamKind::Body => quote! {
                        ::httprouter::axum::Json(#temp_ident): ::httprouter::axum::Json<#ty>
                    },
                    ParamKind::Param => quote! {
                        ::httprouter::axum::extract::Path(#temp_ident):
                            ::httprouter::axum::extract::Path<#ty>
                    },
                    ParamKind::Query => quote! {
                        ::httprouter::axum::extract::Query(#temp_ident):
                            ::httprouter::axum::extract::Query<#ty>
                    },
                    ParamKind::Raw => quote! { #temp_ident: #ty },
                }
            });
            let internal_args = (0..member.params.len()).map(|i| format_ident!("__p_{}", i));

            quote! {
                {
                    #capture
                    routes.route(#spec, move |#(#extractor_patterns),*| async move {
                        use ::httprouter::axum::response::IntoResponse as _;
                        #target #fn_name(#(#internal_args),*).await.into_response()
                    });
                }
            }
        }
        MemberKind::WebSocket(args) => {
            let path = &args.path;
            let name = args
                .name
                .as_ref()
                .map(|name| name.value())
                .unwrap_or_else(|| fn_name.to_string());
            let rebind = if member.has_receiver {
                quote! { let router = ::std::sync::Arc::clone(&router); }
            } else {
                quote! {}
            };

            quote! {
                {
                    #capture
                    routes.websocket(
                        ::httprouter::WebSocketSpec::new(#path).name(#name),
                        move |socket: ::httprouter::axum::extract::ws::WebSocket| {
                            #rebind
                            async move { #target #fn_name(socket).await }
                        },
                    );
                }
            }
        }
        MemberKind::Lifespan => quote! {
            {
                #capture
                routes.lifespan(move |running: ::httprouter::Running| async move {
                    #target #fn_name(running).await
                });
            }
        },
    }
}

fn generate_route_spec(args: &RouteArgs, member: &MemberInfo) -> TokenStream2 {
    let path = &args.path;
    let methods = args
        .methods
        .iter()
        .filter_map(method_variant)
        .map(|variant| quote! { ::httprouter::HttpMethod::#variant });
    let name = args
        .name
        .as_ref()
        .map(|name| name.value())
        .unwrap_or_else(|| member.fn_name.to_string());
    let description = args
        .description
        .as_ref()
        .map(|description| description.value())
        .or_else(|| member.docs.clone());
    let description = description.iter();
    let status_code = args.status_code.iter();
    let summary = args.summary.iter();
    let response_description = args.response_description.iter();
    let operation_id = args.operation_id.iter();
    let headers = args.headers.iter().map(|(name, value)| {
        quote! {
            .response_header(
                ::httprouter::axum::http::HeaderName::from_static(#name),
                ::httprouter::axum::http::HeaderValue::from_static(#value),
            )
        }
    });
    let shared = args.shared.builder_calls();

    quote! {
        ::httprouter::RouteSpec::new(#path, [#(#methods),*])
            .name(#name)
            #(.status_code(#status_code))*
            #(.summary(#summary))*
            #(.description(#description))*
            #(.response_description(#response_description))*
            #(.operation_id(#operation_id))*
            #(#headers)*
            #shared
    }
}

fn extract_member_info(method: &ImplItemFn) -> syn::Result<Option<MemberInfo>> {
    let mut markers = method.attrs.iter().filter(|attr| is_marker_attr(attr));
    let Some(attr) = markers.next() else {
        return Ok(None);
    };
    if let Some(extra) = markers.next() {
        return Err(syn::Error::new_spanned(
            extra,
            "a method takes one route attribute",
        ));
    }
    if method.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &method.sig.fn_token,
            "route methods must be async",
        ));
    }

    let marker = marker_name(attr).unwrap_or_default();
    let kind = match marker.as_str() {
        "websocket" => MemberKind::WebSocket(attr.parse_args()?),
        "lifespan" => {
            if !matches!(attr.meta, Meta::Path(_)) {
                return Err(syn::Error::new_spanned(attr, "#[lifespan] takes no arguments"));
            }
            MemberKind::Lifespan
        }
        "route" => {
            let args: RouteArgs = attr.parse_args()?;
            if args.methods.is_empty() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "#[route] needs `methods = [..]`",
                ));
            }
            for name in &args.methods {
                if method_variant(name).is_none() {
                    return Err(syn::Error::new_spanned(
                        name,
                        "expected one of GET, POST, PUT, PATCH, DELETE",
                    ));
                }
            }
            MemberKind::Http(Box::new(args))
        }
        http_method => {
            let mut args: RouteArgs = attr.parse_args()?;
            if !args.methods.is_empty() {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!(
                        "#[{}] sets its own method; use #[route] for a method set",
                        http_method
                    ),
                ));
            }
            args.methods = vec![Ident::new(&http_method.to_uppercase(), Span::call_site())];
            MemberKind::Http(Box::new(args))
        }
    };

    let params: Vec<ParamInfo> = method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(ParamInfo {
                ty: (*pat_type.ty).clone(),
                kind: get_param_kind(&pat_type.attrs),
            }),
            FnArg::Receiver(_) => None,
        })
        .collect();

    if matches!(kind, MemberKind::WebSocket(_) | MemberKind::Lifespan) && params.len() != 1 {
        let expected = match kind {
            MemberKind::Lifespan => "a lifespan takes one `Running` argument",
            _ => "a websocket handler takes one `WebSocket` argument",
        };
        return Err(syn::Error::new_spanned(&method.sig.inputs, expected));
    }

    Ok(Some(MemberInfo {
        kind,
        fn_name: method.sig.ident.clone(),
        has_receiver: method.sig.receiver().is_some(),
        params,
        docs: doc_comment(&method.attrs),
    }))
}

/// `GET` becomes `Get`
fn method_variant(method: &Ident) -> Option<Ident> {
    let variant = match method.to_string().to_uppercase().as_str() {
        "GET" => "Get",
        "POST" => "Post",
        "PUT" => "Put",
        "PATCH" => "Patch",
        "DELETE" => "Delete",
        _ => return None,
    };
    Some(Ident::new(variant, method.span()))
}

fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(doc) => Some(doc.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();
    let docs = lines.join("\n").trim().to_string();
    (!docs.is_empty()).then_some(docs)
}

fn get_param_kind(attrs: &[Attribute]) -> ParamKind {
    for attr in attrs {
        match marker_name(attr).as_deref() {
            Some("body") => return ParamKind::Body,
            Some("param") => return ParamKind::Param,
            Some("query") => return ParamKind::Query,
            _ => {}
        }
    }
    ParamKind::Raw
}

fn marker_name(attr: &Attribute) -> Option<String> {
    attr.path()
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}

fn is_marker_attr(attr: &Attribute) -> bool {
    marker_name(attr).is_some_and(|name| MARKERS.contains(&name.as_str()))
}

fn is_param_attr(attr: &Attribute) -> bool {
    marker_name(attr).is_some_and(|name| PARAM_KINDS.contains(&name.as_str()))
}
