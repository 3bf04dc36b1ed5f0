use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    braced, bracketed,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Expr, Ident, LitBool, LitInt, LitStr, Token, Type,
};

/// `key: value` inside a `{ .. }` map
struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K: Parse, V: Parse> Parse for Entry<K, V> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key = input.parse()?;
        input.parse::<Token![:]>()?;
        let value = input.parse()?;
        Ok(Entry { key, value })
    }
}

fn parse_list<T: Parse>(input: ParseStream) -> syn::Result<Vec<T>> {
    let content;
    bracketed!(content in input);
    Ok(Punctuated::<T, Token![,]>::parse_terminated(&content)?
        .into_iter()
        .collect())
}

fn parse_map<K: Parse, V: Parse>(input: ParseStream) -> syn::Result<Vec<(K, V)>> {
    let content;
    braced!(content in input);
    Ok(Punctuated::<Entry<K, V>, Token![,]>::parse_terminated(&content)?
        .into_iter()
        .map(|entry| (entry.key, entry.value))
        .collect())
}

fn set_once<T>(slot: &mut Option<T>, key: &Ident, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(key.span(), format!("duplicate option `{}`", key)));
    }
    *slot = Some(value);
    Ok(())
}

/// Parse `key = value, ...`; `option` returns false for keys it does not know
fn parse_options(
    input: ParseStream,
    mut option: impl FnMut(&Ident, ParseStream) -> syn::Result<bool>,
) -> syn::Result<()> {
    while !input.is_empty() {
        let key: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        if !option(&key, input)? {
            return Err(syn::Error::new(key.span(), format!("unknown option `{}`", key)));
        }
        if input.is_empty() {
            break;
        }
        input.parse::<Token![,]>()?;
    }
    Ok(())
}

pub(crate) fn status_code(lit: &LitInt) -> syn::Result<u16> {
    let status: u16 = lit.base10_parse()?;
    if !(100..=999).contains(&status) {
        return Err(syn::Error::new(
            lit.span(),
            "status code must be between 100 and 999",
        ));
    }
    Ok(status)
}

/// Options routers and routes have in common
#[derive(Default)]
pub(crate) struct Shared {
    tags: Vec<LitStr>,
    responses: Vec<(u16, LitStr)>,
    deprecated: Option<LitBool>,
    include_in_schema: Option<LitBool>,
    guards: Vec<Expr>,
    interceptors: Vec<Expr>,
}

impl Shared {
    fn parse_option(&mut self, key: &Ident, input: ParseStream) -> syn::Result<bool> {
        match key.to_string().as_str() {
            "tags" => self.tags = parse_list(input)?,
            "responses" => {
                for (status, description) in parse_map::<LitInt, LitStr>(input)? {
                    self.responses.push((status_code(&status)?, description));
                }
            }
            "deprecated" => set_once(&mut self.deprecated, key, input.parse()?)?,
            "include_in_schema" => set_once(&mut self.include_in_schema, key, input.parse()?)?,
            "guards" => self.guards = parse_list(input)?,
            "interceptors" => self.interceptors = parse_list(input)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Builder calls shared by `RouterSpec` and `RouteSpec`
    pub(crate) fn builder_calls(&self) -> TokenStream2 {
        let tags = &self.tags;
        let tags = if tags.is_empty() {
            quote! {}
        } else {
            quote! { .tags([#(#tags),*]) }
        };
        let responses = self.responses.iter().map(|(status, description)| {
            quote! { .response(#status, ::httprouter::ResponseDoc::new(#description)) }
        });
        let deprecated = self.deprecated.iter();
        let include_in_schema = self.include_in_schema.iter();
        let interceptors = &self.interceptors;
        let guards = &self.guards;

        quote! {
            #tags
            #(#responses)*
            #(.deprecated(#deprecated))*
            #(.include_in_schema(#include_in_schema))*
            #(.interceptor(#interceptors))*
            #(.guard(#guards))*
        }
    }
}

/// `#[router(prefix = "/api", tags = ["items"], ...)]`
pub(crate) struct RouterArgs {
    pub prefix: Option<LitStr>,
    pub shared: Shared,
}

impl Parse for RouterArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut prefix = None;
        let mut shared = Shared::default();
        parse_options(input, |key, input| {
            if key == "prefix" {
                set_once(&mut prefix, key, input.parse()?)?;
                Ok(true)
            } else {
                shared.parse_option(key, input)
            }
        })?;
        Ok(RouterArgs { prefix, shared })
    }
}

/// `#[get("/path", status_code = 202, ...)]` and `#[route("/path", methods = [GET, POST], ...)]`
pub(crate) struct RouteArgs {
    pub path: LitStr,
    pub methods: Vec<Ident>,
    pub status_code: Option<u16>,
    pub summary: Option<LitStr>,
    pub description: Option<LitStr>,
    pub response_description: Option<LitStr>,
    pub operation_id: Option<LitStr>,
    pub name: Option<LitStr>,
    pub headers: Vec<(LitStr, LitStr)>,
    pub shared: Shared,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path: LitStr = input.parse()?;
        let mut args = RouteArgs {
            path,
            methods: Vec::new(),
            status_code: None,
            summary: None,
            description: None,
            response_description: None,
            operation_id: None,
            name: None,
            headers: Vec::new(),
            shared: Shared::default(),
        };
        if input.is_empty() {
            return Ok(args);
        }
        input.parse::<Token![,]>()?;

        parse_options(input, |key, input| {
            match key.to_string().as_str() {
                "methods" => args.methods = parse_list(input)?,
                "status_code" => {
                    let status = status_code(&input.parse()?)?;
                    set_once(&mut args.status_code, key, status)?
                }
                "summary" => set_once(&mut args.summary, key, input.parse()?)?,
                "description" => set_once(&mut args.description, key, input.parse()?)?,
                "response_description" => {
                    set_once(&mut args.response_description, key, input.parse()?)?
                }
                "operation_id" => set_once(&mut args.operation_id, key, input.parse()?)?,
                "name" => set_once(&mut args.name, key, input.parse()?)?,
                "headers" => {
                    for (name, value) in parse_map::<LitStr, LitStr>(input)? {
                        check_header(&name, &value)?;
                        args.headers.push((name, value));
                    }
                }
                _ => return args.shared.parse_option(key, input),
            }
            Ok(true)
        })?;
        Ok(args)
    }
}

/// `HeaderName::from_static` and `HeaderValue::from_static` panic on bad
/// input, so reject it here
fn check_header(name: &LitStr, value: &LitStr) -> syn::Result<()> {
    let header = name.value();
    let valid_name = !header.is_empty()
        && header
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if !valid_name {
        return Err(syn::Error::new(
            name.span(),
            "header names must be lowercase ascii letters, digits, `-` or `_`",
        ));
    }
    if !value.value().bytes().all(|b| b == b'\t' || (32..127).contains(&b)) {
        return Err(syn::Error::new(value.span(), "header values must be visible ascii"));
    }
    Ok(())
}

/// `#[websocket("/ws", name = "feed")]`
pub(crate) struct WebSocketArgs {
    pub path: LitStr,
    pub name: Option<LitStr>,
}

impl Parse for WebSocketArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path: LitStr = input.parse()?;
        let mut name = None;
        if !input.is_empty() {
            input.parse::<Token![,]>()?;
            parse_options(input, |key, input| {
                if key == "name" {
                    set_once(&mut name, key, input.parse()?)?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            })?;
        }
        Ok(WebSocketArgs { path, name })
    }
}

/// `#[routes]` or `#[routes(state = AppState)]`
pub(crate) struct RoutesArgs {
    pub state: Option<Type>,
}

impl Parse for RoutesArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut state = None;
        parse_options(input, |key, input| {
            if key == "state" {
                set_once(&mut state, key, input.parse()?)?;
                Ok(true)
            } else {
                Ok(false)
            }
        })?;
        Ok(RoutesArgs { state })
    }
}
