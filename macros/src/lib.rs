use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta, Token, parse_macro_input};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(syn::LitStr),
    List(Vec<syn::LitStr>),
}

/// Check if the struct has #[allow(missing_docs)] attribute
fn check_allow_missing_docs(attrs: &[Attribute]) -> bool {
    attrs.iter().any(is_allow_missing_docs)
}

fn is_allow_missing_docs(attr: &Attribute) -> bool {
    attr.path().is_ident("allow")
        && attr
            .parse_args::<syn::Ident>()
            .map(|ident| ident == "missing_docs")
            .unwrap_or(false)
}

/// Define a struct whose fields are bound from command-line flags,
/// environment variables and defaults.
///
/// ```ignore
/// define_flags! {
///     pub struct ServerFlags {
///         #[flag(names = ["-p", "--port"], env = "PORT", doc = "Listening port", default = "8080")]
///         pub port: u16,
///
///         #[flag(names = ["-s", "--server"], separator = ",", doc = "Upstream servers")]
///         pub servers: Vec<String>,
///     }
/// }
/// ```
///
/// The field type decides the valuation: `bool` is a boolean flag, `T` and
/// `Option<T>` take one value, `Vec<T>` takes any number of values.
#[proc_macro]
pub fn define_flags(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_flags(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_flags(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let struct_attrs = &input.attrs;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "define_flags! does not support generic structs",
        ));
    }

    // Check for struct-level attributes
    let allow_missing_docs = check_allow_missing_docs(struct_attrs);

    // Extract fields from the struct
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_flags! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_flags! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut schema_fields = Vec::new();
    let mut take_fields = Vec::new();
    let mut idents = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_vis = &field.vis;
        let field_type = &field.ty;

        // Parse flag configuration from attributes
        let config = parse_flag_config(field, allow_missing_docs)?;

        // Keep doc comments and other attributes, drop our own
        let kept_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| !attr.path().is_ident("flag"))
            .collect();

        field_defs.push(quote! {
            #(#kept_attrs)*
            #field_vis #field_name: ::flag_loadr::FlagField<#field_type>
        });

        let field_str = field_name.to_string();
        let names = &config.names;
        let names_call = if names.is_empty() {
            quote! {}
        } else {
            quote! { .names([#(#names),*]) }
        };
        let env_call = config
            .env
            .as_ref()
            .map(|env| quote! { .env(#env) })
            .unwrap_or_default();
        let separator_call = config
            .separator
            .as_ref()
            .map(|sep| quote! { .separator(#sep) })
            .unwrap_or_default();
        let default_call = config
            .default
            .as_ref()
            .map(|default| quote! { .default_value(#default) })
            .unwrap_or_default();
        let description = &config.description;

        schema_fields.push(quote! {
            .field(
                ::flag_loadr::FieldSpec::of::<#field_type>(#field_str)
                    #names_call
                    #env_call
                    #separator_call
                    #default_call
                    .description(#description)
            )
        });

        take_fields.push(quote! {
            let #field_name = binder.take::<#field_type>(#field_str);
        });

        idents.push(field_name);
    }

    // Filter out our custom attributes (allow(missing_docs)) from struct definition
    let filtered_attrs: Vec<&Attribute> = struct_attrs
        .iter()
        .filter(|attr| !is_allow_missing_docs(attr))
        .collect();

    // Generate the struct definition
    let struct_def = quote! {
        #(#filtered_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    // Generate Bind trait implementation
    let bind_impl = quote! {
        impl ::flag_loadr::Bind for #struct_name {
            fn schema() -> ::flag_loadr::Schema {
                ::flag_loadr::Schema::new()
                    #(#schema_fields)*
            }

            #[allow(unreachable_patterns, unused_mut)]
            fn from_bindings(
                bindings: &::flag_loadr::Bindings,
            ) -> ::std::result::Result<Self, ::std::vec::Vec<::flag_loadr::FlagError>> {
                let mut binder = ::flag_loadr::Binder::new(bindings);

                #(#take_fields)*

                match (#(#idents,)*) {
                    (#(::std::option::Option::Some(#idents),)*) => {
                        ::std::result::Result::Ok(Self {
                            #(#idents),*
                        })
                    }
                    _ => ::std::result::Result::Err(binder.into_errors()),
                }
            }
        }
    };

    Ok(quote! {
        #struct_def
        #bind_impl
    })
}

#[derive(Debug)]
struct FlagConfig {
    names: Vec<syn::LitStr>,
    env: Option<syn::LitStr>,
    separator: Option<syn::LitStr>,
    default: Option<syn::LitStr>,
    description: String,
}

/// Parse #[flag(names = ["-x", "--long"], env = "X", doc = "Y", default = "v", separator = ",")] syntax
fn parse_flag_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if !meta.input.peek(Token![=]) {
            return Err(meta.error(format!("expected `{} = ...`", key)));
        }
        meta.input.parse::<Token![=]>()?;

        match key.as_str() {
            "names" => {
                let array: syn::ExprArray = meta.input.parse()?;
                let mut names = Vec::new();
                for elem in array.elems {
                    match elem {
                        Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(name),
                            ..
                        }) => names.push(name),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "flag names must be string literals",
                            ));
                        }
                    }
                }
                values.insert(key, MetaValue::List(names));
            }
            "env" | "doc" | "default" | "separator" => {
                let value: syn::LitStr = meta.input.parse()?;
                values.insert(key, MetaValue::Str(value));
            }
            _ => {
                return Err(meta.error(format!(
                    "unknown flag attribute `{}`, expected one of: names, env, doc, default, separator",
                    key
                )));
            }
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_flag_config(field: &syn::Field, allow_missing_docs: bool) -> syn::Result<FlagConfig> {
    // Find the #[flag(...)] attribute
    let flag_attr = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("flag"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have #[flag(...)] attribute with at least doc = \"...\"",
            )
        })?;

    // Parse it as a Meta::List
    let mut parsed = match &flag_attr.meta {
        Meta::List(list) => parse_flag_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                flag_attr,
                "flag attribute must be a list: #[flag(doc = \"...\", ...)]",
            ));
        }
    };

    let names = match parsed.remove("names") {
        Some(MetaValue::List(names)) => {
            if names.is_empty() {
                return Err(syn::Error::new_spanned(
                    flag_attr,
                    "names = [...] must list at least one flag name",
                ));
            }
            names
        }
        _ => Vec::new(),
    };

    let mut take_str = |key: &str| match parsed.remove(key) {
        Some(MetaValue::Str(s)) => Some(s),
        _ => None,
    };

    let env = take_str("env");
    let separator = take_str("separator");
    let default = take_str("default");

    // Extract doc (conditionally required)
    let description = match take_str("doc") {
        Some(s) => s.value().trim().to_string(),
        None if allow_missing_docs => String::new(),
        None => {
            return Err(syn::Error::new_spanned(
                flag_attr,
                "flag must have doc = \"description\" (or use #[allow(missing_docs)] on struct)",
            ));
        }
    };

    Ok(FlagConfig {
        names,
        env,
        separator,
        default,
        description,
    })
}
