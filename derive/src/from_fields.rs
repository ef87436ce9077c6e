use std::collections::{HashMap, HashSet};

use proc_macro::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{
    Data, DeriveInput, Error, Expr, ExprClosure, Field, Fields, GenericArgument, Ident, LitStr,
    Pat, PatType, PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

/// Primitives with a matching `add_*` method on `FromFields`.
const PRIMITIVES: [&str; 11] = [
    "char", "u8", "u16", "u32", "u64", "i8", "i16", "i32", "i64", "f32", "f64",
];

pub(crate) fn expand_from_fields(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromFields` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromFields` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut by_primitive: HashMap<String, Vec<FieldMetadata>> = HashMap::new();
    let mut seen = HashSet::new();

    for field in fields {
        let primitive = field.primitive().to_token_stream().to_string();

        if !PRIMITIVES.contains(&primitive.as_str()) {
            Err(Error::new_spanned(
                field.primitive(),
                "Field primitive must be one of `char`, `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`, `i64`, `f32` or `f64`.",
            ))?
        }

        if !seen.insert(field.label.value()) {
            Err(Error::new(field.label.span(), "Field names must be unique."))?
        }

        by_primitive.entry(primitive).or_default().push(field);
    }

    let field_methods = by_primitive.into_iter().map(|(primitive, fields)| {
        let cases = fields.into_iter().map(|field| {
            let FieldMetadata {
                member,
                label,
                receiver,
            } = field;

            let assignment = match receiver {
                Receiver::Option(_) => quote! {
                    self.#member = Some(value)
                },
                Receiver::Handler {
                    accumulator,
                    value,
                    body,
                    ty,
                } => quote! {
                    (|#accumulator: &mut #ty, #value| { #body })(&mut self.#member, value)
                },
            };

            quote! { #label => { #assignment } }
        });

        let primitive = format_ident!("{}", primitive);
        let method = format_ident!("add_{}", primitive);

        quote! {
            fn #method(&mut self, field: &str, value: #primitive) {
                match field {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromFields for #name {
            #(#field_methods)*
        }
    };

    Ok(expanded.into())
}

/// A struct member receiving one named field.
#[derive(Debug)]
struct FieldMetadata {
    member: Ident,
    label: LitStr,
    receiver: Receiver,
}

/// How a received value reaches its member.
#[derive(Debug)]
enum Receiver {
    /// Stored into an `Option` of the primitive.
    Option(Type),
    /// Passed to an accumulator closure with the member's type.
    Handler {
        accumulator: Pat,
        value: PatType,
        body: Expr,
        ty: Type,
    },
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let Some(member) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let FieldAttribute { label, handler } = attr.meta.require_list()?.parse_args()?;

        let receiver = match handler {
            Some(handler) => Receiver::handler(handler, &field.ty)?,
            None => Receiver::Option(option_inner(&field.ty)?.clone()),
        };

        Ok(Some(Self {
            member,
            label,
            receiver,
        }))
    }

    fn primitive(&self) -> &Type {
        match &self.receiver {
            Receiver::Option(primitive) => primitive,
            Receiver::Handler { value, .. } => &value.ty,
        }
    }
}

impl Receiver {
    fn handler(handler: ExprClosure, ty: &Type) -> Result<Self> {
        let mut inputs = handler.inputs.into_iter();

        let (Some(accumulator), Some(value), None) = (inputs.next(), inputs.next(), inputs.next())
        else {
            Err(Error::new_spanned(
                &handler.or1_token,
                "Handler closure must take exactly two parameters.",
            ))?
        };

        let Pat::Type(value) = value else {
            Err(Error::new_spanned(
                value,
                "Handler closure's second parameter must be annotated with the expected primitive type.",
            ))?
        };

        Ok(Self::Handler {
            accumulator,
            value,
            body: *handler.body,
            ty: ty.clone(),
        })
    }
}

/// The `T` of a member declared as `Option<T>`.
fn option_inner(ty: &Type) -> Result<&Type> {
    let inner = match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .filter(|segment| segment.ident == "Option")
            .and_then(|segment| match &segment.arguments {
                PathArguments::AngleBracketed(generics) if generics.args.len() == 1 => {
                    generics.args.first()
                }
                _ => None,
            })
            .and_then(|argument| match argument {
                GenericArgument::Type(inner) => Some(inner),
                _ => None,
            }),
        _ => None,
    };

    inner.ok_or_else(|| {
        Error::new_spanned(
            ty,
            "Field without a handler must have type `Option<T>`, where `T` is a primitive.",
        )
    })
}

#[derive(Debug)]
struct FieldAttribute {
    label: LitStr,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let label = input.parse::<LitStr>()?;

        if label.value().is_empty() {
            Err(Error::new(label.span(), "Field name must not be empty."))?
        }

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { label, handler })
    }
}
