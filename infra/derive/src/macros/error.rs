use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, Ident, Type, Variant};

/// What the generator needs to know about one enum variant.
struct VariantShape<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    /// Number of fields other than `source` and `context`.
    payload_fields: usize,
    cfg_attrs: Vec<Attribute>,
}

impl VariantShape<'_> {
    fn is_internal(&self) -> bool {
        self.ident == "Internal"
    }

    /// A `From<Source>` impl is only possible when nothing but the context has to be filled in.
    fn convertible_source(&self) -> Option<(&Ident, &Type)> {
        if self.is_internal() || self.payload_fields > 0 {
            return None;
        }
        let field = self.source?;
        Some((field.ident.as_ref()?, &field.ty))
    }
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("keystash_error can only be applied to enums"); };
    };

    let mut shapes = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        match inspect_variant(variant) {
            Ok(shape) => shapes.push(shape),
            Err(err) => return err.to_compile_error(),
        }
    }

    let name = &input.ident;
    let ext = format_ident!("{}Ext", name);

    let derives = missing_derives(&input);
    let context_trait = context_trait(name, &ext, &shapes);
    let conversions = shapes.iter().map(|shape| source_conversion(name, &ext, shape));
    let fallbacks = internal_fallbacks(name, &shapes);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#conversions)*
        #fallbacks

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            match context {
                Some(c) => std::borrow::Cow::Owned(format!(" ({c})")),
                None => std::borrow::Cow::Borrowed(""),
            }
        }
    }
}

fn inspect_variant(variant: &Variant) -> Result<VariantShape<'_>, syn::Error> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "keystash_error requires named fields (`{ message, context }`)",
        ));
    };

    let context = context_field(fields)?;
    let source = fields.named.iter().find(|field| is_source(field));

    if source.is_some() && context.is_none() {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "keystash_error requires `context: Option<Cow<'static, str>>` next to a source",
        ));
    }

    let payload_fields = fields
        .named
        .iter()
        .filter(|field| !is_source(field) && field.ident.as_ref().is_none_or(|i| i != "context"))
        .count();

    Ok(VariantShape {
        ident: &variant.ident,
        source,
        has_context: context.is_some(),
        payload_fields,
        cfg_attrs: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).cloned().collect(),
    })
}

fn context_field(fields: &FieldsNamed) -> Result<Option<&Field>, syn::Error> {
    let Some(field) = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };

    if is_optional_static_cow(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let present = derived_traits(input);
    let mut wanted = Vec::new();
    if !present.contains("Debug") {
        wanted.push(quote! { Debug });
    }
    if !present.contains("Error") {
        wanted.push(quote! { ::thiserror::Error });
    }

    if wanted.is_empty() { quote! {} } else { quote! { #[derive(#(#wanted),*)] } }
}

fn context_trait(name: &Ident, ext: &Ident, shapes: &[VariantShape<'_>]) -> TokenStream {
    let arms = shapes.iter().filter(|s| s.has_context).map(|s| {
        let ident = s.ident;
        let cfg_attrs = &s.cfg_attrs;
        quote! { #(#cfg_attrs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    #[allow(unreachable_patterns)]
                    match &mut err {
                        #( #arms )*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_conversion(name: &Ident, ext: &Ident, shape: &VariantShape<'_>) -> TokenStream {
    let Some((field, ty)) = shape.convertible_source() else {
        return quote! {};
    };
    let variant = shape.ident;
    let cfg_attrs = &shape.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self {
                Self::#variant { #field, context: None }
            }
        }

        #(#cfg_attrs)*
        #[automatically_derived]
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#variant { #field, context: Some(context.into()) })
            }
        }
    }
}

fn internal_fallbacks(name: &Ident, shapes: &[VariantShape<'_>]) -> TokenStream {
    let Some(internal) = shapes.iter().find(|s| s.is_internal()) else {
        return quote! {};
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

fn derived_traits(input: &DeriveInput) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                traits.insert(last.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

/// Matches `Option<Cow<'static, str>>` by its last path segments.
fn is_optional_static_cow(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(cow) = inner else {
        return false;
    };
    let Some(segment) = cow.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let static_lifetime =
        matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_target = matches!(
        args.next(),
        Some(syn::GenericArgument::Type(Type::Path(p)))
            if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );

    static_lifetime && str_target
}

fn single_generic<'a>(ty: &'a Type, outer: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != outer {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
