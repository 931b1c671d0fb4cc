//! Return-type hints of computed fields and model properties.
//!
//! Hints are written in Rust type syntax and parsed with `syn`, e.g. `i64`,
//! `Option<String>` or `Vec<Uuid>`. Record and model names may be dotted
//! (`shop.ItemSerializer`); dots are read as path separators.

use crate::basic_types::BasicType;
use crate::error::Result;
use log::debug;

/// Parsed return-type hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    Basic(BasicType),
    /// Name of a record or model
    Named(String),
    /// `Option<X>`
    Optional(Box<TypeHint>),
    /// `Vec<X>`, `HashSet<X>`, `[X]`
    List(Box<TypeHint>),
    /// Valid type syntax without an OpenAPI counterpart
    Unsupported(String),
}

/// Parse a hint; syntax errors are returned, unmappable types are not
pub fn parse_hint(hint: &str) -> Result<TypeHint> {
    let normalized = hint.trim().replace('.', "::");
    let ty: syn::Type = syn::parse_str(&normalized)?;
    let resolved = resolve_type(&ty, hint);
    debug!("Resolved type hint {} to {:?}", hint, resolved);
    Ok(resolved)
}

fn resolve_type(ty: &syn::Type, hint: &str) -> TypeHint {
    match ty {
        syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeHint::Basic(BasicType::None),
        syn::Type::Reference(reference) => resolve_type(&reference.elem, hint),
        syn::Type::Paren(paren) => resolve_type(&paren.elem, hint),
        syn::Type::Group(group) => resolve_type(&group.elem, hint),
        syn::Type::Slice(slice) => TypeHint::List(Box::new(resolve_type(&slice.elem, hint))),
        syn::Type::Array(array) => TypeHint::List(Box::new(resolve_type(&array.elem, hint))),
        syn::Type::Path(type_path) if type_path.qself.is_none() => {
            resolve_path(&type_path.path, hint)
        }
        _ => TypeHint::Unsupported(hint.to_string()),
    }
}

fn resolve_path(path: &syn::Path, hint: &str) -> TypeHint {
    let Some(segment) = path.segments.last() else {
        return TypeHint::Unsupported(hint.to_string());
    };
    let ident = segment.ident.to_string();

    let type_args: Vec<&syn::Type> = match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    match (ident.as_str(), type_args.as_slice()) {
        ("Option", [inner]) => TypeHint::Optional(Box::new(resolve_type(inner, hint))),
        ("Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "IndexSet", [inner]) => {
            TypeHint::List(Box::new(resolve_type(inner, hint)))
        }
        ("Box" | "Rc" | "Arc" | "Cow", [inner]) => resolve_type(inner, hint),
        (name, args) => {
            if let Some(basic) = parse_primitive_type(name) {
                TypeHint::Basic(basic)
            } else if args.is_empty() && segment.arguments.is_empty() {
                let name: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
                TypeHint::Named(name.join("."))
            } else {
                TypeHint::Unsupported(hint.to_string())
            }
        }
    }
}

/// Map a primitive or well-known library type name
fn parse_primitive_type(type_name: &str) -> Option<BasicType> {
    let basic = match type_name {
        "String" | "str" | "char" => BasicType::Str,
        "i8" | "i16" | "i32" | "u8" | "u16" => BasicType::Int32,
        "i64" | "i128" | "u32" | "u64" | "u128" | "isize" | "usize" => BasicType::Int64,
        "f32" => BasicType::Float,
        "f64" => BasicType::Double,
        "bool" => BasicType::Bool,
        "Uuid" => BasicType::Uuid,
        "NaiveDate" => BasicType::Date,
        "DateTime" | "NaiveDateTime" => BasicType::DateTime,
        "NaiveTime" => BasicType::Time,
        "Decimal" => BasicType::Decimal,
        "Url" => BasicType::Uri,
        "Ipv4Addr" => BasicType::Ip4,
        "Ipv6Addr" => BasicType::Ip6,
        "Value" | "HashMap" | "BTreeMap" | "IndexMap" | "Map" => BasicType::Object,
        _ => return None,
    };
    Some(basic)
}
