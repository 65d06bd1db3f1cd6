//! Cache keys for type lists.
//!
//! Lists are run-length encoded: consecutive ids collapse into
//! `start:count`, entries are joined with `,`. Ids are written in a 64 digit
//! alphabet that contains neither separator, so distinct lists never share a
//! key.

use std::fmt::Write;

use crate::type_id::TypeId;
use crate::types::TypeAlias;

const DIGITS: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz$?";

/// Append `value` in base 64, always emitting at least one digit.
pub fn push_id(out: &mut String, mut value: u32) {
    let mut buf = [0u8; 6];
    let mut len = 0;
    loop {
        buf[len] = DIGITS[(value & 63) as usize];
        len += 1;
        value >>= 6;
        if value == 0 {
            break;
        }
    }
    for &b in buf[..len].iter().rev() {
        out.push(b as char);
    }
}

/// Run-length encoded key of an ordered type list.
pub fn get_type_list_id(types: &[TypeId]) -> String {
    let mut result = String::new();
    let mut i = 0;
    while i < types.len() {
        let start = types[i].0;
        let mut count: u32 = 1;
        while i + (count as usize) < types.len() && types[i + count as usize].0 == start + count {
            count += 1;
        }
        if !result.is_empty() {
            result.push(',');
        }
        push_id(&mut result, start);
        if count > 1 {
            result.push(':');
            push_id(&mut result, count);
        }
        i += count as usize;
    }
    result
}

/// `@symbol` or `@symbol:args` suffix for alias-keyed types.
pub fn get_alias_id(alias: Option<&TypeAlias>) -> String {
    let Some(alias) = alias else {
        return String::new();
    };
    let mut result = String::from("@");
    push_id(&mut result, alias.symbol.0);
    if !alias.type_arguments.is_empty() {
        result.push(':');
        result.push_str(&get_type_list_id(&alias.type_arguments));
    }
    result
}

/// Shape of the origin attached to a union, for keying.
#[derive(Clone, Copy, Debug)]
pub enum UnionOriginKey<'a> {
    Union(&'a [TypeId]),
    Intersection(&'a [TypeId]),
    /// `keyof T` origin.
    Index(TypeId),
}

/// Cache key of a union with the given sorted constituents.
pub fn get_union_id(
    types: &[TypeId],
    origin: Option<UnionOriginKey<'_>>,
    alias: Option<&TypeAlias>,
) -> String {
    let mut key = match origin {
        None => get_type_list_id(types),
        Some(UnionOriginKey::Union(origin_types)) => format!("|{}", get_type_list_id(origin_types)),
        Some(UnionOriginKey::Intersection(origin_types)) => {
            format!("&{}", get_type_list_id(origin_types))
        }
        Some(UnionOriginKey::Index(target)) => {
            let mut key = String::from("#");
            push_id(&mut key, target.0);
            let _ = write!(key, "|{}", get_type_list_id(types));
            key
        }
    };
    key.push_str(&get_alias_id(alias));
    key
}
