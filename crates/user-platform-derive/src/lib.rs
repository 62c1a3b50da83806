//! Derive macros for user-platform
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod record;

/// Derive `Record` for a struct with named fields.
///
/// The generated shape lists every field in declaration order. Each field is
/// read from the column whose label equals the field name, and its type must
/// implement `user_platform::Scalar`.
///
/// # Example
///
/// ```ignore
/// use user_platform::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[record(rename_all = "camelCase")]
/// struct User {
///     id: Option<i64>,
///     name: String,
///     phone_number: String, // column "phoneNumber"
/// }
/// ```
///
/// # Attributes
///
/// - `#[record(rename_all = "...")]` - Derive column labels from field names
///   with one of `camelCase`, `PascalCase`, `snake_case`, `lowercase`
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
