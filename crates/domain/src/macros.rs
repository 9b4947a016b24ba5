//! Macro for implementing Display and FromStr for state enums
//!
//! Trip phases and permission states travel through logs, config and the
//! worker channel as lowercase strings. This macro gives each enum a single
//! mapping used in both directions.
//!
//! # Example
//!
//! ```rust
//! use spotsurfer_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum SyncKind {
//!     OneOff,
//!     Periodic,
//! }
//!
//! impl_domain_status_conversions!(SyncKind {
//!     OneOff => "one-off",
//!     Periodic => "periodic",
//! });
//!
//! assert_eq!(SyncKind::Periodic.to_string(), "periodic");
//! ```

/// Implements Display and FromStr traits for state enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and names the enum in its error
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => ::std::write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}
