//! Macro for implementing Display and FromStr for lowercase option enums
//!
//! Configuration switches such as `LogHttpErrors` or `SaltFormat` arrive as
//! strings from environment variables. This macro provides both conversions
//! with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use stakeadmin_domain::impl_lowercase_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Toggle {
//!     On,
//!     Off,
//! }
//!
//! impl_lowercase_enum_conversions!(Toggle {
//!     On => "on",
//!     Off => "off",
//! });
//!
//! assert_eq!("ON".parse::<Toggle>().unwrap(), Toggle::On);
//! ```

/// Implements Display and FromStr traits for option enums
///
/// - Display writes the lowercase string
/// - FromStr parses case-insensitively and trims surrounding whitespace
#[macro_export]
macro_rules! impl_lowercase_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
