//! Identifiers
//!
//! Typed wrappers around the integer identifiers handed in by the external
//! data layer, so scope dimensions cannot be compared across kinds.

use std::fmt;

use serde::Deserialize;

macro_rules! id_type {
    ($(#[$doc:meta] $name:ident),+ $(,)?) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }
        )+
    };
}

id_type! {
    /// Identifier of a purchasable product variant.
    VariantId,
    /// Identifier of a stored price record.
    RecordId,
    /// Identifier of a market.
    MarketId,
    /// Identifier of a site.
    SiteId,
    /// Identifier of a sales channel.
    ChannelId,
    /// Identifier of a catalog (price list).
    CatalogId,
}

/// Two-letter ISO 3166-1 alpha-2 country code, always uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a country code, normalising to uppercase.
    ///
    /// Returns `None` unless the input is exactly two ASCII letters.
    pub fn parse(code: &str) -> Option<Self> {
        let bytes = code.as_bytes();

        match bytes {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Some(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => None,
        }
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_their_inner_value() {
        assert_eq!(VariantId(42).to_string(), "42");
        assert_eq!(RecordId::from(7).to_string(), "7");
    }

    #[test]
    fn ids_of_the_same_kind_compare() {
        assert_eq!(MarketId(1), MarketId(1));
        assert_ne!(MarketId(1), MarketId(2));
    }

    #[test]
    fn country_code_uppercases() {
        let code = CountryCode::parse("de");

        assert_eq!(code.map(|c| c.to_string()), Some("DE".to_string()));
    }

    #[test]
    fn country_code_rejects_bad_input() {
        assert!(CountryCode::parse("DEU").is_none());
        assert!(CountryCode::parse("D").is_none());
        assert!(CountryCode::parse("D3").is_none());
        assert!(CountryCode::parse("").is_none());
    }
}
