//! nzaddr is a parser for free-text New Zealand addresses.
//!
//! An address is split left to right into four parts:
//!
//! - the **identifier**: unit type, unit identifier, street number (or
//!   range) and street alpha, e.g. `Flat 5, 58B`;
//! - the **street**: name, type and direction, with abbreviations expanded
//!   through caller-supplied tables;
//! - the **suburb** and **city**, comma separated;
//! - a trailing **postcode**.
//!
//! Parsing never fails: parts that cannot be extracted come back absent or
//! empty, and the raw input is kept on the result.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//! use nzaddr::AddressParser;
//!
//! let types: HashMap<String, String> = [("RD", "ROAD"), ("ROAD", "ROAD")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! let parser = AddressParser::builder()
//!     .street_type_abbreviations(types)
//!     .build()?;
//!
//! let parsed = parser.parse("Flat 5, 58B Fictional Rd, Fake Suburb, Faketown");
//! let identifier = parsed.identifier.as_ref().expect("identifier");
//! assert_eq!(identifier.unit_type, "FLAT");
//! assert_eq!(identifier.street_number, Some(58));
//! assert_eq!(identifier.street_alpha, "B");
//! let street = parsed.street.as_ref().expect("street");
//! assert_eq!(street.name, "FICTIONAL");
//! assert_eq!(street.street_type, "ROAD");
//! assert_eq!(parsed.suburb, "FAKE SUBURB");
//! assert_eq!(parsed.city, "FAKETOWN");
//! assert_eq!(parsed.to_string(), "Flat 5/58B Fictional Road, Fake Suburb, Faketown");
//! # Ok::<(), nzaddr::ConfigError>(())
//! ```
//!
//! For one-off parsing with the default configuration there is a shared
//! global parser:
//!
//! ```rust
//! let parsed = nzaddr::parse("18 Cuba Street, Te Aro, Wellington");
//! assert_eq!(parsed.identifier.expect("identifier").street_number, Some(18));
//! assert_eq!(parsed.suburb, "TE ARO");
//! ```

mod abbrev;
mod address;
mod error;
mod identifier;
mod matcher;
mod parser;
mod street;
mod suburb;

pub use address::{Identifier, ParsedAddress, Street};
pub use error::ConfigError;
pub use parser::{AddressParser, AddressParserBuilder};

/// Parses an address with the shared default-configuration parser.
///
/// Build your own [`AddressParser`] to supply street type and direction
/// abbreviation tables.
pub fn parse(address: &str) -> ParsedAddress {
    AddressParser::global().parse(address)
}
