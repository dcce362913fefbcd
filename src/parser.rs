//! The address parser and its builder.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;

use crate::address::ParsedAddress;
use crate::error::ConfigError;
use crate::matcher;

static GLOBAL_PARSER: Lazy<AddressParser> = Lazy::new(|| {
    AddressParser::builder()
        .build()
        .expect("default parser configuration is valid")
});

/// Splits free-text New Zealand addresses into their parts.
///
/// Immutable once built and safe to share across threads; build one and
/// reuse it (or use [`AddressParser::global`]).
///
/// # Example
///
/// ```rust
/// use nzaddr::AddressParser;
///
/// let parser = AddressParser::builder().build()?;
/// let parsed = parser.parse("Flat 5, 58B Cuba Street, Te Aro, Wellington");
/// assert_eq!(parsed.suburb, "TE ARO");
/// # Ok::<(), nzaddr::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AddressParser {
    pub(crate) require_street_number: bool,
    pub(crate) street_type_abbreviations: HashMap<String, String>,
    pub(crate) street_direction_abbreviations: HashMap<String, String>,
    pub(crate) street_name_suburb_city_abbreviations: HashMap<String, String>,
}

impl AddressParser {
    /// Returns a builder initialized with the default configuration.
    pub fn builder() -> AddressParserBuilder {
        AddressParserBuilder::new()
    }

    /// A shared parser with the default configuration, built on first use.
    pub fn global() -> &'static AddressParser {
        &GLOBAL_PARSER
    }

    /// Parses an address into identifier, street, suburb, city and
    /// postcode. Never fails; parts that cannot be extracted are absent and
    /// the original input is kept in `raw`.
    pub fn parse(&self, address: &str) -> ParsedAddress {
        let mut parsed = ParsedAddress {
            raw: address.to_string(),
            ..Default::default()
        };
        let mut remaining = address;

        if let Some(identifier) = self.identifier(remaining) {
            // An identifier claiming the whole input is far more likely a
            // bare street-number search term than a real identifier.
            if identifier.len >= remaining.trim_matches(' ').len() {
                debug!(
                    "identifier {} claims all of {:?}, discarding",
                    identifier, address
                );
            } else {
                remaining = &remaining[identifier.start + identifier.len..];
                parsed.identifier = Some(identifier);
            }
        }

        if let Some(street) = self.street(remaining) {
            remaining = &remaining[street.start + street.len..];
            parsed.street = Some(street);
        }

        let (suburb, city, postcode) = self.suburb_and_city(remaining);
        parsed.suburb = suburb;
        parsed.city = city;
        parsed.postcode = postcode;
        parsed
    }

    /// Parses a batch of addresses.
    pub fn parse_batch<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<ParsedAddress> {
        addresses.iter().map(|a| self.parse(a.as_ref())).collect()
    }
}

/// Builder for [`AddressParser`].
///
/// Defaults: a street number is required for an identifier, the street type
/// and direction tables are empty, and the place-name table holds the
/// conventional `PT`/`MT`/`ST` expansions.
#[derive(Debug, Clone)]
pub struct AddressParserBuilder {
    require_street_number: bool,
    street_type_abbreviations: HashMap<String, String>,
    street_direction_abbreviations: HashMap<String, String>,
    street_name_suburb_city_abbreviations: HashMap<String, String>,
}

impl AddressParserBuilder {
    fn new() -> Self {
        let street_name_suburb_city_abbreviations = [
            ("PT", "POINT"),
            ("MT", "MOUNT"),
            ("ST", "SAINT"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            require_street_number: true,
            street_type_abbreviations: HashMap::new(),
            street_direction_abbreviations: HashMap::new(),
            street_name_suburb_city_abbreviations,
        }
    }

    /// Whether an identifier without a street number is discarded.
    /// Defaults to `true`.
    pub fn require_street_number(mut self, require: bool) -> Self {
        self.require_street_number = require;
        self
    }

    /// Street type abbreviation table, uppercase short form to uppercase
    /// full form (e.g. `RD` to `ROAD`). Full forms should map to themselves
    /// to be recognized at all.
    pub fn street_type_abbreviations(mut self, table: HashMap<String, String>) -> Self {
        self.street_type_abbreviations = table;
        self
    }

    /// Street direction table (e.g. `E` to `EAST`).
    pub fn street_direction_abbreviations(mut self, table: HashMap<String, String>) -> Self {
        self.street_direction_abbreviations = table;
        self
    }

    /// Place-name abbreviation table used for street names, suburbs and
    /// cities. Replaces the default `PT`/`MT`/`ST` table.
    pub fn street_name_suburb_city_abbreviations(
        mut self,
        table: HashMap<String, String>,
    ) -> Self {
        self.street_name_suburb_city_abbreviations = table;
        self
    }

    /// Validates the configuration and builds the parser.
    pub fn build(self) -> Result<AddressParser, ConfigError> {
        for rule in matcher::rules() {
            rule.validate()?;
        }
        validate_table("street type abbreviations", &self.street_type_abbreviations)?;
        validate_table(
            "street direction abbreviations",
            &self.street_direction_abbreviations,
        )?;
        validate_table(
            "street name/suburb/city abbreviations",
            &self.street_name_suburb_city_abbreviations,
        )?;
        Ok(AddressParser {
            require_street_number: self.require_street_number,
            street_type_abbreviations: self.street_type_abbreviations,
            street_direction_abbreviations: self.street_direction_abbreviations,
            street_name_suburb_city_abbreviations: self.street_name_suburb_city_abbreviations,
        })
    }
}

impl Default for AddressParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_table(
    table: &'static str,
    entries: &HashMap<String, String>,
) -> Result<(), ConfigError> {
    for (key, expansion) in entries {
        if key.trim().is_empty() || expansion.trim().is_empty() {
            return Err(ConfigError::EmptyAbbreviation { table });
        }
    }
    Ok(())
}
