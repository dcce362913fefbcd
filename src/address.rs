//! Parsed address data structures and display formatting.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// The unit/street-number portion of an address preceding the street name,
/// e.g. `Flat 5, 58B` in `Flat 5, 58B Fictional Rd`.
///
/// `start` and `len` describe the byte span of the input claimed by the
/// identifier; the span may be the union of several non-overlapping rule
/// matches. Empty strings and `None` both mean "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Identifier {
    /// Normalized unit type (`FLAT`, `LOT`, `UNIT`, `VILLA`, or any other
    /// uppercased token as given).
    pub unit_type: String,
    /// Unit identifier, e.g. `5` in `Flat 5` or `23A` in `23A/18`.
    pub unit_identifier: String,
    /// Street number, e.g. `58` in `58B`.
    pub street_number: Option<u32>,
    /// Upper bound of a street number range, e.g. `25` in `23-25`.
    pub street_number_high: Option<u32>,
    /// Street number suffix, e.g. `B` in `58B`.
    pub street_alpha: String,
    /// Byte offset of the first claimed character.
    pub start: usize,
    /// Claimed length in bytes.
    pub len: usize,
}

/// A street name/type/direction parsed from a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Street {
    /// Street name after abbreviation expansion, e.g. `MOUNT EDEN`.
    pub name: String,
    /// Street name before abbreviation expansion, e.g. `MT EDEN`.
    pub unabbreviated_name: String,
    /// Resolved full street type, e.g. `ROAD`. Empty when the street has no
    /// recognized type.
    pub street_type: String,
    /// Resolved full street direction, e.g. `EAST`.
    pub direction: String,
    /// Byte offset of the first claimed character (always 0).
    pub start: usize,
    /// Claimed length in bytes, including leading separators and the
    /// terminating comma when present.
    pub len: usize,
}

/// A complete parsed address.
///
/// `identifier` and `street` are each either populated or explicitly absent;
/// `suburb`, `city` and `postcode` are possibly-empty strings (empty means
/// "not present").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedAddress {
    /// Unit/street-number identifier, if one was found.
    pub identifier: Option<Identifier>,
    /// Street name/type/direction, if one was found.
    pub street: Option<Street>,
    /// Suburb, uppercased and abbreviation-expanded.
    pub suburb: String,
    /// City, uppercased and abbreviation-expanded.
    pub city: String,
    /// Postcode digits, verbatim.
    pub postcode: String,
    /// The original input string, retained for traceability.
    pub raw: String,
}

impl ParsedAddress {
    /// Whether a unit/street-number identifier was parsed.
    pub fn has_identifier(&self) -> bool {
        self.identifier.is_some()
    }

    /// Whether a street was parsed.
    pub fn has_street(&self) -> bool {
        self.street.is_some()
    }

    /// The "identifying" part of the address, for matching against search
    /// records: identifier plus street when both parsed, otherwise the raw
    /// input.
    pub fn title(&self) -> String {
        match (&self.identifier, &self.street) {
            (Some(identifier), Some(street)) => format!("{} {}", identifier, street),
            _ => self.raw.clone(),
        }
    }

    /// Display string with the postcode appended, when one was parsed.
    pub fn display_with_postcode(&self) -> String {
        if self.postcode.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, self.postcode)
        }
    }
}

/// Title-cases a string: the first letter of every word is uppercased, the
/// rest lowercased. A word boundary is any non-alphabetic character, so
/// `ST ARNAUD` becomes `St Arnaud` and `O'BRIEN` becomes `O'Brien`.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![self.name.as_str()];
        if !self.street_type.is_empty() {
            parts.push(&self.street_type);
        }
        if !self.direction.is_empty() {
            parts.push(&self.direction);
        }
        f.write_str(title_case(parts.join(" ").trim()).as_str())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(number) = self.street_number {
            if !self.unit_identifier.is_empty() {
                if !self.unit_type.is_empty() {
                    write!(f, "{} ", title_case(&self.unit_type))?;
                }
                write!(f, "{}/", self.unit_identifier.to_uppercase())?;
            }
            write!(f, "{}{}", number, self.street_alpha.to_uppercase())?;
            if let Some(high) = self.street_number_high {
                write!(f, "-{}", high)?;
            }
        } else if !self.unit_identifier.is_empty() {
            if !self.unit_type.is_empty() {
                write!(f, "{} ", title_case(&self.unit_type))?;
            }
            f.write_str(self.unit_identifier.to_uppercase().as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        let mut identifier_street = self
            .identifier
            .as_ref()
            .map(Identifier::to_string)
            .unwrap_or_default();
        let street = self
            .street
            .as_ref()
            .map(Street::to_string)
            .unwrap_or_default();
        if !identifier_street.is_empty() && !street.is_empty() {
            identifier_street.push(' ');
        }
        identifier_street.push_str(&street);
        if !identifier_street.is_empty() {
            parts.push(identifier_street);
        }

        let suburb = title_case(&self.suburb);
        let city = title_case(&self.city);
        if !suburb.is_empty() && suburb != city {
            parts.push(suburb);
        }
        if !city.is_empty() {
            parts.push(city);
        }

        f.write_str(parts.join(", ").as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("KENYA STREET"), "Kenya Street");
        assert_eq!(title_case("st arnaud"), "St Arnaud");
        assert_eq!(title_case("O'BRIEN"), "O'Brien");
        assert_eq!(title_case("STATE HIGHWAY 2"), "State Highway 2");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_street_display() {
        let street = Street {
            name: "KENYA".to_string(),
            street_type: "STREET".to_string(),
            ..Default::default()
        };
        assert_eq!(street.to_string(), "Kenya Street");

        let street = Street {
            name: "KENYA".to_string(),
            street_type: "STREET".to_string(),
            direction: "WEST".to_string(),
            ..Default::default()
        };
        assert_eq!(street.to_string(), "Kenya Street West");
    }

    #[test]
    fn test_identifier_display() {
        let identifier = Identifier {
            unit_type: "FLAT".to_string(),
            unit_identifier: "5".to_string(),
            street_number: Some(58),
            street_alpha: "B".to_string(),
            ..Default::default()
        };
        assert_eq!(identifier.to_string(), "Flat 5/58B");

        let identifier = Identifier {
            street_number: Some(23),
            street_number_high: Some(25),
            unit_identifier: "C4".to_string(),
            ..Default::default()
        };
        assert_eq!(identifier.to_string(), "C4/23-25");

        // No street number: falls back to the unit part alone.
        let identifier = Identifier {
            unit_type: "LOT".to_string(),
            unit_identifier: "1".to_string(),
            ..Default::default()
        };
        assert_eq!(identifier.to_string(), "Lot 1");

        assert_eq!(Identifier::default().to_string(), "");
    }

    #[test]
    fn test_parsed_address_display() {
        let parsed = ParsedAddress {
            identifier: Some(Identifier {
                unit_type: "FLAT".to_string(),
                unit_identifier: "5".to_string(),
                street_number: Some(58),
                street_alpha: "B".to_string(),
                ..Default::default()
            }),
            street: Some(Street {
                name: "FICTIONAL".to_string(),
                street_type: "ROAD".to_string(),
                ..Default::default()
            }),
            suburb: "FAKE SUBURB".to_string(),
            city: "FAKETOWN".to_string(),
            postcode: "1023".to_string(),
            raw: String::new(),
        };
        assert_eq!(
            parsed.to_string(),
            "Flat 5/58B Fictional Road, Fake Suburb, Faketown"
        );
        assert_eq!(
            parsed.display_with_postcode(),
            "Flat 5/58B Fictional Road, Fake Suburb, Faketown 1023"
        );
        assert_eq!(parsed.title(), "Flat 5/58B Fictional Road");
    }

    #[test]
    fn test_suburb_matching_city_is_suppressed() {
        let parsed = ParsedAddress {
            suburb: "WELLINGTON".to_string(),
            city: "WELLINGTON".to_string(),
            ..Default::default()
        };
        assert_eq!(parsed.to_string(), "Wellington");
    }

    #[test]
    fn test_title_falls_back_to_raw() {
        let parsed = ParsedAddress {
            raw: "Te Aro, Wellington".to_string(),
            ..Default::default()
        };
        assert_eq!(parsed.title(), "Te Aro, Wellington");
    }
}
