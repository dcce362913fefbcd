//! Street tokenizer.
//!
//! Splits the street segment of an address into name, type and direction
//! words, resolving abbreviations through the parser's tables. Only the
//! segment before the first comma is considered; the returned length says
//! how many bytes of the input (separators included) the street consumed, so
//! the caller can slice off the suburb/city remainder.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::address::Street;
use crate::matcher;
use crate::parser::AddressParser;

static STATE_HIGHWAY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}", matcher::STATE_HIGHWAY)).expect("valid state highway pattern")
});

/// What role a word plays in a street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartKind {
    Name,
    Type,
    Direction,
}

#[derive(Debug)]
struct StreetPart {
    text: String,
    /// Byte length of the original token, before case folding.
    raw_len: usize,
    kind: PartKind,
}

/// The tagged words of a street, in input order.
#[derive(Debug, Default)]
struct StreetParts {
    parts: Vec<StreetPart>,
}

impl StreetParts {
    fn push(&mut self, text: String, raw_len: usize, kind: PartKind) {
        self.parts.push(StreetPart {
            text,
            raw_len,
            kind,
        });
    }

    fn has(&self, kind: PartKind) -> bool {
        self.parts.iter().any(|p| p.kind == kind)
    }

    /// Joins the words of one kind with single spaces.
    fn join(&self, kind: PartKind) -> String {
        let words: Vec<&str> = self
            .parts
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.text.as_str())
            .collect();
        words.join(" ")
    }

    /// Demotes every part of one kind to another; used when a later word
    /// takes over the type or direction role.
    fn retag(&mut self, from: PartKind, to: PartKind) {
        for part in &mut self.parts {
            if part.kind == from {
                part.kind = to;
            }
        }
    }

    /// Drops every part after the last direction (or, without one, the last
    /// type). Returns the number of input bytes those parts accounted for,
    /// separators included.
    fn trim_trailing_names(&mut self) -> usize {
        let marker = if self.has(PartKind::Direction) {
            PartKind::Direction
        } else if self.has(PartKind::Type) {
            PartKind::Type
        } else {
            return 0;
        };
        let Some(last) = self.parts.iter().rposition(|p| p.kind == marker) else {
            return 0;
        };
        self.parts
            .drain(last + 1..)
            .map(|p| p.raw_len + 1)
            .sum()
    }
}

impl AddressParser {
    /// Parses the street from the front of an address remainder.
    ///
    /// Returns `None` only for an empty input; any non-empty input yields at
    /// least a street name.
    pub fn street(&self, street: &str) -> Option<Street> {
        if street.is_empty() {
            return None;
        }

        let mut parts = StreetParts::default();
        // Consumed bytes; starts at -1 because every token below counts its
        // own length plus one separator, one more than the tokens have.
        let mut consumed: i64 = -1;

        let mut rest = street.trim_start_matches([' ', ',']);
        consumed += (street.len() - rest.len()) as i64;
        if let Some(comma) = rest.find(',') {
            // The terminating comma is consumed along with the street.
            consumed += 1;
            rest = &rest[..comma];
        }

        // A state-highway prefix becomes a synthetic name part so the
        // direction tokens that follow it are recognized without a type.
        let folded = rest.to_ascii_uppercase();
        let mut state_highway = false;
        if let Some(caps) = STATE_HIGHWAY_PREFIX.captures(&folded) {
            let matched = caps.get(0).map(|m| m.len()).unwrap_or(0);
            parts.push(format!("STATE HIGHWAY {}", &caps["shnum"]), 0, PartKind::Name);
            consumed += matched as i64;
            rest = &rest[matched..];
            state_highway = true;
        }

        for token in rest.split(' ') {
            if token.is_empty() {
                // A collapsed separator still consumes a byte.
                consumed += 1;
                continue;
            }
            let upper = token.to_uppercase();
            let token_len = token.len() as i64 + 1;
            if parts.has(PartKind::Name) {
                if self.street_type_abbreviations.contains_key(&upper) {
                    if parts.has(PartKind::Type) {
                        // A later type word wins; the earlier type and any
                        // direction that depended on it rejoin the name.
                        parts.retag(PartKind::Type, PartKind::Name);
                        parts.retag(PartKind::Direction, PartKind::Name);
                    }
                    consumed += token_len;
                    parts.push(upper, token.len(), PartKind::Type);
                    continue;
                }
                if (parts.has(PartKind::Type) || state_highway)
                    && self.street_direction_abbreviations.contains_key(&upper)
                {
                    if parts.has(PartKind::Direction) {
                        parts.retag(PartKind::Direction, PartKind::Name);
                    }
                    consumed += token_len;
                    parts.push(upper, token.len(), PartKind::Direction);
                    continue;
                }
            }
            consumed += token_len;
            parts.push(upper, token.len(), PartKind::Name);
        }

        // Words after the resolved type/direction are not part of the
        // street; leave them for the suburb/city stage.
        consumed -= parts.trim_trailing_names() as i64;

        let mut parsed = Street {
            name: parts.join(PartKind::Name),
            street_type: parts.join(PartKind::Type),
            direction: parts.join(PartKind::Direction),
            start: 0,
            len: consumed.max(0) as usize,
            unabbreviated_name: String::new(),
        };
        parsed.unabbreviated_name = parsed.name.clone();
        parsed.name = self.expand_place_abbreviations(&parsed.name);

        if !parsed.street_type.is_empty() {
            if let Some(full_type) = self.street_type_abbreviations.get(&parsed.street_type) {
                parsed.street_type = full_type.clone();
            }
            // "The Esplanade" style names: the word after THE looks like a
            // street type but belongs to the name.
            if parsed.name == "THE" {
                parsed.name = format!("THE {}", parsed.street_type);
                parsed.unabbreviated_name =
                    format!("{} {}", parsed.unabbreviated_name, parsed.street_type);
                parsed.street_type = String::new();
            }
        }
        if !parsed.direction.is_empty() {
            if let Some(full_direction) =
                self.street_direction_abbreviations.get(&parsed.direction)
            {
                parsed.direction = full_direction.clone();
            }
        }

        debug!(
            "street {:?}: name {:?}, type {:?}, direction {:?}, len {}",
            street, parsed.name, parsed.street_type, parsed.direction, parsed.len
        );
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn abbreviations(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn parser() -> AddressParser {
        AddressParser::builder()
            .street_type_abbreviations(abbreviations(&[
                ("AVE", "AVENUE"),
                ("AVENUE", "AVENUE"),
                ("RD", "ROAD"),
                ("ROAD", "ROAD"),
                ("ST", "STREET"),
                ("STREET", "STREET"),
                ("HWY", "HIGHWAY"),
                ("HIGHWAY", "HIGHWAY"),
                ("RIVER", "RIVER"),
                ("PROMENADE", "PROMENADE"),
            ]))
            .street_direction_abbreviations(abbreviations(&[
                ("NORTH", "NORTH"),
                ("SOUTH", "SOUTH"),
                ("EAST", "EAST"),
                ("E", "EAST"),
                ("WEST", "WEST"),
            ]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(parser().street("").is_none());
    }

    #[test]
    fn test_street_table() {
        let parser = parser();
        // (input, name, type, direction, len)
        let cases: &[(&str, &str, &str, &str, usize)] = &[
            ("Kenya Street", "KENYA", "STREET", "", 12),
            ("Kenya St", "KENYA", "STREET", "", 8),
            ("Kenya St, Miramar", "KENYA", "STREET", "", 9),
            ("Alexander", "ALEXANDER", "", "", 9),
            ("Owen Valley East Road", "OWEN VALLEY EAST", "ROAD", "", 21),
            (
                "Motueka River West Bank Road",
                "MOTUEKA RIVER WEST BANK",
                "ROAD",
                "",
                28,
            ),
            ("State Highway 2 East", "STATE HIGHWAY 2", "", "EAST", 20),
            ("State Highway 2A", "STATE HIGHWAY 2A", "", "", 16),
            ("State Highway 2A East", "STATE HIGHWAY 2A", "", "EAST", 21),
            ("SH 2", "STATE HIGHWAY 2", "", "", 4),
            ("SH2 E", "STATE HIGHWAY 2", "", "EAST", 5),
            ("Pohangina Valley East Road", "POHANGINA VALLEY EAST", "ROAD", "", 26),
        ];
        for (input, name, street_type, direction, len) in cases {
            let street = parser
                .street(input)
                .unwrap_or_else(|| panic!("{:?}: expected a street", input));
            assert_eq!(street.name, *name, "name of {:?}", input);
            assert_eq!(street.street_type, *street_type, "type of {:?}", input);
            assert_eq!(street.direction, *direction, "direction of {:?}", input);
            assert_eq!(street.len, *len, "len of {:?}", input);
        }
    }

    #[test]
    fn test_later_type_and_direction_win() {
        let street = parser().street("Big Road South Small Road North").unwrap();
        assert_eq!(street.name, "BIG ROAD SOUTH SMALL");
        assert_eq!(street.street_type, "ROAD");
        assert_eq!(street.direction, "NORTH");
    }

    #[test]
    fn test_abbreviated_type() {
        let street = parser().street("Alexander Ave").unwrap();
        assert_eq!(street.name, "ALEXANDER");
        assert_eq!(street.street_type, "AVENUE");

        let street = parser().street("Kenya Street South").unwrap();
        assert_eq!(street.name, "KENYA");
        assert_eq!(street.street_type, "STREET");
        assert_eq!(street.direction, "SOUTH");
    }

    #[test]
    fn test_later_type_wins() {
        // RIVER is in the type table, but ROAD comes later and takes over.
        let street = parser().street("Motueka River West Bank Road").unwrap();
        assert_eq!(street.name, "MOTUEKA RIVER WEST BANK");
        assert_eq!(street.street_type, "ROAD");
        assert_eq!(street.direction, "");
    }

    #[test]
    fn test_direction_requires_type_or_state_highway() {
        // EAST before any type stays part of the name.
        let street = parser().street("Owen Valley East Road").unwrap();
        assert_eq!(street.name, "OWEN VALLEY EAST");
        assert_eq!(street.street_type, "ROAD");

        // After a type, it is a direction.
        let street = parser().street("Fictional Road East").unwrap();
        assert_eq!(street.name, "FICTIONAL");
        assert_eq!(street.street_type, "ROAD");
        assert_eq!(street.direction, "EAST");

        // A state highway needs no type.
        let street = parser().street("SH2 E").unwrap();
        assert_eq!(street.name, "STATE HIGHWAY 2");
        assert_eq!(street.direction, "EAST");
    }

    #[test]
    fn test_trailing_words_left_for_next_stage() {
        // "Miramar" comes after the resolved type without a comma; it is
        // not consumed.
        let street = parser().street("Kenya St Miramar").unwrap();
        assert_eq!(street.name, "KENYA");
        assert_eq!(street.street_type, "STREET");
        assert_eq!(street.len, 8);
    }

    #[test]
    fn test_superfluous_spaces() {
        let street = parser().street("  Kenya   Street  ").unwrap();
        assert_eq!(street.name, "KENYA");
        assert_eq!(street.street_type, "STREET");
        assert_eq!(street.len, 18);
    }

    #[test]
    fn test_the_exception() {
        let street = parser().street("The Promenade, Takapuna").unwrap();
        assert_eq!(street.name, "THE PROMENADE");
        assert_eq!(street.unabbreviated_name, "THE PROMENADE");
        assert_eq!(street.street_type, "");
    }

    #[test]
    fn test_unabbreviated_name() {
        let street = parser().street("Mt Eden Road").unwrap();
        assert_eq!(street.name, "MOUNT EDEN");
        assert_eq!(street.unabbreviated_name, "MT EDEN");
        assert_eq!(street.street_type, "ROAD");
    }

    #[test]
    fn test_leading_separators_consumed() {
        let street = parser().street(" Cuba Street, Te Aro").unwrap();
        assert_eq!(street.name, "CUBA");
        assert_eq!(street.street_type, "STREET");
        // Leading space, both words, and the terminating comma.
        assert_eq!(street.len, 13);
    }
}
