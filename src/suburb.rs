//! Suburb, city and postcode extraction from the address remainder.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::AddressParser;

static CITY_POSTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z ]+)([0-9]*)").expect("valid city/postcode pattern"));

impl AddressParser {
    /// Splits what remains after the street into `(suburb, city, postcode)`.
    ///
    /// The first comma-separated segment is the suburb; the second splits
    /// into a city and optional trailing postcode digits. Further segments
    /// are ignored. Missing pieces come back as empty strings.
    pub fn suburb_and_city(&self, remainder: &str) -> (String, String, String) {
        let mut suburb = "";
        let mut city = "";
        let mut postcode = "";
        for (i, segment) in remainder.split(',').enumerate() {
            match i {
                0 => suburb = segment.trim_matches(' '),
                1 => {
                    if let Some(caps) = CITY_POSTCODE.captures(segment) {
                        city = caps.get(1).map(|m| m.as_str().trim_matches(' ')).unwrap_or("");
                        postcode = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                    }
                }
                _ => break,
            }
        }
        (
            self.expand_place_abbreviations(suburb),
            self.expand_place_abbreviations(city),
            postcode.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::AddressParser;

    fn parser() -> AddressParser {
        AddressParser::builder().build().unwrap()
    }

    #[test]
    fn test_suburb_and_city_table() {
        let parser = parser();
        // (input, suburb, city, postcode)
        let cases: &[(&str, &str, &str, &str)] = &[
            (" Te Aro, Wellington", "TE ARO", "WELLINGTON", ""),
            (" Birkdale, Auckland 0626", "BIRKDALE", "AUCKLAND", "0626"),
            (" Fake Suburb, Faketown", "FAKE SUBURB", "FAKETOWN", ""),
            ("Wellington", "WELLINGTON", "", ""),
            (" Mt Wellington, Auckland", "MOUNT WELLINGTON", "AUCKLAND", ""),
            (" St Heliers, Auckland 1071", "ST HELIERS", "AUCKLAND", "1071"),
            // Segments past the city are ignored.
            (" Te Aro, Wellington 6011, New Zealand", "TE ARO", "WELLINGTON", "6011"),
            ("", "", "", ""),
        ];
        for (input, suburb, city, postcode) in cases {
            let (s, c, p) = parser.suburb_and_city(input);
            assert_eq!(s, *suburb, "suburb of {:?}", input);
            assert_eq!(c, *city, "city of {:?}", input);
            assert_eq!(p, *postcode, "postcode of {:?}", input);
        }
    }

    #[test]
    fn test_city_without_postcode_keeps_trailing_letters() {
        let (_, city, postcode) = parser().suburb_and_city("Ngaio, Wellington");
        assert_eq!(city, "WELLINGTON");
        assert_eq!(postcode, "");
    }
}
