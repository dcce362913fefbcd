//! Place-name abbreviation expansion, shared by the street, suburb and city
//! stages.

use crate::parser::AddressParser;

/// Localities conventionally written with `ST` rather than `SAINT`. A first
/// word of `SAINT` (or an abbreviation expanding to it) is folded back to
/// `ST` when the second word starts one of these.
const SAINT_EXCEPTIONS: [&str; 4] = ["ALBANS", "ANDREWS", "HELIERS", "ARNAUD"];

impl AddressParser {
    /// Uppercases a place name and expands each word through the
    /// street-name/suburb/city abbreviation table. Single-word inputs are
    /// only uppercased, so a bare `ST` or `MT` is left alone.
    pub fn expand_place_abbreviations(&self, input: &str) -> String {
        let words: Vec<&str> = input.split(' ').collect();
        if words.len() < 2 {
            return input.to_uppercase();
        }

        let mut expanded: Vec<String> = Vec::with_capacity(words.len());
        let mut starts_with_saint = false;
        for (i, word) in words.iter().enumerate() {
            let upper = word.to_uppercase();
            if let Some(long_form) = self.street_name_suburb_city_abbreviations.get(&upper) {
                if long_form == "SAINT" && i == 0 {
                    starts_with_saint = true;
                }
                expanded.push(long_form.clone());
                continue;
            }
            if upper == "SAINT" && i == 0 {
                starts_with_saint = true;
            } else if starts_with_saint
                && i == 1
                && SAINT_EXCEPTIONS.iter().any(|e| e.starts_with(upper.as_str()))
            {
                expanded[0] = "ST".to_string();
            }
            expanded.push(upper);
        }
        expanded.join(" ")
    }
}
