//! Unit/street-number identifier extraction.
//!
//! Every rule in [`matcher::rules`] runs against the (uppercased) input and
//! may contribute a fragment. Fragments are folded left to right into the
//! first match: a later fragment is retained when it does not overlap the
//! first fragment's span and agrees with the accumulator on every field it
//! sets. The final identifier's span is the union of the retained spans.

use log::debug;

use crate::address::Identifier;
use crate::matcher;
use crate::parser::AddressParser;

/// A single rule match: the identifier fields it extracted plus the byte
/// span of the input it claims.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub unit_type: String,
    pub unit_identifier: String,
    pub street_number: Option<u32>,
    pub street_number_high: Option<u32>,
    pub street_alpha: String,
    pub start: usize,
    pub len: usize,
}

/// Identifier fields that can conflict during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdentifierField {
    UnitType,
    UnitIdentifier,
    StreetNumber,
    StreetNumberHigh,
    StreetAlpha,
}

/// Why a fragment was rejected from the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConflictKind {
    /// The fragment's span overlaps the seed fragment's span (or is empty).
    SpanOverlap,
    /// Both fragments set the named field, to different values.
    FieldMismatch(IdentifierField),
}

impl Fragment {
    fn end(&self) -> usize {
        self.start + self.len
    }

    fn overlaps(&self, other: &Fragment) -> bool {
        if self.start == other.start {
            return true;
        }
        if self.start < other.start {
            self.end() > other.start
        } else {
            other.end() > self.start
        }
    }

    /// Folds `other` into `self`. Fields `other` sets must be unset or equal
    /// in `self`; the span is not extended (span accounting is done over the
    /// retained fragments by the caller).
    fn merge(&mut self, other: &Fragment) -> Result<(), ConflictKind> {
        if other.len == 0 || self.overlaps(other) {
            return Err(ConflictKind::SpanOverlap);
        }
        merge_text(&mut self.unit_type, &other.unit_type, IdentifierField::UnitType)?;
        merge_text(
            &mut self.unit_identifier,
            &other.unit_identifier,
            IdentifierField::UnitIdentifier,
        )?;
        merge_number(
            &mut self.street_number,
            other.street_number,
            IdentifierField::StreetNumber,
        )?;
        merge_number(
            &mut self.street_number_high,
            other.street_number_high,
            IdentifierField::StreetNumberHigh,
        )?;
        merge_text(
            &mut self.street_alpha,
            &other.street_alpha,
            IdentifierField::StreetAlpha,
        )?;
        Ok(())
    }
}

fn merge_text(
    target: &mut String,
    source: &str,
    field: IdentifierField,
) -> Result<(), ConflictKind> {
    if source.is_empty() {
        return Ok(());
    }
    if !target.is_empty() && target != source {
        return Err(ConflictKind::FieldMismatch(field));
    }
    if target.is_empty() {
        target.push_str(source);
    }
    Ok(())
}

fn merge_number(
    target: &mut Option<u32>,
    source: Option<u32>,
    field: IdentifierField,
) -> Result<(), ConflictKind> {
    match (*target, source) {
        (_, None) => Ok(()),
        (None, Some(n)) => {
            *target = Some(n);
            Ok(())
        }
        (Some(t), Some(n)) if t == n => Ok(()),
        _ => Err(ConflictKind::FieldMismatch(field)),
    }
}

/// Folds a non-empty fragment list into (merged fields, retained fragments).
fn merge_fragments(fragments: &[Fragment]) -> (Fragment, Vec<&Fragment>) {
    let mut merged = fragments[0].clone();
    let mut retained = vec![&fragments[0]];
    for fragment in &fragments[1..] {
        match merged.merge(fragment) {
            Ok(()) => retained.push(fragment),
            Err(conflict) => debug!("dropping fragment {:?}: {:?}", fragment, conflict),
        }
    }
    (merged, retained)
}

/// Normalizes a unit type keyword to its canonical form. Unrecognized
/// keywords pass through uppercased.
pub(crate) fn normalize_unit_type(unit_type: &str) -> String {
    let upper = unit_type.to_ascii_uppercase();
    match upper.as_str() {
        "F" | "FLAT" | "FLATS" => "FLAT".to_string(),
        "L" | "LOT" | "LOTS" => "LOT".to_string(),
        "U" | "UNIT" | "UNITS" => "UNIT".to_string(),
        "VILLA" | "VILLAS" => "VILLA".to_string(),
        _ => upper,
    }
}

impl AddressParser {
    /// Extracts the unit/street-number identifier from the front of an
    /// address, if one is present.
    ///
    /// Returns `None` when nothing matches, when the address is only a
    /// state-highway reference, or when no street number was found and the
    /// parser requires one.
    pub fn identifier(&self, address: &str) -> Option<Identifier> {
        if address.is_empty() {
            return None;
        }
        // ASCII uppercasing keeps byte offsets aligned with the input.
        let upper = address.to_ascii_uppercase();

        for rule in matcher::invalid_rules() {
            if rule.is_invalid(&upper) {
                debug!("'{}' ruled out an identifier in {:?}", rule.name, address);
                return None;
            }
        }

        let mut fragments = Vec::new();
        for rule in matcher::rules() {
            if let Some(fragment) = rule.parse(&upper) {
                debug!("rule '{}' matched {:?}", rule.name, fragment);
                fragments.push(fragment);
            }
        }
        if fragments.is_empty() {
            return None;
        }

        let (merged, retained) = merge_fragments(&fragments);
        if self.require_street_number && merged.street_number.is_none() {
            debug!("no street number in {:?}, discarding identifier", address);
            return None;
        }

        let min_start = retained.iter().map(|f| f.start).min().unwrap_or(0);
        let max_end = retained.iter().map(|f| f.end()).max().unwrap_or(0);
        let mut identifier = Identifier {
            unit_type: merged.unit_type,
            unit_identifier: merged.unit_identifier,
            street_number: merged.street_number,
            street_number_high: merged.street_number_high,
            street_alpha: merged.street_alpha,
            start: min_start,
            len: max_end - min_start,
        };

        // No rule captured a unit identifier, but the rules left an
        // unclaimed prefix: treat that prefix as the unit identifier and
        // widen the span to cover it.
        if identifier.unit_identifier.is_empty() && min_start > 0 {
            let prefix = &upper[..min_start];
            if !prefix.trim_matches(' ').is_empty() {
                identifier.unit_identifier = prefix.trim_matches([',', ' ']).to_string();
                identifier.len += identifier.start;
                identifier.start = 0;
            }
        }

        Some(identifier)
    }
}
