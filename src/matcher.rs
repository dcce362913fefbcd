//! Identifier pattern rules.
//!
//! Each rule pairs a compiled pattern with an explicit map from identifier
//! fields to named capture groups. Every rule that matches contributes a
//! [`Fragment`]; precedence between rules is expressed purely by their order
//! in [`rules`], resolved later by the merge step in `identifier`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ConfigError;
use crate::identifier::{normalize_unit_type, Fragment};

/// Tail of an address after an identifier: a run of non-digit text,
/// optionally ending in digits, or end of input.
const REST_OF_ADDRESS: &str = r"(?:[^0-9/]+[0-9]*|$)";

/// A unit type keyword followed by a unit identifier and trailing separators,
/// e.g. `FLAT 5, ` or `U456/`.
const UNIT_WITH_TYPE: &str =
    r"(?:(?P<utype>U(?:NIT)?|F(?:LAT)?|L(?:OTS?)?|VILLAS?)\s*(?P<uident>[^/,.]+))[,/\s]*";

/// A state-highway reference: `STATE HIGHWAY 2`, `SH2`, `S H 2`, including an
/// optional alpha suffix on the number. Shared with the street tokenizer.
pub(crate) const STATE_HIGHWAY: &str = r"(?:STATE\s*[A-Z]+\s*|S\s?H\s*)(?P<shnum>[0-9]+[A-Z]?)\s*";

/// A street number; the claimed span covers the digits only.
const STREET_NUMBER: &str = r"(?P<span>(?P<num>[0-9]+))[A-Z]{0,2}\s*";

/// A street number range, e.g. `23-25`.
const STREET_NUMBER_RANGE: &str = r"(?P<span>(?P<num>[0-9]+)-(?P<high>[0-9]+)\s*)";

/// A street alpha and its terminating separator, e.g. `B ` in `58B `.
const STREET_ALPHA: &str = r"(?P<span>(?P<alpha>[A-Z]{1,2})(?:\s|$))";

/// Maps identifier fields to named capture groups of a rule's pattern.
///
/// `claim` names the group whose match length is the length of the span the
/// rule takes responsibility for; `claim_start` optionally names a prefix
/// group whose end is where that span begins (the span begins at 0 when
/// absent). This lets a rule own separators and other superfluous characters
/// that are not part of any field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CaptureMap {
    pub unit_type: Option<&'static str>,
    pub unit_identifier: Option<&'static str>,
    pub street_number: Option<&'static str>,
    pub street_number_high: Option<&'static str>,
    pub street_alpha: Option<&'static str>,
    pub claim_start: Option<&'static str>,
    pub claim: &'static str,
}

/// A capture map with no fields mapped, claiming the `span` group.
const NO_FIELDS: CaptureMap = CaptureMap {
    unit_type: None,
    unit_identifier: None,
    street_number: None,
    street_number_high: None,
    street_alpha: None,
    claim_start: None,
    claim: "span",
};

/// One identifier pattern rule.
pub(crate) struct IdentifierRule {
    pub name: &'static str,
    pattern: Regex,
    captures: CaptureMap,
}

impl IdentifierRule {
    fn new(name: &'static str, pattern: &str, captures: CaptureMap) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid identifier rule pattern"),
            captures,
        }
    }

    /// Checks that every capture group the field map references exists in
    /// the compiled pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let known: Vec<&str> = self.pattern.capture_names().flatten().collect();
        let referenced = [
            Some(self.captures.claim),
            self.captures.claim_start,
            self.captures.unit_type,
            self.captures.unit_identifier,
            self.captures.street_number,
            self.captures.street_number_high,
            self.captures.street_alpha,
        ];
        for group in referenced.into_iter().flatten() {
            if !known.contains(&group) {
                return Err(ConfigError::UnknownCaptureGroup {
                    rule: self.name,
                    group,
                });
            }
        }
        Ok(())
    }

    /// Runs the rule against an uppercased input, returning the fragment it
    /// claims, if any.
    pub fn parse(&self, input: &str) -> Option<Fragment> {
        let caps = self.pattern.captures(input)?;
        let claim = caps.name(self.captures.claim)?;
        let start = self
            .captures
            .claim_start
            .and_then(|group| caps.name(group))
            .map(|m| m.end())
            .unwrap_or(0);
        Some(Fragment {
            unit_type: group_text(&caps, self.captures.unit_type)
                .map(normalize_unit_type)
                .unwrap_or_default(),
            unit_identifier: group_text(&caps, self.captures.unit_identifier)
                .map(str::to_string)
                .unwrap_or_default(),
            street_number: group_number(&caps, self.captures.street_number),
            street_number_high: group_number(&caps, self.captures.street_number_high),
            street_alpha: group_text(&caps, self.captures.street_alpha)
                .map(str::to_string)
                .unwrap_or_default(),
            start,
            len: claim.len(),
        })
    }
}

fn group_text<'t>(caps: &Captures<'t>, group: Option<&'static str>) -> Option<&'t str> {
    group.and_then(|g| caps.name(g)).map(|m| m.as_str())
}

/// Parses a numeric field. Unparseable digits degrade to absent rather than
/// erroring, and zero is treated as absent.
fn group_number(caps: &Captures<'_>, group: Option<&'static str>) -> Option<u32> {
    group
        .and_then(|g| caps.name(g))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n != 0)
}

/// A rule that invalidates the entire input as containing an identifier.
pub(crate) struct InvalidRule {
    pub name: &'static str,
    pattern: Regex,
}

impl InvalidRule {
    pub fn is_invalid(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }
}

/// Rules that, when matched, force the identifier result to absent: an
/// address that is only a highway reference is not an identifier.
pub(crate) fn invalid_rules() -> &'static [InvalidRule] {
    static INVALID_RULES: Lazy<Vec<InvalidRule>> = Lazy::new(|| {
        vec![InvalidRule {
            name: "state highway without street number",
            pattern: Regex::new(&format!(r"^\s*{STATE_HIGHWAY}{REST_OF_ADDRESS}"))
                .expect("valid invalidation pattern"),
        }]
    });
    &INVALID_RULES
}

/// The ordered identifier rule set. Every rule is run; conflicts are
/// resolved by the merge step, which favours earlier rules.
pub(crate) fn rules() -> &'static [IdentifierRule] {
    static RULES: Lazy<Vec<IdentifierRule>> = Lazy::new(|| {
        vec![
            IdentifierRule::new(
                "unit identifier containing street alpha",
                r"^(?P<span>(?P<alpha>[A-Z]{1,2})\s(?P<uident>[A-Z0-9]+)/)",
                CaptureMap {
                    unit_identifier: Some("uident"),
                    street_alpha: Some("alpha"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "unit identifier with type",
                &format!("^(?P<span>{UNIT_WITH_TYPE})"),
                CaptureMap {
                    unit_type: Some("utype"),
                    unit_identifier: Some("uident"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "unit identifier separated by forward slash",
                r"^(?P<span>(?P<uident>[^/]+)/)",
                CaptureMap {
                    unit_identifier: Some("uident"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "unit identifier with type and street number range",
                &format!("^(?P<pre>{UNIT_WITH_TYPE}.*?){STREET_NUMBER_RANGE}"),
                CaptureMap {
                    street_number: Some("num"),
                    street_number_high: Some("high"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "unit identifier with type and street alpha",
                &format!("^(?P<pre>{UNIT_WITH_TYPE}.*?)[0-9]+{STREET_ALPHA}"),
                CaptureMap {
                    street_alpha: Some("alpha"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "unit identifier with type and street number",
                &format!("^(?P<pre>{UNIT_WITH_TYPE}.*?){STREET_NUMBER}"),
                CaptureMap {
                    street_number: Some("num"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "state highway street alpha",
                &format!("^(?P<pre>.*?[0-9]+){STREET_ALPHA}{STATE_HIGHWAY}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_alpha: Some("alpha"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "state highway street number range",
                &format!("^(?P<pre>.*?){STREET_NUMBER_RANGE}{STATE_HIGHWAY}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_number: Some("num"),
                    street_number_high: Some("high"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "state highway street number",
                &format!(r"^(?P<pre>.*?)(?P<span>(?P<num>[0-9]+)\s*){STATE_HIGHWAY}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_number: Some("num"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "street alpha",
                &format!("^(?P<pre>.*?[0-9]+){STREET_ALPHA}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_alpha: Some("alpha"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "street number range",
                &format!("^(?P<pre>.*?){STREET_NUMBER_RANGE}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_number: Some("num"),
                    street_number_high: Some("high"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "unit identifier with street number",
                &format!("^(?P<pre>[^/]+/.*?){STREET_NUMBER}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_number: Some("num"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "compact unit identifier with street number",
                r"^(?P<span>(?P<uident>[A-Z0-9]+)[^A-Z0-9](?P<num>[0-9]+)(?P<alpha>[A-Z]{0,2}))",
                CaptureMap {
                    unit_identifier: Some("uident"),
                    street_number: Some("num"),
                    street_alpha: Some("alpha"),
                    ..NO_FIELDS
                },
            ),
            IdentifierRule::new(
                "street number",
                &format!("^(?P<pre>.*?){STREET_NUMBER}{REST_OF_ADDRESS}"),
                CaptureMap {
                    street_number: Some("num"),
                    claim_start: Some("pre"),
                    ..NO_FIELDS
                },
            ),
        ]
    });
    &RULES
}
