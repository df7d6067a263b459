//! Textual residue selection grammar.
//!
//! Two token shapes are understood, comma-separated:
//!
//! - `CHAIN:START-END` parses to a [`ResidueRange`] in template numbering.
//! - `CHAIN:T1-T2=P1-P2` parses to a [`ResidueMapping`] pairing a template
//!   window with a window into the flattened predicted residue sequence.
//!
//! Empty tokens (trailing commas, blank strings) are skipped silently;
//! malformed tokens fail the whole parse with no partial result.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("Malformed token '{0}': expected CHAIN:START-END")]
    MalformedRange(String),

    #[error("Malformed token '{0}': expected CHAIN:T1-T2=P1-P2")]
    MalformedMapping(String),

    #[error("Invalid integer '{value}' in token '{token}'")]
    InvalidInteger { token: String, value: String },

    #[error("Chain id in token '{0}' must be a single non-blank character")]
    InvalidChainId(String),

    #[error("Descending span {start}-{end} in token '{token}'")]
    DescendingSpan {
        token: String,
        start: isize,
        end: isize,
    },
}

/// A contiguous residue window on one chain, 1-based inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueRange {
    pub chain_id: char,
    pub start: isize,
    pub end: isize,
}

impl ResidueRange {
    pub fn new(chain_id: char, start: isize, end: isize) -> Self {
        Self {
            chain_id,
            start,
            end,
        }
    }

    /// Number of residues covered by the range.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false // start <= end is a construction invariant
    }

    pub fn contains(&self, chain_id: char, residue_number: isize) -> bool {
        self.chain_id == chain_id && self.start <= residue_number && residue_number <= self.end
    }
}

impl fmt::Display for ResidueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chain_id, self.start, self.end)
    }
}

impl FromStr for ResidueRange {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (chain, span) = token
            .split_once(':')
            .ok_or_else(|| SelectionError::MalformedRange(token.to_string()))?;
        let chain_id = parse_chain_id(chain, token)?;
        let (start, end) = parse_span(span, token, SpanShape::Range)?;
        Ok(Self {
            chain_id,
            start,
            end,
        })
    }
}

/// Pairs a template residue window with a window into the flattened predicted
/// residue sequence.
///
/// Equal window lengths are a data-model invariant, but it is enforced at
/// graft time (`LengthMismatch`), not at parse time, so that the violation is
/// reported against the structure it would have corrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueMapping {
    pub chain_id: char,
    pub template_start: isize,
    pub template_end: isize,
    pub pred_start: isize,
    pub pred_end: isize,
}

impl ResidueMapping {
    pub fn new(
        chain_id: char,
        template_start: isize,
        template_end: isize,
        pred_start: isize,
        pred_end: isize,
    ) -> Self {
        Self {
            chain_id,
            template_start,
            template_end,
            pred_start,
            pred_end,
        }
    }

    pub fn template_len(&self) -> usize {
        (self.template_end - self.template_start + 1) as usize
    }

    pub fn pred_len(&self) -> usize {
        (self.pred_end - self.pred_start + 1) as usize
    }
}

impl fmt::Display for ResidueMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}={}-{}",
            self.chain_id, self.template_start, self.template_end, self.pred_start, self.pred_end
        )
    }
}

impl FromStr for ResidueMapping {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (left, right) = token
            .split_once('=')
            .ok_or_else(|| SelectionError::MalformedMapping(token.to_string()))?;
        let (chain, tspan) = left
            .split_once(':')
            .ok_or_else(|| SelectionError::MalformedMapping(token.to_string()))?;
        let chain_id = parse_chain_id(chain, token)?;
        let (template_start, template_end) = parse_span(tspan, token, SpanShape::Mapping)?;
        let (pred_start, pred_end) = parse_span(right, token, SpanShape::Mapping)?;
        Ok(Self {
            chain_id,
            template_start,
            template_end,
            pred_start,
            pred_end,
        })
    }
}

#[derive(Clone, Copy)]
enum SpanShape {
    Range,
    Mapping,
}

fn malformed(token: &str, shape: SpanShape) -> SelectionError {
    match shape {
        SpanShape::Range => SelectionError::MalformedRange(token.to_string()),
        SpanShape::Mapping => SelectionError::MalformedMapping(token.to_string()),
    }
}

fn parse_chain_id(chain: &str, token: &str) -> Result<char, SelectionError> {
    let chain = chain.trim();
    let mut chars = chain.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => Err(SelectionError::InvalidChainId(token.to_string())),
    }
}

fn parse_span(span: &str, token: &str, shape: SpanShape) -> Result<(isize, isize), SelectionError> {
    let (a, b) = span
        .split_once('-')
        .ok_or_else(|| malformed(token, shape))?;
    let start = parse_bound(a, token)?;
    let end = parse_bound(b, token)?;
    if start > end {
        return Err(SelectionError::DescendingSpan {
            token: token.to_string(),
            start,
            end,
        });
    }
    Ok((start, end))
}

fn parse_bound(text: &str, token: &str) -> Result<isize, SelectionError> {
    let text = text.trim();
    text.parse().map_err(|_| SelectionError::InvalidInteger {
        token: token.to_string(),
        value: text.to_string(),
    })
}

/// Parses a comma-separated residue range list, skipping empty tokens.
pub fn parse_ranges(text: &str) -> Result<Vec<ResidueRange>, SelectionError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ResidueRange::from_str)
        .collect()
}

/// Parses a comma-separated residue mapping list, skipping empty tokens.
pub fn parse_mappings(text: &str) -> Result<Vec<ResidueMapping>, SelectionError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ResidueMapping::from_str)
        .collect()
}

/// Formats a range list back to its canonical comma-separated form.
pub fn format_ranges(ranges: &[ResidueRange]) -> String {
    ranges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_range() {
        let ranges = parse_ranges("A:100-120").unwrap();
        assert_eq!(ranges, vec![ResidueRange::new('A', 100, 120)]);
    }

    #[test]
    fn parses_multiple_ranges_preserving_order() {
        let ranges = parse_ranges("B:10-20,A:45-60").unwrap();
        assert_eq!(
            ranges,
            vec![ResidueRange::new('B', 10, 20), ResidueRange::new('A', 45, 60)]
        );
    }

    #[test]
    fn skips_empty_tokens_and_whitespace() {
        let ranges = parse_ranges(" A:1-5 , , B:7-9 ,").unwrap();
        assert_eq!(
            ranges,
            vec![ResidueRange::new('A', 1, 5), ResidueRange::new('B', 7, 9)]
        );
        assert!(parse_ranges("").unwrap().is_empty());
        assert!(parse_ranges(" , ,").unwrap().is_empty());
    }

    #[test]
    fn parse_format_round_trips_canonically() {
        let text = " A:1-5 ,B:7-9,  C:100-120 ";
        let ranges = parse_ranges(text).unwrap();
        assert_eq!(format_ranges(&ranges), "A:1-5,B:7-9,C:100-120");
        assert_eq!(parse_ranges(&format_ranges(&ranges)).unwrap(), ranges);
    }

    #[test]
    fn missing_colon_is_rejected_with_offending_token() {
        let err = parse_ranges("A:1-5,B7-9").unwrap_err();
        assert_eq!(err, SelectionError::MalformedRange("B7-9".to_string()));
    }

    #[test]
    fn non_integer_bound_is_rejected() {
        let err = parse_ranges("A:1-x").unwrap_err();
        assert_eq!(
            err,
            SelectionError::InvalidInteger {
                token: "A:1-x".to_string(),
                value: "x".to_string(),
            }
        );
    }

    #[test]
    fn multi_character_chain_id_is_rejected() {
        let err = parse_ranges("AB:1-5").unwrap_err();
        assert_eq!(err, SelectionError::InvalidChainId("AB:1-5".to_string()));
    }

    #[test]
    fn descending_span_is_rejected() {
        let err = parse_ranges("A:20-10").unwrap_err();
        assert!(matches!(err, SelectionError::DescendingSpan { .. }));
    }

    #[test]
    fn malformed_token_yields_no_partial_result() {
        assert!(parse_ranges("A:1-5,broken").is_err());
    }

    #[test]
    fn parses_mapping_token() {
        let mappings = parse_mappings("A:100-120=1-21").unwrap();
        assert_eq!(mappings, vec![ResidueMapping::new('A', 100, 120, 1, 21)]);
        assert_eq!(mappings[0].template_len(), 21);
        assert_eq!(mappings[0].pred_len(), 21);
    }

    #[test]
    fn mapping_with_unequal_windows_parses_but_reports_lengths() {
        // The equal-length invariant is enforced at graft time, not here.
        let mapping: ResidueMapping = "A:100-130=1-30".parse().unwrap();
        assert_eq!(mapping.template_len(), 31);
        assert_eq!(mapping.pred_len(), 30);
    }

    #[test]
    fn mapping_without_equals_is_rejected() {
        let err = parse_mappings("A:100-120").unwrap_err();
        assert_eq!(
            err,
            SelectionError::MalformedMapping("A:100-120".to_string())
        );
    }

    #[test]
    fn mapping_display_round_trips() {
        let mapping = ResidueMapping::new('B', 50, 60, 3, 13);
        assert_eq!(mapping.to_string(), "B:50-60=3-13");
        assert_eq!(mapping.to_string().parse::<ResidueMapping>().unwrap(), mapping);
    }

    #[test]
    fn range_contains_respects_chain_and_bounds() {
        let range = ResidueRange::new('A', 10, 12);
        assert!(range.contains('A', 10));
        assert!(range.contains('A', 12));
        assert!(!range.contains('A', 13));
        assert!(!range.contains('B', 11));
    }
}
