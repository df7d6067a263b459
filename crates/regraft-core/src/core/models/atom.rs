use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom in a molecular structure.
///
/// Carries the coordinate payload the grafting and blending engines operate
/// on, plus the crystallographic bookkeeping fields (occupancy, B-factor)
/// needed to round-trip structure files. For predictor output the B-factor
/// column holds the per-residue pLDDT confidence, which the quality-check
/// workflow consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "O"), whitespace-trimmed.
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The element symbol (e.g., "C", "N", "FE"); may be empty when the
    /// source file omits it.
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Crystallographic occupancy.
    pub occupancy: f64,
    /// Temperature factor; pLDDT in predicted models.
    pub b_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with default values for the bookkeeping fields.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.trim().to_string(),
            residue_id,
            element: String::new(),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
        }
    }

    /// Sets the element symbol, trimming whitespace.
    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.trim().to_string();
        self
    }

    /// Whether this atom is a hydrogen (or deuterium).
    ///
    /// The element symbol is authoritative when present; otherwise the first
    /// alphabetic character of the atom name decides.
    pub fn is_hydrogen(&self) -> bool {
        if !self.element.is_empty() {
            return matches!(self.element.as_str(), "H" | "D");
        }
        matches!(
            self.name.chars().find(|c| c.is_ascii_alphabetic()),
            Some('H') | Some('D')
        )
    }
}
