use phf::{Map, Set, phf_map, phf_set};

static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Common nonstandard polymer residues
    "MSE" => 'M', "SEC" => 'U', "PYL" => 'O',
    // Protonation-state aliases
    "HSE" => 'H', "HSD" => 'H', "HSP" => 'H', "HIE" => 'H', "HID" => 'H',
    "HIP" => 'H', "CYX" => 'C',
};

static WATER_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "TIP3",
};

/// Whether a residue name denotes a polymer amino acid.
pub fn is_amino_acid(name: &str) -> bool {
    THREE_TO_ONE.contains_key(name.trim())
}

/// Whether a residue name denotes a water molecule.
pub fn is_water(name: &str) -> bool {
    WATER_NAMES.contains(name.trim())
}

/// One-letter code for a polymer residue name, if known.
pub fn one_letter_code(name: &str) -> Option<char> {
    THREE_TO_ONE.get(name.trim()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_amino_acids_are_recognized() {
        for name in ["ALA", "GLY", "TRP", "HIS"] {
            assert!(is_amino_acid(name), "{name} should be an amino acid");
        }
        assert!(!is_amino_acid("HOH"));
        assert!(!is_amino_acid("ATP"));
    }

    #[test]
    fn nonstandard_polymer_residues_map_to_parent_codes() {
        assert_eq!(one_letter_code("MSE"), Some('M'));
        assert_eq!(one_letter_code("HSE"), Some('H'));
        assert_eq!(one_letter_code("CYX"), Some('C'));
    }

    #[test]
    fn lookups_trim_whitespace() {
        assert!(is_amino_acid(" ALA "));
        assert!(is_water(" HOH"));
        assert_eq!(one_letter_code("GLY "), Some('G'));
    }

    #[test]
    fn unknown_names_yield_none() {
        assert_eq!(one_letter_code("XYZ"), None);
        assert!(!is_water("ALA"));
    }
}
