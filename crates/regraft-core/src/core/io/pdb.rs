use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::chain::ChainType;
use crate::core::models::residue::ResidueKind;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required atom name in columns 13-16 is empty")]
    MissingAtomName,
    #[error("Line is too short for an ATOM/HETATM record (needs coordinate columns up to 54)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize, columns: &str) -> Result<f64, PdbError> {
    let text = slice_and_trim(line, start, end);
    text.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: text.into(),
        },
    })
}

/// Fixed-column PDB reader/writer.
///
/// Reading keeps only the first model of a multi-model file, collapses
/// alternate locations to the primary conformer (blank or `A`), and
/// classifies residues as polymer, ligand, or water by name. Connectivity
/// records are ignored: the repair pipeline moves coordinates and never edits
/// topology.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularSystem, Self::Error> {
        let mut system = MolecularSystem::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let altloc = line.as_bytes()[16] as char;
                    if altloc != ' ' && altloc != 'A' {
                        // Collapse alternate locations to the primary conformer.
                        continue;
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingAtomName,
                        });
                    }

                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = line.as_bytes()[21] as char;
                    let res_num_str = slice_and_trim(&line, 22, 26);
                    let res_num: isize = res_num_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_num_str.into(),
                        },
                    })?;

                    let x = parse_float(&line, line_num, 30, 38, "31-38")?;
                    let y = parse_float(&line, line_num, 38, 46, "39-46")?;
                    let z = parse_float(&line, line_num, 46, 54, "47-54")?;

                    let occupancy = slice_and_trim(&line, 54, 60).parse().unwrap_or(1.0);
                    let b_factor = slice_and_trim(&line, 60, 66).parse().unwrap_or(0.0);
                    let element = slice_and_trim(&line, 76, 78);

                    let kind = if record_type == "HETATM" {
                        match ResidueKind::classify(res_name) {
                            ResidueKind::Water => ResidueKind::Water,
                            _ => ResidueKind::Ligand,
                        }
                    } else {
                        ResidueKind::classify(res_name)
                    };
                    let chain_type = match kind {
                        ResidueKind::Polymer => ChainType::Protein,
                        ResidueKind::Ligand => ChainType::Ligand,
                        ResidueKind::Water => ChainType::Water,
                    };

                    let chain = system.add_chain(chain_id, chain_type);
                    let residue = system
                        .add_residue(chain, res_num, res_name, kind)
                        .expect("chain was just added");
                    let atom = Atom::new(name, residue, Point3::new(x, y, z));
                    let mut atom = atom.with_element(element);
                    atom.occupancy = occupancy;
                    atom.b_factor = b_factor;
                    system.add_atom_to_residue(residue, atom);
                }
                // Only the first model of a multi-model file is read.
                "ENDMDL" => break,
                _ => {}
            }
        }

        Ok(system)
    }

    fn write_to(system: &MolecularSystem, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut serial: usize = 1;

        for &chain_id in system.chains_in_order() {
            let Some(chain) = system.chain(chain_id) else {
                continue;
            };
            let mut wrote_polymer = false;

            for &residue_id in chain.residues() {
                let Some(residue) = system.residue(residue_id) else {
                    continue;
                };
                let record = if residue.is_polymer() {
                    wrote_polymer = true;
                    "ATOM"
                } else {
                    "HETATM"
                };
                let res_name: String = residue.name.chars().take(3).collect();

                for &atom_id in residue.atoms() {
                    let Some(atom) = system.atom(atom_id) else {
                        continue;
                    };
                    writeln!(
                        writer,
                        "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                        record,
                        serial % 100_000,
                        format_atom_name(&atom.name),
                        ' ',
                        res_name,
                        chain.id,
                        residue.number,
                        ' ',
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        atom.occupancy,
                        atom.b_factor,
                        atom.element,
                    )?;
                    serial += 1;
                }
            }

            if wrote_polymer {
                writeln!(writer, "TER")?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Places short atom names per PDB convention: names of up to three
/// characters start in column 14, four-character names in column 13.
fn format_atom_name(name: &str) -> String {
    if name.len() >= 4 {
        name.chars().take(4).collect()
    } else {
        format!(" {:<3}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::ResidueKind;
    use std::io::BufReader;

    const SAMPLE: &str = "\
REMARK sample structure
ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 90.12           N
ATOM      2  CA  GLY A   1       1.458   0.000   0.000  1.00 90.12           C
ATOM      3  C   GLY A   1       2.009   1.420   0.000  1.00 90.12           C
ATOM      4  N   ALA A   2       3.332   1.536   0.000  1.00 85.30           N
ATOM      5  CA  ALA A   2       3.987   2.839   0.000  1.00 85.30           C
HETATM    6  O   HOH A 101       8.000   8.000   8.000  1.00 30.00           O
TER
END
";

    fn read(text: &str) -> MolecularSystem {
        PdbFile::read_from(&mut BufReader::new(text.as_bytes())).unwrap()
    }

    #[test]
    fn reads_atoms_residues_and_chains() {
        let system = read(SAMPLE);
        assert_eq!(system.atoms_iter().count(), 6);
        assert_eq!(system.residues_iter().count(), 3);

        let chain = system.find_chain_by_id('A').unwrap();
        let gly = system.find_residue_by_id(chain, 1).unwrap();
        let residue = system.residue(gly).unwrap();
        assert_eq!(residue.name, "GLY");
        assert!(residue.is_polymer());

        let ca = residue.get_atom_id_by_name("CA").unwrap();
        let atom = system.atom(ca).unwrap();
        assert_eq!(atom.position, Point3::new(1.458, 0.0, 0.0));
        assert_eq!(atom.b_factor, 90.12);
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn classifies_hetatm_water() {
        let system = read(SAMPLE);
        let chain = system.find_chain_by_id('A').unwrap();
        let water = system.find_residue_by_id(chain, 101).unwrap();
        assert_eq!(system.residue(water).unwrap().kind, ResidueKind::Water);
    }

    #[test]
    fn collapses_alternate_locations() {
        let text = "\
ATOM      1  CA AGLY A   1       1.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA BGLY A   1       2.000   0.000   0.000  1.00  0.00           C
END
";
        let system = read(text);
        assert_eq!(system.atoms_iter().count(), 1);
        let (_, atom) = system.atoms_iter().next().unwrap();
        assert_eq!(atom.position.x, 1.0);
    }

    #[test]
    fn keeps_only_first_model() {
        let text = "\
MODEL        1
ATOM      1  CA  GLY A   1       1.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  GLY A   1       9.000   0.000   0.000  1.00  0.00           C
ENDMDL
END
";
        let system = read(text);
        assert_eq!(system.atoms_iter().count(), 1);
        let (_, atom) = system.atoms_iter().next().unwrap();
        assert_eq!(atom.position.x, 1.0);
    }

    #[test]
    fn short_atom_line_is_an_error() {
        let text = "ATOM      1  CA  GLY A   1       1.000\n";
        let result = PdbFile::read_from(&mut BufReader::new(text.as_bytes()));
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort,
            })
        ));
    }

    #[test]
    fn invalid_residue_number_is_an_error() {
        let text = "ATOM      1  CA  GLY A  1x       1.000   0.000   0.000  1.00  0.00           C\n";
        let result = PdbFile::read_from(&mut BufReader::new(text.as_bytes()));
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::InvalidInt { .. },
            })
        ));
    }

    #[test]
    fn write_then_read_round_trips() {
        let system = read(SAMPLE);
        let mut buffer = Vec::new();
        PdbFile::write_to(&system, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("TER"));
        assert!(text.ends_with("END\n"));

        let reread = PdbFile::read_from(&mut BufReader::new(text.as_bytes())).unwrap();
        assert_eq!(reread.atoms_iter().count(), 6);
        assert_eq!(reread.residues_iter().count(), 3);

        let chain = reread.find_chain_by_id('A').unwrap();
        let ala = reread.find_residue_by_id(chain, 2).unwrap();
        let ca = reread.residue(ala).unwrap().get_atom_id_by_name("CA").unwrap();
        assert_eq!(reread.atom(ca).unwrap().position, Point3::new(3.987, 2.839, 0.0));
    }

    #[test]
    fn atom_name_column_placement_follows_convention() {
        assert_eq!(format_atom_name("CA"), " CA ");
        assert_eq!(format_atom_name("N"), " N  ");
        assert_eq!(format_atom_name("HD11"), "HD11");
    }
}
