use crate::core::models::atom::{AtomRecord, RecordType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtomLineError {
    #[error("Malformed atom line: invalid {axis} coordinate in columns {columns} (value: '{value}')")]
    MalformedAtomLine {
        axis: char,
        columns: &'static str,
        value: String,
    },
}

const SERIAL: (usize, usize) = (6, 11);
const NAME: (usize, usize) = (12, 16);
const RES_NAME: (usize, usize) = (17, 20);
const CHAIN: (usize, usize) = (21, 22);
const RES_SEQ: (usize, usize) = (22, 26);
const X: (usize, usize) = (30, 38);
const Y: (usize, usize) = (38, 46);
const Z: (usize, usize) = (46, 54);
const CHARGE: (usize, usize) = (66, 76);
const ELEMENT: (usize, usize) = (76, 78);
const ELEMENT_FALLBACK: (usize, usize) = (12, 14);

fn slice_and_trim(line: &str, (start, end): (usize, usize)) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(
    line: &str,
    range: (usize, usize),
    axis: char,
    columns: &'static str,
) -> Result<f64, AtomLineError> {
    let raw = slice_and_trim(line, range);
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AtomLineError::MalformedAtomLine {
            axis,
            columns,
            value: raw.to_string(),
        }),
    }
}

/// Parses one fixed-column `ATOM`/`HETATM` line.
///
/// Columns follow the PDB layout (0-indexed, end-exclusive): serial `6..11`,
/// name `12..16`, residue name `17..20`, chain `21`, residue number `22..26`,
/// x/y/z `30..38`/`38..46`/`46..54`, charge `66..76`, element `76..78`.
/// Short lines are read as far as they go.
///
/// # Errors
///
/// Returns [`AtomLineError::MalformedAtomLine`] when any coordinate column is
/// missing, unparseable, or not finite. Serial and residue number fall back
/// to 0 and the charge to 0.0 instead of failing; a blank element column is
/// derived from the first two characters of the atom name with digits removed.
pub fn parse_atom_line(line: &str) -> Result<AtomRecord, AtomLineError> {
    let x = parse_coordinate(line, X, 'x', "31-38")?;
    let y = parse_coordinate(line, Y, 'y', "39-46")?;
    let z = parse_coordinate(line, Z, 'z', "47-54")?;

    let record = line
        .get(0..6)
        .and_then(|r| r.parse().ok())
        .unwrap_or(if line.starts_with("HETATM") {
            RecordType::Hetatm
        } else {
            RecordType::Atom
        });

    let element = match slice_and_trim(line, ELEMENT) {
        "" => slice_and_trim(line, ELEMENT_FALLBACK)
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .collect::<String>()
            .trim()
            .to_string(),
        e => e.to_string(),
    };

    Ok(AtomRecord {
        record,
        serial: slice_and_trim(line, SERIAL).parse().unwrap_or(0),
        name: slice_and_trim(line, NAME).to_string(),
        res_name: slice_and_trim(line, RES_NAME).to_string(),
        chain: slice_and_trim(line, CHAIN).to_string(),
        res_seq: slice_and_trim(line, RES_SEQ).parse().unwrap_or(0),
        x,
        y,
        z,
        charge: slice_and_trim(line, CHARGE).parse().unwrap_or(0.0),
        element,
    })
}

/// Returns `true` if the line (ignoring leading whitespace) is a coordinate record.
pub fn is_atom_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("ATOM") || trimmed.starts_with("HETATM")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VINA_LIGAND_LINE: &str =
        "ATOM      1  C1  UNL     1      -2.345  11.020   4.500  0.00  0.00    +0.123 C ";
    const PDB_HETATM_LINE: &str =
        "HETATM 1234  O2  LIG B 401      10.000 -20.500  30.250  1.00 20.00   -0.4567 O ";

    #[test]
    fn parses_all_fixed_columns_of_pdbqt_line() {
        let atom = parse_atom_line(VINA_LIGAND_LINE).unwrap();

        assert_eq!(atom.record, RecordType::Atom);
        assert_eq!(atom.serial, 1);
        assert_eq!(atom.name, "C1");
        assert_eq!(atom.res_name, "UNL");
        assert_eq!(atom.chain, "");
        assert_eq!(atom.res_seq, 1);
        assert_eq!((atom.x, atom.y, atom.z), (-2.345, 11.020, 4.5));
        assert!((atom.charge - 0.123).abs() < 1e-12);
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn parses_hetatm_line_with_chain() {
        let atom = parse_atom_line(PDB_HETATM_LINE).unwrap();

        assert_eq!(atom.record, RecordType::Hetatm);
        assert_eq!(atom.serial, 1234);
        assert_eq!(atom.name, "O2");
        assert_eq!(atom.chain, "B");
        assert_eq!(atom.res_seq, 401);
        assert_eq!((atom.x, atom.y, atom.z), (10.0, -20.5, 30.25));
        assert!((atom.charge + 0.4567).abs() < 1e-12);
        assert_eq!(atom.element, "O");
    }

    #[test]
    fn short_line_without_charge_or_element_uses_fallbacks() {
        let line = "ATOM      5 CL12 LIG A   1       1.000   2.000   3.000";
        let atom = parse_atom_line(line).unwrap();

        assert_eq!(atom.charge, 0.0);
        assert_eq!(atom.element, "CL");
    }

    #[test]
    fn element_fallback_strips_digits_from_name_prefix() {
        let line = "ATOM      5  N1  LIG A   1       1.000   2.000   3.000";
        assert_eq!(parse_atom_line(line).unwrap().element, "N");
    }

    #[test]
    fn invalid_serial_and_residue_number_default_to_zero() {
        let line = "ATOM  ***** C1  UNL  ????      1.000   2.000   3.000";
        let atom = parse_atom_line(line).unwrap();

        assert_eq!(atom.serial, 0);
        assert_eq!(atom.res_seq, 0);
        assert_eq!(atom.x, 1.0);
    }

    #[test]
    fn unparseable_coordinate_is_malformed() {
        let line = "ATOM      1  C1  UNL     1      abcdefgh  11.020   4.500";
        let err = parse_atom_line(line).unwrap_err();
        assert!(matches!(
            err,
            AtomLineError::MalformedAtomLine { axis: 'x', .. }
        ));
    }

    #[test]
    fn truncated_line_missing_z_is_malformed() {
        let line = "ATOM      1  C1  UNL     1      -2.345  11.020";
        let err = parse_atom_line(line).unwrap_err();
        assert!(matches!(
            err,
            AtomLineError::MalformedAtomLine { axis: 'z', .. }
        ));
    }

    #[test]
    fn non_finite_coordinate_is_malformed() {
        let line = "ATOM      1  C1  UNL     1         NaN  11.020   4.500";
        assert!(parse_atom_line(line).is_err());
    }

    #[test]
    fn is_atom_line_accepts_coordinate_records_only() {
        assert!(is_atom_line(VINA_LIGAND_LINE));
        assert!(is_atom_line("  HETATM    1"));
        assert!(!is_atom_line("REMARK VINA RESULT:"));
        assert!(!is_atom_line("ANISOU    1"));
    }
}
