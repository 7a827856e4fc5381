use super::atom_line::is_atom_line;
use super::layout::{is_endmdl_line, is_model_line};
use phf::{Map, phf_map};

/// Structural classification of one line of PDB/PDBQT text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordKind {
    Model,
    EndModel,
    Atom,
    Branch,
    /// `ROOT`, `ENDROOT`, `ENDBRANCH`, `TORSDOF`: recognized, not retained.
    TreeMarker,
    Remark,
    /// Anything else; still checked against the free-text patterns.
    Other,
}

static RECORD_KINDS: Map<&'static str, RecordKind> = phf_map! {
    "MODEL" => RecordKind::Model,
    "ENDMDL" => RecordKind::EndModel,
    "ATOM" => RecordKind::Atom,
    "HETATM" => RecordKind::Atom,
    "BRANCH" => RecordKind::Branch,
    "ROOT" => RecordKind::TreeMarker,
    "ENDROOT" => RecordKind::TreeMarker,
    "ENDBRANCH" => RecordKind::TreeMarker,
    "TORSDOF" => RecordKind::TreeMarker,
    "REMARK" => RecordKind::Remark,
};

pub(crate) fn classify(line: &str) -> RecordKind {
    // Tag predicates are shared with layout detection and model extraction so
    // all three agree on where models start and end.
    if is_endmdl_line(line) {
        return RecordKind::EndModel;
    }
    if is_model_line(line) {
        return RecordKind::Model;
    }
    let keyword = line.split_whitespace().next().unwrap_or("");
    match RECORD_KINDS.get(keyword) {
        Some(kind) => *kind,
        // Serial overflow glues the number to the keyword ("HETATM10000").
        None if is_atom_line(line) => RecordKind::Atom,
        None => RecordKind::Other,
    }
}

/// How a free-text rule recognizes its line.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LinePattern {
    /// The line, ignoring leading whitespace, starts with the text.
    Prefix(&'static str),
    /// The text appears anywhere in the line.
    Contains(&'static str),
}

impl LinePattern {
    pub(crate) fn matches(self, line: &str) -> bool {
        match self {
            LinePattern::Prefix(p) => line.trim_start().starts_with(p),
            LinePattern::Contains(p) => line.contains(p),
        }
    }

    /// The part of the line after the matched text.
    pub(crate) fn rest(self, line: &str) -> &str {
        let (LinePattern::Prefix(p) | LinePattern::Contains(p)) = self;
        line.find(p).map_or("", |i| &line[i + p.len()..])
    }
}

/// Kinds of docking metadata carried by remark and free-text lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetadataKind {
    VinaResult,
    FreeEnergy,
    TotalEnergy,
    InterEnergy,
    IntraEnergy,
    ActiveTorsions,
    TorsionBond,
}

/// Ordered rule table; the first matching rule wins.
///
/// `INTER + INTRA` precedes the plain `INTER`/`INTRA` prefixes it would
/// otherwise be shadowed by.
pub(crate) static METADATA_RULES: &[(LinePattern, MetadataKind)] = &[
    (LinePattern::Prefix("REMARK VINA RESULT:"), MetadataKind::VinaResult),
    (
        LinePattern::Contains("Estimated Free Energy of Binding"),
        MetadataKind::FreeEnergy,
    ),
    (LinePattern::Prefix("REMARK INTER + INTRA:"), MetadataKind::TotalEnergy),
    (LinePattern::Prefix("REMARK INTER:"), MetadataKind::InterEnergy),
    (LinePattern::Prefix("REMARK INTRA:"), MetadataKind::IntraEnergy),
    (LinePattern::Contains("active torsions:"), MetadataKind::ActiveTorsions),
    (LinePattern::Contains("between atoms:"), MetadataKind::TorsionBond),
];

pub(crate) fn match_metadata(line: &str) -> Option<(LinePattern, MetadataKind)> {
    METADATA_RULES
        .iter()
        .copied()
        .find(|(pattern, _)| pattern.matches(line))
}

/// Parses a token that looks like a number (it must contain a digit, so
/// words such as "inf" or "nan" are rejected).
pub(crate) fn numeric_token(token: &str) -> Option<f64> {
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The first signed float among the whitespace- or `=`-separated tokens.
pub(crate) fn first_float(text: &str) -> Option<f64> {
    text.split(|c: char| c.is_whitespace() || c == '=')
        .find_map(numeric_token)
}

/// The first integer among the whitespace-separated tokens.
pub(crate) fn first_integer(text: &str) -> Option<u32> {
    text.split_whitespace().find_map(|t| t.parse::<u32>().ok())
}
