use super::atom_line::parse_atom_line;
use super::layout::ModelLayout;
use super::records::{
    LinePattern, MetadataKind, RecordKind, classify, first_float, first_integer, match_metadata,
    numeric_token,
};
use super::traits::DockingFormat;
use crate::core::models::pose::{Branch, DockingSummary, PoseModel, TorsionRecord, TorsionStatus};
use serde::Serialize;
use std::io::{self, BufRead, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Error)]
pub enum DockingFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The result of parsing one docking output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocking {
    pub layout: ModelLayout,
    pub models: Vec<PoseModel>,
    pub summary: DockingSummary,
}

impl ParsedDocking {
    /// The pose with the lowest score, if any pose is scored.
    pub fn best_model(&self) -> Option<&PoseModel> {
        self.models
            .iter()
            .filter(|m| m.vina_score.is_some())
            .min_by(|a, b| {
                a.vina_score
                    .partial_cmp(&b.vina_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Scanner state carried across lines.
struct Scanner {
    layout: ModelLayout,
    models: Vec<PoseModel>,
    current: Option<PoseModel>,
    in_torsion_block: bool,
    skipped_atoms: usize,
}

impl Scanner {
    fn new(layout: ModelLayout) -> Self {
        let current = match layout {
            ModelLayout::Implicit => Some(PoseModel::new(1)),
            ModelLayout::Explicit => None,
        };
        Self {
            layout,
            models: Vec::new(),
            current,
            in_torsion_block: false,
            skipped_atoms: 0,
        }
    }

    fn feed(&mut self, line_num: usize, line: &str) {
        if self.in_torsion_block && !line.contains("REMARK") {
            self.in_torsion_block = false;
        }

        match classify(line) {
            RecordKind::Model => self.open_model(),
            RecordKind::EndModel => self.close_model(),
            RecordKind::Atom => self.push_atom(line_num, line),
            RecordKind::Branch => self.push_branch(line_num, line),
            RecordKind::TreeMarker => {}
            RecordKind::Remark | RecordKind::Other => {
                if let Some((pattern, kind)) = match_metadata(line) {
                    self.apply_metadata(pattern, kind, line_num, line);
                }
            }
        }
    }

    fn open_model(&mut self) {
        if let Some(open) = self.current.take() {
            debug!(
                model = open.model_number,
                "MODEL without preceding ENDMDL; closing the open model."
            );
            self.models.push(open);
        }
        self.in_torsion_block = false;
        self.current = Some(PoseModel::new(self.models.len() as u32 + 1));
    }

    fn close_model(&mut self) {
        if !self.layout.is_explicit() {
            return;
        }
        self.in_torsion_block = false;
        match self.current.take() {
            Some(model) => self.models.push(model),
            None => debug!("ENDMDL outside of a model; ignored."),
        }
    }

    fn model_mut(&mut self, line_num: usize) -> Option<&mut PoseModel> {
        if self.current.is_none() {
            trace!(line = line_num, "Record outside of any model; ignored.");
        }
        self.current.as_mut()
    }

    fn push_atom(&mut self, line_num: usize, line: &str) {
        if self.current.is_none() {
            trace!(line = line_num, "Atom outside of any model; ignored.");
            return;
        }
        match parse_atom_line(line) {
            Ok(atom) => {
                if let Some(model) = self.current.as_mut() {
                    model.atoms.push(atom);
                }
            }
            Err(e) => {
                self.skipped_atoms += 1;
                warn!(line = line_num, error = %e, "Skipping malformed atom line.");
            }
        }
    }

    fn push_branch(&mut self, line_num: usize, line: &str) {
        let mut fields = line.split_whitespace().skip(1).map(str::parse::<u32>);
        let branch = match (fields.next(), fields.next()) {
            (Some(Ok(from)), Some(Ok(to))) => Branch { from, to },
            _ => {
                debug!(line = line_num, "Unreadable BRANCH record; ignored.");
                return;
            }
        };
        if let Some(model) = self.model_mut(line_num) {
            model.branches.push(branch);
        }
    }

    fn apply_metadata(
        &mut self,
        pattern: LinePattern,
        kind: MetadataKind,
        line_num: usize,
        line: &str,
    ) {
        let in_torsion_block = self.in_torsion_block;
        let Some(model) = self.model_mut(line_num) else {
            return;
        };
        let rest = pattern.rest(line);

        match kind {
            MetadataKind::VinaResult => apply_vina_result(model, rest),
            MetadataKind::FreeEnergy => {
                if let Some(score) = first_float(rest) {
                    model.vina_score = Some(score);
                }
            }
            MetadataKind::TotalEnergy => model.total_energy = energy_value(rest).or(model.total_energy),
            MetadataKind::InterEnergy => model.inter_energy = energy_value(rest).or(model.inter_energy),
            MetadataKind::IntraEnergy => model.intra_energy = energy_value(rest).or(model.intra_energy),
            MetadataKind::ActiveTorsions => {
                let before = &line[..line.find("active torsions:").unwrap_or(line.len())];
                model.total_torsions = first_integer(before).unwrap_or(0);
                self.in_torsion_block = true;
            }
            MetadataKind::TorsionBond => {
                if !in_torsion_block {
                    trace!(line = line_num, "Torsion bond outside of a torsion block; ignored.");
                    return;
                }
                match parse_torsion(line) {
                    Some(torsion) => {
                        if torsion.status.is_active() {
                            model.active_torsions += 1;
                        }
                        model.torsions.push(torsion);
                    }
                    None => debug!(line = line_num, "Unreadable torsion remark; ignored."),
                }
            }
        }
    }

    fn finish(mut self) -> (Vec<PoseModel>, usize) {
        if let Some(model) = self.current.take() {
            match self.layout {
                ModelLayout::Implicit if model.is_empty() => {}
                ModelLayout::Implicit => self.models.push(model),
                ModelLayout::Explicit => {
                    warn!(
                        model = model.model_number,
                        "File ended inside a model without ENDMDL; keeping the partial model."
                    );
                    self.models.push(model);
                }
            }
        }
        (self.models, self.skipped_atoms)
    }
}

/// Reads `<score> <rmsd_lb> <rmsd_ub>` after `VINA RESULT:`.
///
/// Some writers put a pose rank before the score; when four or more numbers
/// follow, the leading one is treated as that rank.
fn apply_vina_result(model: &mut PoseModel, rest: &str) {
    let numbers: Vec<f64> = rest.split_whitespace().map_while(numeric_token).collect();
    let fields = match numbers.len() {
        0 => return,
        n if n >= 4 => &numbers[n - 3..],
        _ => &numbers[..],
    };
    model.vina_score = fields.first().copied();
    model.rmsd_lb = fields.get(1).copied();
    model.rmsd_ub = fields.get(2).copied();
}

fn energy_value(rest: &str) -> Option<f64> {
    first_float(rest.trim_start().trim_start_matches(':'))
}

/// Parses `REMARK <n> <A|I> between atoms: <name>_<idx> and <name>_<idx>`.
fn parse_torsion(line: &str) -> Option<TorsionRecord> {
    let (head, atoms) = line.split_once("between atoms:")?;

    let head_tokens: Vec<&str> = head.split_whitespace().collect();
    let status = head_tokens
        .iter()
        .rev()
        .find_map(|t| t.parse::<TorsionStatus>().ok())?;
    let index = first_integer(head).unwrap_or(0);

    let mut atom_refs = atoms.split_whitespace().filter_map(|token| {
        let (name, idx) = token.rsplit_once('_')?;
        Some((name.to_string(), idx.parse::<u32>().ok()?))
    });
    let (atom1_name, atom1_index) = atom_refs.next()?;
    let (atom2_name, atom2_index) = atom_refs.next()?;

    Some(TorsionRecord {
        index,
        status,
        atom1_index,
        atom2_index,
        atom1_name,
        atom2_name,
    })
}

/// Parses a whole docking output text into poses and a score summary.
///
/// The layout is decided once: files without `MODEL` lines become a single
/// implicit model that collects every record, files with them are split at
/// `MODEL`/`ENDMDL`. Malformed atom lines and unreadable remarks are skipped
/// without aborting the parse; empty input yields no models and a summary
/// with `total_models == 0`.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_docking_file(text: &str) -> ParsedDocking {
    let layout = ModelLayout::detect(text);
    let mut scanner = Scanner::new(layout);
    for (i, line) in text.lines().enumerate() {
        scanner.feed(i + 1, line);
    }
    let (models, skipped_atoms) = scanner.finish();
    let summary = DockingSummary::from_models(&models);

    info!(
        ?layout,
        models = summary.total_models,
        scored = summary.scored_models,
        skipped_atoms,
        "Parsed docking file."
    );

    ParsedDocking {
        layout,
        models,
        summary,
    }
}

/// Reader for Vina/AutoDock PDBQT docking output (also accepts plain PDB).
pub struct DockingFile;

impl DockingFormat for DockingFile {
    type Output = ParsedDocking;
    type Error = DockingFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(parse_docking_file(&text))
    }
}

impl DockingFile {
    /// Loads and parses a file without blocking the async runtime's reactor.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<ParsedDocking, DockingFileError> {
        let text = super::traits::load_text(path).await?;
        Ok(parse_docking_file(&text))
    }
}
