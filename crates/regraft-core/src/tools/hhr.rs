use super::ToolError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

/// One ranked hit from the homology search report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateHit {
    /// Rank assigned by the search tool (1 is best).
    pub rank: u32,
    /// Template identifier, when the report names one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template: Option<String>,
    /// The raw score line (`Probab=... E-value=...`), kept verbatim.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub probab: Option<String>,
    /// The raw hit header line.
    pub raw: String,
}

/// The document handed to the template-aware prediction round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateList {
    pub templates: Vec<TemplateHit>,
}

impl TemplateList {
    pub fn save(&self, path: &Path) -> Result<(), ToolError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ToolError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Parses a hit report into the top-`top` ranked hits.
///
/// The report is consumed by a small line state machine: a `No <rank>` line
/// opens a hit, a `Probab=` line attaches the score line, a `Template` line
/// names the template. Any unrecognized line is ignorable, never fatal.
pub fn parse_hit_report(reader: impl BufRead, top: usize) -> Result<Vec<TemplateHit>, ToolError> {
    let mut hits: Vec<TemplateHit> = Vec::new();
    let mut current: Option<TemplateHit> = None;

    for line_res in reader.lines() {
        let line = line_res?;
        if let Some(rest) = line.strip_prefix("No ") {
            let Ok(rank) = rest.split_whitespace().next().unwrap_or("").parse::<u32>() else {
                continue;
            };
            if let Some(done) = current.take() {
                hits.push(done);
            }
            current = Some(TemplateHit {
                rank,
                template: None,
                probab: None,
                raw: line.trim().to_string(),
            });
        } else if let Some(hit) = current.as_mut() {
            let trimmed = line.trim();
            if trimmed.starts_with("Probab=") {
                hit.probab = Some(trimmed.to_string());
            } else if trimmed.starts_with("Template") {
                if let Some(name) = trimmed.split_whitespace().nth(1) {
                    hit.template = Some(name.to_string());
                }
            }
        }
    }
    if let Some(done) = current.take() {
        hits.push(done);
    }

    hits.sort_by_key(|hit| hit.rank);
    hits.truncate(top);
    Ok(hits)
}

/// Reads a hit-report file and reduces it to a [`TemplateList`].
pub fn parse_hit_report_path(path: &Path, top: usize) -> Result<TemplateList, ToolError> {
    let file = File::open(path).map_err(|source| ToolError::ReportUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let templates = parse_hit_report(BufReader::new(file), top)?;
    Ok(TemplateList { templates })
}
