use crate::core::selection::{ResidueMapping, ResidueRange};
use crate::tools::minimize::MinimizerSettings;
use crate::tools::predict::PredictorSettings;
use crate::tools::search::SearchSettings;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Supplied mapping '{supplied}' disagrees with the window-derived mapping '{derived}'")]
    MappingMismatch {
        supplied: ResidueMapping,
        derived: ResidueMapping,
    },

    #[error("Range '{range}' does not fit its chain sequence of length {sequence_len}")]
    RangeOutsideSequence {
        range: ResidueRange,
        sequence_len: usize,
    },
}

/// Settings for the optional template-balancing stage: homology search plus
/// hit ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSettings {
    pub search: SearchSettings,
    /// How many top-ranked hits survive into the template list.
    pub top: usize,
}

impl BalanceSettings {
    pub fn new(search: SearchSettings) -> Self {
        Self { search, top: 5 }
    }
}

/// Fully validated parameters for one repair run.
///
/// Sites are resolved at build time: one per range, the integer midpoint
/// unless the caller supplied explicit positions. Mappings, when supplied,
/// are checked against the window-derived ones during preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
    /// Raw template structure with the gap region still present.
    pub template: PathBuf,
    /// Artifact directory; each stage writes its outputs beneath it.
    pub workdir: PathBuf,
    /// Repair regions, one contiguous range per chain typically.
    pub ranges: Vec<ResidueRange>,
    /// One repair site per range.
    pub sites: Vec<isize>,
    /// Residues of sequence context on each side of a repair region.
    pub flank: usize,
    pub predictor: PredictorSettings,
    pub balance: Option<BalanceSettings>,
    /// Weight of predicted coordinates in the optional blending stage.
    pub blend_alpha: Option<f64>,
    pub minimize: Option<MinimizerSettings>,
    /// Caller-supplied mappings, validated against the derived ones.
    pub mappings: Option<Vec<ResidueMapping>>,
}

/// Integer midpoint of a range, the default repair site.
pub fn site_for_range(range: &ResidueRange) -> isize {
    (range.start + range.end).div_euclid(2)
}

#[derive(Default)]
pub struct RepairConfigBuilder {
    template: Option<PathBuf>,
    workdir: Option<PathBuf>,
    ranges: Option<Vec<ResidueRange>>,
    sites: Option<Vec<isize>>,
    flank: Option<usize>,
    predictor: Option<PredictorSettings>,
    balance: Option<BalanceSettings>,
    blend_alpha: Option<f64>,
    minimize: Option<MinimizerSettings>,
    mappings: Option<Vec<ResidueMapping>>,
}

impl RepairConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, path: PathBuf) -> Self {
        self.template = Some(path);
        self
    }
    pub fn workdir(mut self, path: PathBuf) -> Self {
        self.workdir = Some(path);
        self
    }
    pub fn ranges(mut self, ranges: Vec<ResidueRange>) -> Self {
        self.ranges = Some(ranges);
        self
    }
    pub fn sites(mut self, sites: Vec<isize>) -> Self {
        self.sites = Some(sites);
        self
    }
    pub fn flank(mut self, flank: usize) -> Self {
        self.flank = Some(flank);
        self
    }
    pub fn predictor(mut self, predictor: PredictorSettings) -> Self {
        self.predictor = Some(predictor);
        self
    }
    pub fn balance(mut self, balance: BalanceSettings) -> Self {
        self.balance = Some(balance);
        self
    }
    pub fn blend_alpha(mut self, alpha: f64) -> Self {
        self.blend_alpha = Some(alpha);
        self
    }
    pub fn minimize(mut self, minimize: MinimizerSettings) -> Self {
        self.minimize = Some(minimize);
        self
    }
    pub fn mappings(mut self, mappings: Vec<ResidueMapping>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    pub fn build(self) -> Result<RepairConfig, ConfigError> {
        let template = self
            .template
            .ok_or(ConfigError::MissingParameter("template"))?;
        let workdir = self.workdir.ok_or(ConfigError::MissingParameter("workdir"))?;
        let ranges = self.ranges.ok_or(ConfigError::MissingParameter("ranges"))?;
        if ranges.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "ranges",
                message: "at least one repair range is required".to_string(),
            });
        }

        let sites = match self.sites {
            Some(sites) => {
                if sites.len() != ranges.len() {
                    return Err(ConfigError::InvalidParameter {
                        name: "sites",
                        message: format!(
                            "{} site(s) supplied for {} range(s)",
                            sites.len(),
                            ranges.len()
                        ),
                    });
                }
                sites
            }
            None => ranges.iter().map(site_for_range).collect(),
        };

        if let Some(alpha) = self.blend_alpha
            && !(0.0..=1.0).contains(&alpha)
        {
            return Err(ConfigError::InvalidParameter {
                name: "blend_alpha",
                message: format!("{alpha} is outside [0, 1]"),
            });
        }

        if let Some(mappings) = &self.mappings
            && mappings.len() != ranges.len()
        {
            return Err(ConfigError::InvalidParameter {
                name: "mappings",
                message: format!(
                    "{} mapping(s) supplied for {} range(s)",
                    mappings.len(),
                    ranges.len()
                ),
            });
        }

        Ok(RepairConfig {
            template,
            workdir,
            ranges,
            sites,
            flank: self.flank.unwrap_or(25),
            predictor: self.predictor.unwrap_or_default(),
            balance: self.balance,
            blend_alpha: self.blend_alpha,
            minimize: self.minimize,
            mappings: self.mappings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> RepairConfigBuilder {
        RepairConfigBuilder::new()
            .template(PathBuf::from("template.pdb"))
            .workdir(PathBuf::from("work"))
            .ranges(vec![ResidueRange::new('A', 100, 120)])
    }

    #[test]
    fn build_fails_without_required_parameters() {
        let err = RepairConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("template"));

        let err = RepairConfigBuilder::new()
            .template(PathBuf::from("t.pdb"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("workdir"));
    }

    #[test]
    fn empty_range_list_is_invalid() {
        let err = RepairConfigBuilder::new()
            .template(PathBuf::from("t.pdb"))
            .workdir(PathBuf::from("w"))
            .ranges(Vec::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "ranges", .. }
        ));
    }

    #[test]
    fn default_site_is_the_integer_midpoint() {
        let config = minimal_builder().build().unwrap();
        assert_eq!(config.sites, vec![110]);
    }

    #[test]
    fn one_site_is_derived_per_range() {
        let config = RepairConfigBuilder::new()
            .template(PathBuf::from("t.pdb"))
            .workdir(PathBuf::from("w"))
            .ranges(vec![
                ResidueRange::new('A', 100, 120),
                ResidueRange::new('B', 10, 21),
            ])
            .build()
            .unwrap();
        assert_eq!(config.sites, vec![110, 15]);
    }

    #[test]
    fn explicit_sites_must_match_range_count() {
        let err = minimal_builder().sites(vec![110, 200]).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "sites", .. }
        ));
    }

    #[test]
    fn blend_alpha_outside_unit_interval_is_invalid() {
        let err = minimal_builder().blend_alpha(1.5).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "blend_alpha",
                ..
            }
        ));
        assert!(minimal_builder().blend_alpha(0.0).build().is_ok());
        assert!(minimal_builder().blend_alpha(1.0).build().is_ok());
    }

    #[test]
    fn defaults_are_applied() {
        let config = minimal_builder().build().unwrap();
        assert_eq!(config.flank, 25);
        assert_eq!(config.predictor, PredictorSettings::default());
        assert!(config.balance.is_none());
        assert!(config.blend_alpha.is_none());
        assert!(config.minimize.is_none());
    }

    #[test]
    fn mapping_count_must_match_range_count() {
        let err = minimal_builder()
            .mappings(vec![
                ResidueMapping::new('A', 100, 120, 1, 21),
                ResidueMapping::new('B', 1, 2, 1, 2),
            ])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "mappings",
                ..
            }
        ));
    }
}
