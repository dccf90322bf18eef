use crate::core::accessibility::Accessibility;
use crate::core::accessibility::constraint::AccessibilityConstraint;
use crate::core::accessibility::reverse::ReverseAccessibility;
use crate::core::energy::base_pair::{DEFAULT_MAX_INTERNAL_LOOP_SIZE, InteractionEnergyBasePair};
use crate::core::range::{IndexRange, IndexRangeList};
use crate::engine::output::interaction_list::OutputHandlerInteractionList;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EnergyConfig {
    pub max_internal_loop_size1: usize,
    pub max_internal_loop_size2: usize,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_internal_loop_size1: DEFAULT_MAX_INTERNAL_LOOP_SIZE,
            max_internal_loop_size2: DEFAULT_MAX_INTERNAL_LOOP_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Number of best interactions to keep.
    pub max_to_store: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { max_to_store: 1 }
    }
}

/// Splitting of long sequences into overlapping windows that are searched
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct WindowConfig {
    pub width: usize,
    pub overlap: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 20,
            overlap: 10,
        }
    }
}

/// Settings of a single prediction run.
///
/// Regions restrict the search to parts of a sequence (`None` searches the
/// whole sequence); blocked ranges exclude positions from any interaction.
/// Indices of the second sequence are given in its original 5'->3' reading.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionConfig {
    pub energy: EnergyConfig,
    pub output: OutputConfig,
    pub windows: Option<WindowConfig>,
    pub region1: Option<IndexRangeList>,
    pub region2: Option<IndexRangeList>,
    pub blocked1: IndexRangeList,
    pub blocked2: IndexRangeList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FilePredictionConfig {
    #[serde(default)]
    energy: EnergyConfig,
    #[serde(default)]
    output: OutputConfig,
    windows: Option<WindowConfig>,
    region1: Option<IndexRangeList>,
    region2: Option<IndexRangeList>,
    #[serde(default)]
    blocked1: IndexRangeList,
    #[serde(default)]
    blocked2: IndexRangeList,
}

impl From<FilePredictionConfig> for PredictionConfig {
    fn from(file: FilePredictionConfig) -> Self {
        Self {
            energy: file.energy,
            output: file.output,
            windows: file.windows,
            region1: file.region1,
            region2: file.region2,
            blocked1: file.blocked1,
            blocked2: file.blocked2,
        }
    }
}

impl PredictionConfig {
    /// Reads and validates a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, source: &str) -> Result<Self, ConfigError> {
        let file: FilePredictionConfig =
            toml::from_str(content).map_err(|e| ConfigError::Toml {
                path: source.to_string(),
                source: e,
            })?;
        let config = Self::from(file);
        config.validate()?;
        debug!(
            "Loaded prediction config from '{}' (max_to_store = {}, windows = {:?})",
            source, config.output.max_to_store, config.windows
        );
        Ok(config)
    }

    /// Checks the settings that do not depend on the sequences.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(windows) = &self.windows {
            if windows.width <= windows.overlap {
                return Err(ConfigError::Invalid(format!(
                    "window width {} must be larger than the window overlap {}",
                    windows.width, windows.overlap
                )));
            }
        }
        if self.output.max_to_store == 0 {
            return Err(ConfigError::Invalid(
                "at least one interaction has to be stored".to_string(),
            ));
        }
        for (name, region) in [("region1", &self.region1), ("region2", &self.region2)] {
            if region.as_ref().is_some_and(IndexRangeList::is_empty) {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// Checks that all configured ranges lie within sequences of the given
    /// lengths.
    pub fn check_sequence_lengths(&self, len1: usize, len2: usize) -> Result<(), ConfigError> {
        let lists = [
            ("region1", self.region1.as_ref(), len1),
            ("region2", self.region2.as_ref(), len2),
            ("blocked1", Some(&self.blocked1), len1),
            ("blocked2", Some(&self.blocked2), len2),
        ];
        for (name, list, length) in lists {
            let Some(list) = list else { continue };
            if let Some(range) = list.iter().find(|r| r.to >= length) {
                return Err(ConfigError::Invalid(format!(
                    "{name} range {range} exceeds the sequence length {length}"
                )));
            }
        }
        Ok(())
    }

    /// Regions of sequence 1 to search.
    pub fn regions1(&self, len1: usize) -> IndexRangeList {
        region_or_full(self.region1.as_ref(), len1)
    }

    /// Regions of sequence 2 to search, in its original reading.
    pub fn regions2(&self, len2: usize) -> IndexRangeList {
        region_or_full(self.region2.as_ref(), len2)
    }

    /// Positional constraint of sequence 1 from the blocked ranges.
    pub fn constraint1(&self, len1: usize) -> Result<AccessibilityConstraint, ConfigError> {
        blocking_constraint(&self.blocked1, len1)
    }

    /// Positional constraint of sequence 2 from the blocked ranges.
    pub fn constraint2(&self, len2: usize) -> Result<AccessibilityConstraint, ConfigError> {
        blocking_constraint(&self.blocked2, len2)
    }

    pub fn energy_model<'a>(
        &self,
        acc1: &'a dyn Accessibility,
        acc2: &'a ReverseAccessibility<'a>,
    ) -> InteractionEnergyBasePair<'a> {
        InteractionEnergyBasePair::new(
            acc1,
            acc2,
            self.energy.max_internal_loop_size1,
            self.energy.max_internal_loop_size2,
        )
    }

    pub fn output_handler(&self) -> OutputHandlerInteractionList {
        OutputHandlerInteractionList::new(self.output.max_to_store)
    }
}

fn region_or_full(region: Option<&IndexRangeList>, length: usize) -> IndexRangeList {
    match region {
        Some(list) => list.clone(),
        None if length == 0 => IndexRangeList::new(),
        None => IndexRangeList::from_sorted_unchecked(vec![IndexRange::new(0, length - 1)]),
    }
}

fn blocking_constraint(
    blocked: &IndexRangeList,
    length: usize,
) -> Result<AccessibilityConstraint, ConfigError> {
    AccessibilityConstraint::with_ranges(length, blocked.clone(), IndexRangeList::new())
        .map_err(|e| ConfigError::Invalid(e.to_string()))
}

#[derive(Default)]
pub struct PredictionConfigBuilder {
    max_internal_loop_size1: Option<usize>,
    max_internal_loop_size2: Option<usize>,
    max_to_store: Option<usize>,
    window_width: Option<usize>,
    window_overlap: Option<usize>,
    region1: Option<IndexRangeList>,
    region2: Option<IndexRangeList>,
    blocked1: Option<IndexRangeList>,
    blocked2: Option<IndexRangeList>,
}

impl PredictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_internal_loop_size1(mut self, size: usize) -> Self {
        self.max_internal_loop_size1 = Some(size);
        self
    }
    pub fn max_internal_loop_size2(mut self, size: usize) -> Self {
        self.max_internal_loop_size2 = Some(size);
        self
    }
    pub fn max_to_store(mut self, n: usize) -> Self {
        self.max_to_store = Some(n);
        self
    }
    pub fn window_width(mut self, width: usize) -> Self {
        self.window_width = Some(width);
        self
    }
    pub fn window_overlap(mut self, overlap: usize) -> Self {
        self.window_overlap = Some(overlap);
        self
    }
    pub fn region1(mut self, region: IndexRangeList) -> Self {
        self.region1 = Some(region);
        self
    }
    pub fn region2(mut self, region: IndexRangeList) -> Self {
        self.region2 = Some(region);
        self
    }
    pub fn blocked1(mut self, blocked: IndexRangeList) -> Self {
        self.blocked1 = Some(blocked);
        self
    }
    pub fn blocked2(mut self, blocked: IndexRangeList) -> Self {
        self.blocked2 = Some(blocked);
        self
    }

    pub fn build(self) -> Result<PredictionConfig, ConfigError> {
        let defaults = EnergyConfig::default();
        let energy = EnergyConfig {
            max_internal_loop_size1: self
                .max_internal_loop_size1
                .unwrap_or(defaults.max_internal_loop_size1),
            max_internal_loop_size2: self
                .max_internal_loop_size2
                .unwrap_or(defaults.max_internal_loop_size2),
        };
        let output = OutputConfig {
            max_to_store: self
                .max_to_store
                .unwrap_or(OutputConfig::default().max_to_store),
        };
        let windows = match (self.window_width, self.window_overlap) {
            (None, None) => None,
            (Some(width), Some(overlap)) => Some(WindowConfig { width, overlap }),
            (None, Some(_)) => return Err(ConfigError::MissingParameter("window_width")),
            (Some(_), None) => return Err(ConfigError::MissingParameter("window_overlap")),
        };

        let config = PredictionConfig {
            energy,
            output,
            windows,
            region1: self.region1,
            region2: self.region2,
            blocked1: self.blocked1.unwrap_or_default(),
            blocked2: self.blocked2.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::accessibility::disabled::AccessibilityDisabled;
    use crate::core::energy::interaction_energy::InteractionEnergy;
    use crate::core::models::sequence::RnaSequence;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn builder_applies_defaults() {
        let config = PredictionConfigBuilder::new().build().unwrap();
        assert_eq!(config, PredictionConfig::default());
        assert_eq!(config.energy.max_internal_loop_size1, 16);
        assert_eq!(config.energy.max_internal_loop_size2, 16);
        assert_eq!(config.output.max_to_store, 1);
        assert!(config.windows.is_none());
    }

    #[test]
    fn builder_sets_all_parameters() {
        let config = PredictionConfigBuilder::new()
            .max_internal_loop_size1(4)
            .max_internal_loop_size2(6)
            .max_to_store(10)
            .window_width(30)
            .window_overlap(5)
            .region1("0-9".parse().unwrap())
            .region2("5-20".parse().unwrap())
            .blocked1("3-4".parse().unwrap())
            .blocked2("0-0".parse().unwrap())
            .build()
            .unwrap();
        assert_eq!(config.energy.max_internal_loop_size1, 4);
        assert_eq!(config.energy.max_internal_loop_size2, 6);
        assert_eq!(config.output.max_to_store, 10);
        assert_eq!(
            config.windows,
            Some(WindowConfig {
                width: 30,
                overlap: 5
            })
        );
        assert_eq!(config.region2.unwrap().to_string(), "5-20");
        assert_eq!(config.blocked1.to_string(), "3-4");
    }

    #[test]
    fn builder_requires_both_window_parameters() {
        let result = PredictionConfigBuilder::new().window_overlap(5).build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter("window_width"))
        ));
        let result = PredictionConfigBuilder::new().window_width(50).build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter("window_overlap"))
        ));
    }

    #[test]
    fn validation_rejects_inconsistent_settings() {
        let result = PredictionConfigBuilder::new()
            .window_width(10)
            .window_overlap(10)
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = PredictionConfigBuilder::new().max_to_store(0).build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = PredictionConfigBuilder::new()
            .region1(IndexRangeList::new())
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("region1")));
    }

    #[test]
    fn sequence_lengths_bound_all_ranges() {
        let config = PredictionConfigBuilder::new()
            .region1("0-9".parse().unwrap())
            .blocked2("2-7".parse().unwrap())
            .build()
            .unwrap();
        assert!(config.check_sequence_lengths(10, 8).is_ok());
        assert!(matches!(
            config.check_sequence_lengths(9, 8),
            Err(ConfigError::Invalid(msg)) if msg.contains("region1")
        ));
        assert!(matches!(
            config.check_sequence_lengths(10, 7),
            Err(ConfigError::Invalid(msg)) if msg.contains("blocked2")
        ));
    }

    #[test]
    fn regions_default_to_full_sequences() {
        let config = PredictionConfigBuilder::new()
            .region2("3-5,9-9".parse().unwrap())
            .build()
            .unwrap();
        assert_eq!(config.regions1(12).to_string(), "0-11");
        assert_eq!(config.regions2(12).to_string(), "3-5,9-9");
        assert!(config.regions1(0).is_empty());
    }

    #[test]
    fn constraints_block_configured_positions() {
        let config = PredictionConfigBuilder::new()
            .blocked1("1-2".parse().unwrap())
            .build()
            .unwrap();
        let constraint = config.constraint1(5).unwrap();
        assert!(constraint.is_blocked(1));
        assert!(!constraint.is_blocked(3));
        assert!(config.constraint2(5).unwrap().is_empty());
        assert!(matches!(config.constraint1(2), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn energy_model_and_output_handler_follow_config() {
        let config = PredictionConfigBuilder::new()
            .max_internal_loop_size1(2)
            .max_internal_loop_size2(3)
            .max_to_store(4)
            .build()
            .unwrap();
        let a1 = AccessibilityDisabled::new(RnaSequence::new("q", "GGGAAACCC").unwrap());
        let a2 = AccessibilityDisabled::new(RnaSequence::new("t", "GGGUUUCCC").unwrap());
        let rev = ReverseAccessibility::new(&a2);
        let model = config.energy_model(&a1, &rev);
        assert_eq!(model.max_internal_loop_size1(), 2);
        assert_eq!(model.max_internal_loop_size2(), 3);
        assert_eq!(config.output_handler().max_to_store(), 4);
    }

    #[test]
    fn load_reads_kebab_case_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("prediction.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            r#"
            region1 = "0-99,150-199"
            blocked2 = "10-12"

            [energy]
            max-internal-loop-size1 = 8

            [output]
            max-to-store = 5

            [windows]
            width = 60
            overlap = 15
            "#
        )
        .unwrap();

        let config = PredictionConfig::load(&file_path).unwrap();
        assert_eq!(config.energy.max_internal_loop_size1, 8);
        assert_eq!(config.energy.max_internal_loop_size2, 16);
        assert_eq!(config.output.max_to_store, 5);
        assert_eq!(
            config.windows,
            Some(WindowConfig {
                width: 60,
                overlap: 15
            })
        );
        assert_eq!(config.region1.unwrap().len(), 2);
        assert!(config.region2.is_none());
        assert_eq!(config.blocked2.to_string(), "10-12");
    }

    #[test]
    fn empty_window_table_uses_default_windows() {
        let config = PredictionConfig::from_toml_str("[windows]\n").unwrap();
        assert_eq!(config.windows, Some(WindowConfig::default()));
        let config = PredictionConfig::from_toml_str("").unwrap();
        assert_eq!(config, PredictionConfig::default());
    }

    #[test]
    fn load_rejects_unknown_keys_and_bad_ranges() {
        let result = PredictionConfig::from_toml_str("[output]\nmax_to_store = 3\n");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
        let result = PredictionConfig::from_toml_str("blocked1 = \"5-2\"\n");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
        let result = PredictionConfig::from_toml_str("[windows]\nwidth = 5\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let result = PredictionConfig::load(&missing);
        assert!(matches!(result, Err(ConfigError::Io { path, .. }) if path.ends_with("missing.toml")));
    }
}
