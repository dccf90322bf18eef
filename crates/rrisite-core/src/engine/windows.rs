use crate::core::range::IndexRange;
use crate::engine::config::{ConfigError, PredictionConfig, WindowConfig};
use itertools::Itertools;
use tracing::{debug, instrument};

/// Pairs of ranges of sequence 1 and sequence 2 that are searched
/// independently. Ranges of sequence 2 are given in its original reading.
pub type WindowPair = (IndexRange, IndexRange);

/// Plans the search of a prediction run: every configured region of
/// sequence 1 is paired with every region of sequence 2 (whole sequences
/// without configured regions). With windowing enabled, regions are split
/// into overlapping windows first; regions not longer than the overlap are
/// searched whole.
#[instrument(skip(config), name = "plan_window_pairs")]
pub fn plan_window_pairs(
    config: &PredictionConfig,
    len1: usize,
    len2: usize,
) -> Result<Vec<WindowPair>, ConfigError> {
    if len1 == 0 || len2 == 0 {
        return Err(ConfigError::Invalid(
            "cannot plan windows for an empty sequence".to_string(),
        ));
    }
    config.validate()?;
    config.check_sequence_lengths(len1, len2)?;

    let regions1 = config.regions1(len1);
    let regions2 = config.regions2(len2);

    let mut pairs = Vec::new();
    for (r1, r2) in regions1.iter().cartesian_product(regions2.iter()) {
        match &config.windows {
            None => pairs.push((*r1, *r2)),
            Some(windows) => pairs.extend(split_pair(r1, r2, windows)?),
        }
    }

    debug!(
        "Planned {} window pairs for {} x {} region(s)",
        pairs.len(),
        regions1.len(),
        regions2.len()
    );
    Ok(pairs)
}

fn split_pair(
    r1: &IndexRange,
    r2: &IndexRange,
    windows: &WindowConfig,
) -> Result<Vec<WindowPair>, ConfigError> {
    let to_config_error = |e: crate::core::range::RangeError| ConfigError::Invalid(e.to_string());
    let (width, overlap) = (windows.width, windows.overlap);

    if r1.width() > overlap && r2.width() > overlap {
        return IndexRange::range_pairs(r1, r2, width, overlap).map_err(to_config_error);
    }
    let split = |range: &IndexRange| {
        if range.width() > overlap {
            range
                .overlapping_windows(width, overlap)
                .map_err(to_config_error)
        } else {
            Ok(vec![*range])
        }
    };
    Ok(split(r1)?
        .into_iter()
        .cartesian_product(split(r2)?)
        .collect())
}
