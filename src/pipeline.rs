// src/pipeline.rs

use log::info;

use crate::data_analysis::reference_normalizer::normalize_to_reference;
use crate::data_analysis::results_packager::{package_results, ParameterTable};
use crate::data_analysis::windowed_regression::{run_side_pairs, RegressionResult};
use crate::data_input::block_extractor::{extract_blocks, BlockMarkers};
use crate::data_input::channel_table::{build_channel_table, ChannelTable};
use crate::error::{KcError, KcResult};
use crate::test_definition::{SidePair, TableVariant, TestDefinition};

/// Everything derived from one report for one test definition.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub definition: TestDefinition,
    pub block_count: usize,
    pub reference_row: usize,
    pub raw: ChannelTable,
    pub offset: ChannelTable,
    pub regressions: Vec<RegressionResult>,
}

impl ResultSet {
    /// Rounded, scaled parameter table for display and export.
    pub fn parameters(&self) -> ParameterTable {
        package_results(&self.definition, &self.regressions)
    }

    /// Table a side pair was fitted on.
    pub fn table_for(&self, pair: &SidePair) -> &ChannelTable {
        match pair.table {
            TableVariant::Raw => &self.raw,
            TableVariant::Offset => &self.offset,
        }
    }

    pub fn regression(&self, parameter_name: &str) -> Option<&RegressionResult> {
        self.regressions
            .iter()
            .find(|r| r.parameter_name == parameter_name)
    }
}

/// Runs block extraction, channel extraction, normalization and regression on one report.
pub fn process_report(content: &str, definition: &TestDefinition, markers: &BlockMarkers) -> KcResult<ResultSet> {
    definition.validate()?;

    let blocks = extract_blocks(content, markers)?;
    if blocks.is_empty() {
        return Err(KcError::EmptyDataset);
    }
    info!("Number of available data blocks = {}", blocks.len());

    let raw = build_channel_table(&blocks, &definition.channels)?;
    let (offset, reference_row) = normalize_to_reference(&raw, definition.reference_channel)?;
    info!(
        "Reference row {} of {} ('{}' closest to zero)",
        reference_row + 1,
        raw.n_rows(),
        definition.reference_channel
    );

    let regressions = run_side_pairs(definition, &raw, &offset)?;

    Ok(ResultSet {
        definition: definition.clone(),
        block_count: blocks.len(),
        reference_row,
        raw,
        offset,
        regressions,
    })
}

// src/pipeline.rs
