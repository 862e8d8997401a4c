use std::fmt;

use serde::Serialize;

use crate::constants::DISPLAY_DECIMALS;
use crate::error::ComputeError;
use crate::node::CascadeNode;
use crate::numeric::round_to;
use crate::stage::Stage;

/// End-to-end metrics of a stage sequence, each rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CascadeResult {
    pub total_gain_db: f64,
    pub total_noise_figure_db: f64,
    pub total_p1db_dbm: f64, // input-referred
    pub total_ip3_dbm: f64,  // input-referred
    pub sfdr_db: f64,
}

impl fmt::Display for CascadeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CascadeResult {{ gain: {:.2} dB, noise figure: {:.2} dB, P1dB: {:.2} dBm, IP3: {:.2} dBm, SFDR: {:.2} dB }}",
            self.total_gain_db,
            self.total_noise_figure_db,
            self.total_p1db_dbm,
            self.total_ip3_dbm,
            self.sfdr_db
        )
    }
}

impl CascadeResult {
    /// Round the output node of a cascade. SFDR uses the unrounded IP3 and noise figure.
    pub fn from_output_node(node: &CascadeNode) -> Result<CascadeResult, ComputeError> {
        let sfdr_db = node.sfdr_db()?;
        Ok(CascadeResult {
            total_gain_db: round_to(node.cumulative_gain_db, DISPLAY_DECIMALS),
            total_noise_figure_db: round_to(node.noise_figure_db, DISPLAY_DECIMALS),
            total_p1db_dbm: round_to(node.input_p1db_dbm, DISPLAY_DECIMALS),
            total_ip3_dbm: round_to(node.input_ip3_dbm, DISPLAY_DECIMALS),
            sfdr_db: round_to(sfdr_db, DISPLAY_DECIMALS),
        })
    }
}

/// Returns the cumulative node after every stage, in chain order.
///
/// An empty slice yields an empty vector.
pub fn cascade_nodes(stages: &[Stage]) -> Result<Vec<CascadeNode>, ComputeError> {
    let mut stages_iter = stages.iter();
    let Some(first) = stages_iter.next() else {
        return Ok(Vec::new());
    };

    let mut cascading_node = CascadeNode::from_first_stage(first)?;
    let mut node_vector: Vec<CascadeNode> = Vec::with_capacity(stages.len());
    node_vector.push(cascading_node.clone());
    for stage in stages_iter {
        cascading_node = cascading_node.cascade_stage(stage)?;
        node_vector.push(cascading_node.clone());
    }
    Ok(node_vector)
}

/// Returns the cascaded output node without keeping the intermediate ones.
pub fn cascade_output_node(stages: &[Stage]) -> Result<CascadeNode, ComputeError> {
    let (first, rest) = stages.split_first().ok_or(ComputeError::EmptyInput)?;
    rest.iter().try_fold(CascadeNode::from_first_stage(first)?, |node, stage| {
        node.cascade_stage(stage)
    })
}

/// Cascade an ordered chain into its end-to-end [`CascadeResult`].
///
/// An empty chain is [`ComputeError::EmptyInput`]. Any step that would leave
/// the real numbers is [`ComputeError::NumericDomain`]; no partial result is
/// ever returned.
pub fn compute_cascade(stages: &[Stage]) -> Result<CascadeResult, ComputeError> {
    let output = cascade_output_node(stages)?;
    let result = CascadeResult::from_output_node(&output)?;
    tracing::debug!(stages = stages.len(), %result, "computed cascade");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lna() -> Stage {
        Stage::new("LNA", 20.0, 1.5, 10.0, 20.0)
    }

    #[test]
    fn single_stage() {
        let result = compute_cascade(&[lna()]).unwrap();
        assert_eq!(result.total_gain_db, 20.0);
        assert_eq!(result.total_noise_figure_db, 1.5);
        assert_eq!(result.total_p1db_dbm, 10.0);
        assert_eq!(result.total_ip3_dbm, 20.0);
        assert_eq!(result.sfdr_db, 128.33);
    }

    #[test]
    fn empty_chain_is_empty_input() {
        assert_eq!(compute_cascade(&[]), Err(ComputeError::EmptyInput));
        assert!(cascade_nodes(&[]).unwrap().is_empty());
    }

    #[test]
    fn two_part_cascade() {
        let amplifier = Stage::new("Amplifier", 10.0, 2.0, 10.0, 20.0);
        let driver = Stage::new("Driver", 5.0, 3.0, 5.0, 15.0);
        let result = compute_cascade(&[amplifier, driver]).unwrap();

        assert_eq!(result.total_gain_db, 15.0);
        assert_eq!(result.total_noise_figure_db, 2.26);
        assert_eq!(result.total_p1db_dbm, -5.0);
        assert_eq!(result.total_ip3_dbm, 4.86);
        assert_eq!(result.sfdr_db, 117.73);
    }

    #[test]
    fn nodes_track_every_stage() {
        let stages = vec![
            lna(),
            Stage::new("Mixer", -8.0, 8.0, 10.0, 15.0),
            Stage::new("IF Amplifier", 25.0, 4.0, 15.0, 25.0),
        ];
        let nodes = cascade_nodes(&stages).unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].name, "LNA Output");
        assert_eq!(nodes[1].name, "Mixer Output");
        assert_eq!(nodes[2].name, "IF Amplifier Output");
        assert_eq!(nodes[1].cumulative_gain_db, 12.0);
        assert_eq!(nodes[2].cumulative_gain_db, 37.0);

        // the last node is what compute_cascade rounds
        let result = compute_cascade(&stages).unwrap();
        assert_eq!(
            result,
            CascadeResult::from_output_node(nodes.last().unwrap()).unwrap()
        );
    }

    #[test]
    fn very_large_intercepts_stay_finite() {
        let ideal = Stage::new("Ideal", 0.0, 0.0, 1e307, 1e307);
        let result = compute_cascade(&[ideal.clone()]).unwrap();
        assert_eq!(result.total_gain_db, 0.0);
        assert_eq!(result.total_noise_figure_db, 0.0);
        assert_eq!(result.total_p1db_dbm, 1e307);
        assert_eq!(result.total_ip3_dbm, 1e307);
        assert!(result.sfdr_db.is_finite());

        // the surrogate P1dB stays the minimum behind a pad with no compression limit
        let pad = Stage::new("Pad", -3.0, 3.0, 1e307, 40.0);
        let result = compute_cascade(&[ideal.clone(), pad]).unwrap();
        assert_eq!(result.total_p1db_dbm, 1e307);
        assert_eq!(result.total_ip3_dbm, 40.0);
        assert_eq!(result.total_noise_figure_db, 3.0);

        // two unbounded intercepts leave no finite IP3 at all
        assert!(matches!(
            compute_cascade(&[ideal.clone(), ideal]),
            Err(ComputeError::NumericDomain { .. })
        ));
    }

    #[test]
    fn invalid_stage_fails_whole_cascade() {
        let broken = Stage::new("Broken", f64::INFINITY, 3.0, 10.0, 20.0);
        let result = compute_cascade(&[lna(), broken]);
        assert!(matches!(
            result,
            Err(ComputeError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn display_rounds_to_two_places() {
        let result = compute_cascade(&[lna()]).unwrap();
        assert_eq!(
            result.to_string(),
            "CascadeResult { gain: 20.00 dB, noise figure: 1.50 dB, P1dB: 10.00 dBm, IP3: 20.00 dBm, SFDR: 128.33 dB }"
        );
    }
}
