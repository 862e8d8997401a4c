use std::fmt;

use crate::constants::{SFDR_SLOPE, THERMAL_NOISE_FLOOR_DBM_PER_HZ};
use crate::error::ComputeError;
use crate::numeric::{ensure_result_finite, linear_to_db};
use crate::stage::Stage;

/// Cumulative chain metrics at the output of one stage.
///
/// Compression and intercept points are referred to the chain input. A node
/// is produced from the first stage with [`CascadeNode::from_first_stage`] and
/// then extended one stage at a time with [`CascadeNode::cascade_stage`].
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeNode {
    pub name: String,                 // "<stage name> Output"
    pub stage_count: usize,           // stages cascaded so far
    pub cumulative_gain_db: f64,      // dB, sum of stage gains
    pub cumulative_gain_linear: f64,  // product of stage gains, linear
    pub noise_figure_db: f64,         // dB, Friis
    pub input_p1db_dbm: f64,          // dBm, lowest input-referred P1dB so far
    pub input_ip3_dbm: f64,           // dBm, reciprocal sum of input-referred IP3
}

impl fmt::Display for CascadeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CascadeNode {{ name: {}, gain: {}, noise_figure: {}, p1db: {}, ip3: {} }}",
            self.name,
            self.cumulative_gain_db,
            self.noise_figure_db,
            self.input_p1db_dbm,
            self.input_ip3_dbm
        )
    }
}

impl CascadeNode {
    /// The chain reduced to its first stage: every metric is the stage's own.
    pub fn from_first_stage(stage: &Stage) -> Result<CascadeNode, ComputeError> {
        stage.validate()?;
        Ok(CascadeNode {
            name: stage.name.clone() + " Output",
            stage_count: 1,
            cumulative_gain_db: stage.gain_db,
            cumulative_gain_linear: stage.gain_linear(),
            noise_figure_db: stage.noise_figure_db,
            input_p1db_dbm: stage.p1db_dbm,
            input_ip3_dbm: stage.ip3_dbm,
        })
    }

    /// Append `stage` to the chain ending at this node.
    ///
    /// Only gain from stages strictly before `stage` enters the Friis term and
    /// the input referral; `stage`'s own gain is folded in afterwards.
    pub fn cascade_stage(&self, stage: &Stage) -> Result<CascadeNode, ComputeError> {
        stage.validate()?;

        let preceding_gain_linear = self.cumulative_gain_linear;
        if !(preceding_gain_linear > 0.0) || !preceding_gain_linear.is_finite() {
            return Err(ComputeError::domain(
                "cascaded noise figure",
                format!(
                    "linear gain ahead of {} is {}, cannot divide by it",
                    stage.name, preceding_gain_linear
                ),
            ));
        }

        let noise_factor =
            self.noise_factor() + (stage.noise_factor() - 1.0) / preceding_gain_linear;
        let noise_figure_db = linear_to_db("cascaded noise figure", noise_factor)?;

        let referred_p1db = stage.p1db_dbm - self.cumulative_gain_db;
        let input_p1db_dbm = self.input_p1db_dbm.min(referred_p1db);

        let referred_ip3 = stage.ip3_dbm - self.cumulative_gain_db;
        let input_ip3_dbm = combine_intercepts(self.input_ip3_dbm, referred_ip3)?;

        Ok(CascadeNode {
            name: stage.name.clone() + " Output",
            stage_count: self.stage_count + 1,
            cumulative_gain_db: self.cumulative_gain_db + stage.gain_db,
            cumulative_gain_linear: preceding_gain_linear * stage.gain_linear(),
            noise_figure_db,
            input_p1db_dbm,
            input_ip3_dbm,
        })
    }

    pub fn noise_factor(&self) -> f64 {
        rfconversions::noise::noise_factor_from_noise_figure(self.noise_figure_db)
    }

    /// Spurious-free dynamic range, 2/3 slope against the -174 dBm/Hz floor. Unrounded.
    pub fn sfdr_db(&self) -> Result<f64, ComputeError> {
        let span = self.input_ip3_dbm - self.noise_figure_db - THERMAL_NOISE_FLOOR_DBM_PER_HZ;
        ensure_result_finite("spurious-free dynamic range", span * SFDR_SLOPE)
    }
}

/// `1/IP3 = 1/IP3_a + 1/IP3_b`, evaluated in linear milliwatts.
fn combine_intercepts(a_dbm: f64, b_dbm: f64) -> Result<f64, ComputeError> {
    let a_linear = 10.0_f64.powf(a_dbm / 10.0);
    let b_linear = 10.0_f64.powf(b_dbm / 10.0);
    let reciprocal_sum = 1.0 / a_linear + 1.0 / b_linear;
    if !(reciprocal_sum > 0.0) || !reciprocal_sum.is_finite() {
        return Err(ComputeError::domain(
            "cascaded IP3",
            format!(
                "reciprocal sum of {} dBm and {} dBm is {}",
                a_dbm, b_dbm, reciprocal_sum
            ),
        ));
    }
    linear_to_db("cascaded IP3", 1.0 / reciprocal_sum)
}
