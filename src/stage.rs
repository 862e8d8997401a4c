use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::numeric::ensure_finite;

// one element of the signal chain, stage 1 is nearest the input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub gain_db: f64,         // dB, negative for loss
    pub noise_figure_db: f64, // dB, nf would be ambiguous between noise factor and noise figure
    pub p1db_dbm: f64,        // dBm, output 1 dB compression point
    pub ip3_dbm: f64,         // dBm, third-order intercept point
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Stage {{ name: {}, gain: {} dB, noise figure: {} dB, P1dB: {} dBm, IP3: {} dBm }}",
            self.name, self.gain_db, self.noise_figure_db, self.p1db_dbm, self.ip3_dbm
        )
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            gain_db: 0.0,
            noise_figure_db: 0.0,
            p1db_dbm: 0.0,
            ip3_dbm: 0.0,
        }
    }
}

impl Stage {
    pub fn new(
        name: impl Into<String>,
        gain_db: f64,
        noise_figure_db: f64,
        p1db_dbm: f64,
        ip3_dbm: f64,
    ) -> Stage {
        Stage {
            name: name.into(),
            gain_db,
            noise_figure_db,
            p1db_dbm,
            ip3_dbm,
        }
    }

    /// Placeholder stage appended by an editor: `Stage N` with all-zero parameters.
    pub fn placeholder(position: usize) -> Stage {
        Stage {
            name: format!("Stage {}", position),
            ..Stage::default()
        }
    }

    /// Every numeric field must be finite before the stage enters a cascade.
    pub fn validate(&self) -> Result<(), ComputeError> {
        ensure_finite(&format!("{}.gain_db", self.name), self.gain_db)?;
        ensure_finite(
            &format!("{}.noise_figure_db", self.name),
            self.noise_figure_db,
        )?;
        ensure_finite(&format!("{}.p1db_dbm", self.name), self.p1db_dbm)?;
        ensure_finite(&format!("{}.ip3_dbm", self.name), self.ip3_dbm)?;
        Ok(())
    }

    pub fn gain_linear(&self) -> f64 {
        rfconversions::power::db_to_linear(self.gain_db)
    }

    pub fn noise_factor(&self) -> f64 {
        rfconversions::noise::noise_factor_from_noise_figure(self.noise_figure_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default() {
        let stage = Stage::default();
        assert_eq!(stage.gain_db, 0.0);
        assert_eq!(stage.noise_figure_db, 0.0);
        assert_eq!(stage.gain_linear(), 1.0);
        assert_eq!(stage.noise_factor(), 1.0);
    }

    #[test]
    fn placeholder_is_named_by_position() {
        let stage = Stage::placeholder(3);
        assert_eq!(stage.name, "Stage 3");
        assert_eq!(stage.p1db_dbm, 0.0);
        assert_eq!(stage.ip3_dbm, 0.0);
    }

    #[test]
    fn linear_helpers() {
        let lna = Stage::new("LNA", 20.0, 3.0, 10.0, 20.0);
        assert!((lna.gain_linear() - 100.0).abs() < 1e-9);
        // 3 dB is a noise factor of ~2
        assert!((lna.noise_factor() - 1.9953).abs() < 1e-4);
    }

    #[test]
    fn validate_rejects_non_finite_fields() {
        let mut stage = Stage::new("Mixer", -8.0, 8.0, 10.0, 15.0);
        assert!(stage.validate().is_ok());

        stage.ip3_dbm = f64::NAN;
        match stage.validate() {
            Err(ComputeError::InvalidFieldValue { field, .. }) => {
                assert_eq!(field, "Mixer.ip3_dbm");
            }
            other => panic!("expected InvalidFieldValue, got {:?}", other),
        }
    }

    #[test]
    fn display() {
        let stage = Stage::new("LNA", 20.0, 1.5, 10.0, 20.0);
        assert_eq!(
            stage.to_string(),
            "Stage { name: LNA, gain: 20 dB, noise figure: 1.5 dB, P1dB: 10 dBm, IP3: 20 dBm }"
        );
    }
}
