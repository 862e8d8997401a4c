//! Power-unit conversions between dB, dBm and Watts.
//!
//! Each conversion kind is its own record carrying only the fields it needs,
//! and [`Conversion`] tags them so a caller can hold "one of the four". The
//! free functions are the formulas themselves; every one validates its inputs
//! and refuses to hand back NaN or an infinity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::numeric::{ensure_finite, ensure_positive, ensure_result_finite, linear_to_db};

/// Apply a relative level in dB to an absolute reference in dBm.
///
/// This is a plain offset (`db + reference_dbm`), not a unit conversion.
pub fn db_to_dbm(db: f64, reference_dbm: f64) -> Result<f64, ComputeError> {
    let db = ensure_finite("db", db)?;
    let reference_dbm = ensure_finite("reference_dbm", reference_dbm)?;
    ensure_result_finite("dB to dBm", db + reference_dbm)
}

/// `10^((dBm - 30) / 10)`
pub fn dbm_to_watts(dbm: f64) -> Result<f64, ComputeError> {
    let dbm = ensure_finite("dbm", dbm)?;
    ensure_result_finite("dBm to Watts", 10.0_f64.powf((dbm - 30.0) / 10.0))
}

/// `10·log10(watts × 1000)`, defined for positive power only.
pub fn watts_to_dbm(watts: f64) -> Result<f64, ComputeError> {
    let watts = ensure_finite("watts", watts)?;
    let watts = ensure_positive("Watts to dBm", "watts", watts)?;
    ensure_result_finite("Watts to dBm", rfconversions::power::watts_to_dbm(watts))
}

/// `10·log10(watts / reference_watts)`, defined when both powers are positive.
pub fn watts_to_db(watts: f64, reference_watts: f64) -> Result<f64, ComputeError> {
    let watts = ensure_finite("watts", watts)?;
    let reference_watts = ensure_finite("reference_watts", reference_watts)?;
    let watts = ensure_positive("Watts to dB", "watts", watts)?;
    let reference_watts = ensure_positive("Watts to dB", "reference_watts", reference_watts)?;
    linear_to_db("Watts to dB", watts / reference_watts)
}

/// A conversion input that knows how to evaluate itself.
pub trait Convert {
    fn convert(&self) -> Result<f64, ComputeError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DbToDbm {
    pub db: f64,
    pub reference_dbm: f64,
}

impl Convert for DbToDbm {
    fn convert(&self) -> Result<f64, ComputeError> {
        db_to_dbm(self.db, self.reference_dbm)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DbmToWatts {
    pub dbm: f64,
}

impl Convert for DbmToWatts {
    fn convert(&self) -> Result<f64, ComputeError> {
        dbm_to_watts(self.dbm)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WattsToDbm {
    pub watts: f64,
}

impl Default for WattsToDbm {
    fn default() -> Self {
        Self { watts: 0.001 } // 1 mW, 0 dBm
    }
}

impl Convert for WattsToDbm {
    fn convert(&self) -> Result<f64, ComputeError> {
        watts_to_dbm(self.watts)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WattsToDb {
    pub watts: f64,
    pub reference_watts: f64,
}

impl Default for WattsToDb {
    fn default() -> Self {
        Self {
            watts: 0.001,
            reference_watts: 0.001,
        }
    }
}

impl Convert for WattsToDb {
    fn convert(&self) -> Result<f64, ComputeError> {
        watts_to_db(self.watts, self.reference_watts)
    }
}

/// One of the four conversion kinds together with its inputs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conversion {
    DbToDbm(DbToDbm),
    DbmToWatts(DbmToWatts),
    WattsToDbm(WattsToDbm),
    WattsToDb(WattsToDb),
}

impl Conversion {
    /// Unit the result is expressed in.
    pub fn result_unit(&self) -> &'static str {
        match self {
            Conversion::DbToDbm(_) | Conversion::WattsToDbm(_) => "dBm",
            Conversion::DbmToWatts(_) => "W",
            Conversion::WattsToDb(_) => "dB",
        }
    }
}

impl Convert for Conversion {
    fn convert(&self) -> Result<f64, ComputeError> {
        match self {
            Conversion::DbToDbm(input) => input.convert(),
            Conversion::DbmToWatts(input) => input.convert(),
            Conversion::WattsToDbm(input) => input.convert(),
            Conversion::WattsToDb(input) => input.convert(),
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Conversion::DbToDbm(c) => write!(f, "{} dB + {} dBm", c.db, c.reference_dbm),
            Conversion::DbmToWatts(c) => write!(f, "{} dBm", c.dbm),
            Conversion::WattsToDbm(c) => write!(f, "{} W", c.watts),
            Conversion::WattsToDb(c) => write!(f, "{} W / {} W", c.watts, c.reference_watts),
        }
    }
}

/// Evaluate a single conversion.
pub fn compute_conversion(conversion: &Conversion) -> Result<f64, ComputeError> {
    conversion.convert()
}

/// A conversion input paired with the result derived from it.
///
/// The result is recomputed on every change of the input, so the two never
/// disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct Converted<T> {
    input: T,
    result: Result<f64, ComputeError>,
}

impl<T: Convert> Converted<T> {
    pub fn new(input: T) -> Self {
        let result = input.convert();
        Self { input, result }
    }

    pub fn input(&self) -> &T {
        &self.input
    }

    pub fn result(&self) -> Result<f64, ComputeError> {
        self.result.clone()
    }

    pub fn set(&mut self, input: T) {
        self.result = input.convert();
        self.input = input;
    }
}

impl<T: Convert + Default> Default for Converted<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// The four independent conversion states.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerConversions {
    pub db_to_dbm: Converted<DbToDbm>,
    pub dbm_to_watts: Converted<DbmToWatts>,
    pub watts_to_dbm: Converted<WattsToDbm>,
    pub watts_to_db: Converted<WattsToDb>,
}

impl PowerConversions {
    /// Replace the inputs of one kind and recompute only that kind.
    pub fn set(&mut self, conversion: Conversion) -> Result<f64, ComputeError> {
        match conversion {
            Conversion::DbToDbm(input) => {
                self.db_to_dbm.set(input);
                self.db_to_dbm.result()
            }
            Conversion::DbmToWatts(input) => {
                self.dbm_to_watts.set(input);
                self.dbm_to_watts.result()
            }
            Conversion::WattsToDbm(input) => {
                self.watts_to_dbm.set(input);
                self.watts_to_dbm.result()
            }
            Conversion::WattsToDb(input) => {
                self.watts_to_db.set(input);
                self.watts_to_db.result()
            }
        }
    }
}

/// Format a power in Watts with the prefix that keeps it readable: W, mW or µW.
pub fn format_watts(watts: f64) -> String {
    if watts >= 1.0 {
        format!("{:.6} W", watts)
    } else if watts >= 0.001 {
        format!("{:.3} mW", watts * 1e3)
    } else {
        format!("{:.3} µW", watts * 1e6)
    }
}
