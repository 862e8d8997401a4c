/// Thermal noise floor (kTB at 290 K in a 1 Hz bandwidth), dBm/Hz.
pub const THERMAL_NOISE_FLOOR_DBM_PER_HZ: f64 = -174.0;

/// Slope applied to the IP3-to-noise-floor span for spurious-free dynamic range.
pub const SFDR_SLOPE: f64 = 2.0 / 3.0;

/// Decimal places every cascade output is rounded to.
pub const DISPLAY_DECIMALS: i32 = 2;
