//! README example: 4. Convert Between dB, dBm and Watts

use rfcascade::{
    compute_conversion, db_to_dbm, dbm_to_watts, watts_to_db, watts_to_dbm, ComputeError,
    Conversion, DbToDbm, WattsToDbm,
};

#[test]
fn power_conversion_functions() {
    assert_eq!(db_to_dbm(3.0, 10.0).unwrap(), 13.0);
    assert!((dbm_to_watts(30.0).unwrap() - 1.0).abs() < 1e-12);
    assert!((watts_to_dbm(0.5).unwrap() - 26.9897).abs() < 1e-4);
    assert!((watts_to_db(10.0, 0.1).unwrap() - 20.0).abs() < 1e-12);
}

#[test]
fn power_conversion_tagged() {
    let conversion = Conversion::DbToDbm(DbToDbm {
        db: -3.0,
        reference_dbm: 20.0,
    });
    assert_eq!(compute_conversion(&conversion).unwrap(), 17.0);
}

#[test]
fn power_conversion_domain_errors() {
    let zero_watts = Conversion::WattsToDbm(WattsToDbm { watts: 0.0 });
    assert!(matches!(
        compute_conversion(&zero_watts),
        Err(ComputeError::NumericDomain { .. })
    ));
    assert!(watts_to_db(-1.0, 1.0).is_err());
    assert!(watts_to_db(1.0, -1.0).is_err());
}
