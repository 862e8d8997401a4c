//! README example: 6. Export a Report
#![cfg(feature = "report")]

use rfcascade::report::render_html;
use rfcascade::{Error, Stage, Workbench};

#[test]
fn report_requires_calculation() {
    let workbench = Workbench::with_stages(vec![Stage::new("LNA", 20.0, 1.5, 10.0, 20.0)]);
    assert!(matches!(render_html(&workbench), Err(Error::NotComputed)));
}

#[test]
fn report_after_calculation() {
    let mut workbench = Workbench::with_stages(vec![
        Stage::new("LNA", 20.0, 1.5, 10.0, 20.0),
        Stage::new("Mixer", -8.0, 8.0, 10.0, 15.0),
    ]);
    workbench.calculate().unwrap();
    let snapshot = workbench.clone();

    let html = render_html(&workbench).unwrap();
    assert!(html.contains("<h2>Input Stages</h2>"));
    assert!(html.contains("<h2>Calculated Results</h2>"));
    assert!(html.contains("<h2>Power Conversions</h2>"));
    assert!(html.contains("Stage 1: 20 dB + Stage 2: -8 dB = 12.00 dB"));

    // exporting never touches the workbench
    assert_eq!(workbench, snapshot);
}
