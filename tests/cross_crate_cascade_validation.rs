//! Cross-crate validation: rfcascade's Friis noise figure vs rfconversions.
//!
//! These tests verify that the cascaded noise figure produced by walking the
//! stage lineup is consistent with rfconversions' standalone
//! `cascade_noise_figure` function.

use rfcascade::{cascade_nodes, compute_cascade, Stage};
use rfconversions::noise::cascade_noise_figure;

/// Helper: assert float equality within tolerance
fn assert_approx(actual: f64, expected: f64, tol: f64, msg: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{msg}: expected {expected:.4}, got {actual:.4} (diff {:.6})",
        (actual - expected).abs()
    );
}

/// Build rfconversions stage tuples from parallel NF/gain arrays.
fn stage_tuples(nfs: &[f64], gains: &[f64]) -> Vec<(f64, f64)> {
    nfs.iter().zip(gains.iter()).map(|(&n, &g)| (n, g)).collect()
}

fn chain(names: &[&str], nfs: &[f64], gains: &[f64]) -> Vec<Stage> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Stage::new(*name, gains[i], nfs[i], 30.0, 40.0))
        .collect()
}

#[test]
fn two_stage_lna_mixer_nf_consistency() {
    let nfs = [1.5, 8.0];
    let gains = [25.0, -6.0];
    let stages = chain(&["LNA", "Mixer"], &nfs, &gains);

    let output = cascade_nodes(&stages).unwrap().pop().unwrap();
    let expected_nf = cascade_noise_figure(&stage_tuples(&nfs, &gains));

    assert_approx(output.noise_figure_db, expected_nf, 0.01, "Two-stage cascade NF");
}

/// Four-stage satellite receive chain: LNA → BPF → Mixer → IF Amp.
#[test]
fn four_stage_rx_chain_nf() {
    let nfs = [1.2, 0.5, 7.0, 3.0];
    let gains = [30.0, -0.5, -6.0, 20.0];
    let stages = chain(&["LNA", "BPF", "Mixer", "IF Amp"], &nfs, &gains);

    let output = cascade_nodes(&stages).unwrap().pop().unwrap();
    let expected_nf = cascade_noise_figure(&stage_tuples(&nfs, &gains));

    assert_approx(output.noise_figure_db, expected_nf, 0.01, "Four-stage cascade NF");
}

/// Lossy front end: low first-stage gain makes later stages count.
#[test]
fn lossy_front_end_nf() {
    let nfs = [3.0, 2.0, 10.0];
    let gains = [-3.0, 12.0, -10.0];
    let stages = chain(&["Cable", "Amp", "Mixer"], &nfs, &gains);

    let result = compute_cascade(&stages).unwrap();
    let expected_nf = cascade_noise_figure(&stage_tuples(&nfs, &gains));

    assert_approx(result.total_noise_figure_db, expected_nf, 0.01, "Lossy front end NF");
}

/// Every node in the lineup matches the Friis result for its prefix.
#[test]
fn lineup_prefixes_match_friis() {
    let nfs = [0.8, 1.0, 9.0, 4.0];
    let gains = [18.0, -1.0, -7.0, 22.0];
    let stages = chain(&["LNA", "Filter", "Mixer", "IF Amp"], &nfs, &gains);

    let nodes = cascade_nodes(&stages).unwrap();
    for n in 1..=4 {
        let expected_nf = cascade_noise_figure(&stage_tuples(&nfs[..n], &gains[..n]));
        assert_approx(
            nodes[n - 1].noise_figure_db,
            expected_nf,
            0.01,
            &format!("NF after stage {n}"),
        );
    }
}
