use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::cascade::CascadeResult;
use crate::constants::THERMAL_NOISE_FLOOR_DBM_PER_HZ;
use crate::conversion::{format_watts, PowerConversions};
use crate::error::{ComputeError, Error, Result};
use crate::stage::Stage;
use crate::workbench::Workbench;

/// Render the workbench as a standalone HTML document.
///
/// Refuses with [`Error::NotComputed`] until the workbench holds a cascade
/// result. The workbench is only read.
pub fn render_html(workbench: &Workbench) -> Result<String> {
    let result = workbench.result().ok_or(Error::NotComputed)?;
    let mut html = String::new();

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html>")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<title>RF Cascade Results</title>")?;
    writeln!(html, "<style>")?;
    writeln!(html, "table {{ border-collapse: collapse; }}")?;
    writeln!(html, ".stages {{ width: 100%; }}")?;
    writeln!(html, ".results {{ width: auto; }}")?;
    writeln!(html, ".results td:nth-child(2) {{ text-align: right; }}")?;
    writeln!(html, ".stale {{ color: #a94442; }}")?;
    writeln!(
        html,
        "th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}"
    )?;
    writeln!(html, "th {{ background-color: #f2f2f2; }}")?;
    writeln!(html, "tr:nth-child(even) {{ background-color: #f9f9f9; }}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "<h1>RF Cascade Results</h1>")?;
    if !workbench.result_is_current() {
        writeln!(
            html,
            "<p class=\"stale\"><b>Note:</b> the stages were edited after the last calculation, results below are from that calculation.</p>"
        )?;
    }

    write_stages(&mut html, workbench)?;
    write_results(&mut html, result)?;
    write_conversions(&mut html, workbench.conversions())?;
    write_detailed_calculations(&mut html, workbench.stages(), result)?;

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

/// Render the report and write it to `output_path`.
pub fn generate_html_report(workbench: &Workbench, output_path: &Path) -> Result<()> {
    let html = render_html(workbench)?;
    fs::write(output_path, html).map_err(|source| Error::Io {
        path: output_path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %output_path.display(), "wrote cascade report");
    Ok(())
}

fn write_stages(html: &mut String, workbench: &Workbench) -> std::fmt::Result {
    writeln!(html, "<h2>Input Stages</h2>")?;
    writeln!(html, "<table class=\"stages\">")?;
    writeln!(html, "<tr>")?;
    for header in [
        "Stage",
        "Name",
        "Gain (dB)",
        "NF (dB)",
        "P1dB (dBm)",
        "IP3 (dBm)",
        "Cumulative Gain (dB)",
        "Cumulative NF (dB)",
    ] {
        writeln!(html, "<th>{}</th>", header)?;
    }
    writeln!(html, "</tr>")?;

    // the stages may have been edited into an invalid state after calculating
    let (lineup, lineup_error) = match workbench.lineup() {
        Ok(lineup) => (lineup, None),
        Err(err) => (Vec::new(), Some(err)),
    };
    for (i, stage) in workbench.stages().iter().enumerate() {
        writeln!(html, "<tr>")?;
        writeln!(html, "<td>{}</td>", i + 1)?;
        writeln!(html, "<td>{}</td>", escape_html(&stage.name))?;
        writeln!(html, "<td>{}</td>", stage.gain_db)?;
        writeln!(html, "<td>{}</td>", stage.noise_figure_db)?;
        writeln!(html, "<td>{}</td>", stage.p1db_dbm)?;
        writeln!(html, "<td>{}</td>", stage.ip3_dbm)?;
        match lineup.get(i) {
            Some(node) => {
                writeln!(html, "<td>{:.2}</td>", node.cumulative_gain_db)?;
                writeln!(html, "<td>{:.2}</td>", node.noise_figure_db)?;
            }
            None => {
                writeln!(html, "<td>-</td>")?;
                writeln!(html, "<td>-</td>")?;
            }
        }
        writeln!(html, "</tr>")?;
    }
    writeln!(html, "</table>")?;
    if let Some(err) = lineup_error {
        writeln!(
            html,
            "<p class=\"stale\">Cumulative values undefined ({})</p>",
            escape_html(&err.to_string())
        )?;
    }
    writeln!(html, "<br>")
}

fn write_results(html: &mut String, result: &CascadeResult) -> std::fmt::Result {
    writeln!(html, "<h2>Calculated Results</h2>")?;
    writeln!(html, "<table class=\"results\">")?;
    let rows = [
        ("Total Gain", result.total_gain_db, "dB"),
        ("Cascaded Noise Figure", result.total_noise_figure_db, "dB"),
        ("Cascaded P1dB (input-referred)", result.total_p1db_dbm, "dBm"),
        ("Cascaded IP3 (input-referred)", result.total_ip3_dbm, "dBm"),
        ("SFDR (2/3 slope)", result.sfdr_db, "dB"),
    ];
    for (label, value, unit) in rows {
        writeln!(
            html,
            "<tr><th>{}</th><td>{:.2}</td><td>{}</td></tr>",
            label, value, unit
        )?;
    }
    writeln!(html, "</table>")?;
    writeln!(html, "<br>")
}

fn write_conversions(html: &mut String, conversions: &PowerConversions) -> std::fmt::Result {
    writeln!(html, "<h2>Power Conversions</h2>")?;
    writeln!(html, "<ul>")?;

    let db_to_dbm = conversions.db_to_dbm.input();
    writeln!(
        html,
        "<li><b>dB to dBm:</b> {} dB + {} dBm = {}</li>",
        db_to_dbm.db,
        db_to_dbm.reference_dbm,
        outcome(conversions.db_to_dbm.result(), |v| format!("{:.2} dBm", v))
    )?;

    let dbm_to_watts = conversions.dbm_to_watts.input();
    writeln!(
        html,
        "<li><b>dBm to Watts:</b> {} dBm = {}</li>",
        dbm_to_watts.dbm,
        outcome(conversions.dbm_to_watts.result(), format_watts)
    )?;

    let watts_to_dbm = conversions.watts_to_dbm.input();
    writeln!(
        html,
        "<li><b>Watts to dBm:</b> {} W = {}</li>",
        watts_to_dbm.watts,
        outcome(conversions.watts_to_dbm.result(), |v| format!("{:.2} dBm", v))
    )?;

    let watts_to_db = conversions.watts_to_db.input();
    writeln!(
        html,
        "<li><b>Watts to dB:</b> {} W / {} W = {}</li>",
        watts_to_db.watts,
        watts_to_db.reference_watts,
        outcome(conversions.watts_to_db.result(), |v| format!("{:.2} dB", v))
    )?;

    writeln!(html, "</ul>")
}

fn write_detailed_calculations(
    html: &mut String,
    stages: &[Stage],
    result: &CascadeResult,
) -> std::fmt::Result {
    writeln!(html, "<h2>Detailed Calculations</h2>")?;

    writeln!(html, "<h3>1. Total Gain Calculation</h3>")?;
    writeln!(html, "<p>{}</p>", gain_sum_expression(stages, result))?;

    writeln!(html, "<h3>2. Cascaded Noise Figure (Friis Formula)</h3>")?;
    writeln!(
        html,
        "<p>F_total = F1 + (F2-1)/G1 + (F3-1)/(G1*G2) + ...</p>"
    )?;
    writeln!(html, "<p>Result: {:.2} dB</p>", result.total_noise_figure_db)?;

    writeln!(html, "<h3>3. Cascaded P1dB Calculation</h3>")?;
    writeln!(html, "<p>Minimum of all stages referred to input</p>")?;
    writeln!(html, "<p>Result: {:.2} dBm</p>", result.total_p1db_dbm)?;

    writeln!(html, "<h3>4. Cascaded IP3 Calculation</h3>")?;
    writeln!(html, "<p>1/IP3_total = 1/IP3_1 + 1/(IP3_2/G1) + ...</p>")?;
    writeln!(html, "<p>Result: {:.2} dBm</p>", result.total_ip3_dbm)?;

    writeln!(html, "<h3>5. SFDR Calculation</h3>")?;
    writeln!(html, "<p>SFDR = (2/3) * (IP3 - NF - kTB)</p>")?;
    writeln!(
        html,
        "<p>SFDR = (2/3) * ({:.2} - {:.2} - ({}))</p>",
        result.total_ip3_dbm, result.total_noise_figure_db, THERMAL_NOISE_FLOOR_DBM_PER_HZ
    )?;
    writeln!(html, "<p>Result: {:.2} dB</p>", result.sfdr_db)
}

/// `Stage 1: 20 dB + Stage 2: -8 dB = 12.00 dB`
pub fn gain_sum_expression(stages: &[Stage], result: &CascadeResult) -> String {
    let terms: Vec<String> = stages
        .iter()
        .enumerate()
        .map(|(i, stage)| format!("Stage {}: {} dB", i + 1, stage.gain_db))
        .collect();
    format!("{} = {:.2} dB", terms.join(" + "), result.total_gain_db)
}

fn outcome(
    result: std::result::Result<f64, ComputeError>,
    format_value: impl Fn(f64) -> String,
) -> String {
    match result {
        Ok(value) => format_value(value),
        Err(err) => format!("undefined ({})", escape_html(&err.to_string())),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
