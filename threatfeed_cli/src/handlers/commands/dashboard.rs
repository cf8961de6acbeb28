use tabled::{builder::Builder, settings::Style};
use threatfeed_core::{Connection, IncidentMetrics};

use crate::{output::graphical::bar_chart, CLIErr};

const SHARE_BAR_WIDTH: usize = 40;

pub fn handle_dashboard_command(connection: &Connection) -> Result<(), CLIErr> {
    let metrics = IncidentMetrics::from_batch(&connection.get_all_incidents()?);

    let mut table = Builder::from(vec![
        vec![
            "Total Incidents".to_string(),
            "Active / Open".to_string(),
            "Critical Threats".to_string(),
            "Resolved".to_string(),
        ],
        vec![
            metrics.total.to_string(),
            metrics.open.to_string(),
            metrics.critical.to_string(),
            metrics.resolved.to_string(),
        ],
    ])
    .build();
    table.with(Style::modern_rounded());
    println!("{}", table);

    if metrics.total == 0 {
        println!("No incidents recorded yet.");
        return Ok(());
    }

    println!("\nIncidents by Category");
    bar_chart(&metrics.by_category);

    println!("\nSeverity Distribution");
    for line in share_lines(&metrics.severity_shares()) {
        println!("{}", line);
    }
    Ok(())
}

fn share_lines(shares: &[(String, f64)]) -> Vec<String> {
    let label_width = shares.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let bar_width = SHARE_BAR_WIDTH;
    shares
        .iter()
        .map(|(label, share)| {
            let filled = (share * bar_width as f64).round() as usize;
            format!(
                "{:<label_width$}  {:<bar_width$}  {:>5.1}%",
                label,
                "#".repeat(filled),
                share * 100.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_lines() {
        let lines = share_lines(&[("Critical".to_string(), 0.5), ("Low".to_string(), 0.25)]);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Critical  ####"));
        assert!(lines[0].ends_with(" 50.0%"));
        assert!(lines[1].starts_with("Low       ##########  "));
        assert!(lines[1].ends_with(" 25.0%"));
        assert!(share_lines(&[]).is_empty());
    }
}
