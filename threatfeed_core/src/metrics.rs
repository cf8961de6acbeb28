use crate::RowBatch;
use serde::Serialize;

/// Headline numbers and chart series for the incident dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IncidentMetrics {
    pub total: usize,
    pub open: usize,
    pub critical: usize,
    pub resolved: usize,
    pub by_category: Vec<(String, usize)>,
    pub by_severity: Vec<(String, usize)>,
}

impl IncidentMetrics {
    pub fn from_batch(incidents: &RowBatch) -> Self {
        Self {
            total: incidents.len(),
            open: incidents.count_equal("status", "Open"),
            critical: incidents.count_equal("severity", "Critical"),
            resolved: incidents.count_equal("status", "Resolved"),
            by_category: incidents.value_counts("category"),
            by_severity: incidents.value_counts("severity"),
        }
    }

    /// Share of each severity as a fraction of the counted incidents.
    pub fn severity_shares(&self) -> Vec<(String, f64)> {
        let counted: usize = self.by_severity.iter().map(|(_, count)| count).sum();
        if counted == 0 {
            return Vec::new();
        }
        self.by_severity
            .iter()
            .map(|(severity, count)| (severity.clone(), *count as f64 / counted as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn incidents(rows: &[(&str, &str, &str)]) -> RowBatch {
        let mut batch = RowBatch::new(vec![
            "category".to_string(),
            "severity".to_string(),
            "status".to_string(),
        ]);
        for (category, severity, status) in rows {
            batch.push_row(vec![
                Value::from(*category),
                Value::from(*severity),
                Value::from(*status),
            ]);
        }
        batch
    }

    #[test]
    fn test_metrics_counts() {
        let metrics = IncidentMetrics::from_batch(&incidents(&[
            ("Phishing", "Critical", "Open"),
            ("Phishing", "High", "Resolved"),
            ("Malware", "Critical", "Open"),
            ("DDoS", "Low", "Closed"),
        ]));

        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.open, 2);
        assert_eq!(metrics.critical, 2);
        assert_eq!(metrics.resolved, 1);
        assert_eq!(
            metrics.by_category,
            [
                ("Phishing".to_string(), 2),
                ("DDoS".to_string(), 1),
                ("Malware".to_string(), 1)
            ]
        );

        let shares = metrics.severity_shares();
        assert_eq!(shares[0], ("Critical".to_string(), 0.5));
        assert_eq!(shares.len(), 3);
    }

    #[test]
    fn test_metrics_empty_and_missing_columns() {
        let metrics = IncidentMetrics::from_batch(&RowBatch::new(vec!["id".to_string()]));
        assert_eq!(metrics, IncidentMetrics::default());
        assert!(metrics.severity_shares().is_empty());
    }
}
