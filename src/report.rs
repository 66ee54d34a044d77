use std::io::Write;

use serde::Serialize;

use crate::config::AlgorithmConfiguration;
use crate::error::SearchError;
use crate::structures::ElementId;

/// The JSON object a run prints, whether it finished or ran out of budget.
///
/// `best_score` is `null` when the budget died before any size-k set was
/// scored.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub best_score: Option<f64>,
    pub best_set: Vec<ElementId>,
    pub k: usize,
    pub n: usize,
    pub sf_evaluations: u64,
    pub elapsed_seconds: f64,
    pub timed_out: bool,
    pub configuration: AlgorithmConfiguration,
}

/// Six decimals is plenty for score improvements.
#[must_use]
pub fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

impl SearchReport {
    pub fn write_to(&self, mut out: impl Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        writeln!(out, "{json}")
    }

    /// Writes to the configured output path, or stdout when none is set.
    pub fn emit(&self) -> Result<(), SearchError> {
        match &self.configuration.output {
            Some(path) => {
                let file =
                    std::fs::File::create(path).map_err(|source| SearchError::UnwritableOutput {
                        path: path.clone(),
                        source,
                    })?;
                self.write_to(file)
                    .map_err(|source| SearchError::UnwritableOutput {
                        path: path.clone(),
                        source,
                    })
            }
            None => self
                .write_to(std::io::stdout().lock())
                .map_err(|source| SearchError::UnwritableOutput {
                    path: "<stdout>".into(),
                    source,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn rounding() {
        assert_eq!(round6(1.234_567_89), 1.234_568);
        assert_eq!(round6(-2.0), -2.0);
        assert_eq!(round6(0.000_000_4), 0.0);
    }

    #[test]
    fn report_serializes_with_config_echo() {
        let configuration = AlgorithmConfiguration::parse_from([
            "submax",
            "--structure",
            "graph",
            "--score",
            "negative-group-farness",
            "--k",
            "2",
            "--input",
            "g.edges",
        ]);
        let report = SearchReport {
            best_score: Some(-2.0),
            best_set: vec![0, 1],
            k: 2,
            n: 3,
            sf_evaluations: 17,
            elapsed_seconds: 0.001,
            timed_out: false,
            configuration,
        };

        let v: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(v["best_score"], -2.0);
        assert_eq!(v["best_set"], serde_json::json!([0, 1]));
        assert_eq!(v["configuration"]["structure_type"], "graph");
        assert_eq!(v["configuration"]["enable_UB1"], true);
        assert_eq!(v["configuration"]["pbf_algorithm"], "dynamic");
    }
}
