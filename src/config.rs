use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use derive_more::Display;
use serde::Serialize;

use crate::error::SearchError;
use crate::structures::ElementId;

/// Instance family the objective runs on.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureType {
    #[display("graph")]
    Graph,
    #[display("k-medoid")]
    KMedoid,
}

/// The concrete objective within the family.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreFunction {
    #[display("negative-group-farness")]
    NegativeGroupFarness,
    #[display("partial-dominating-set")]
    PartialDominatingSet,
    #[display("euclidian-distance")]
    EuclidianDistance,
}

/// How the partitioned-block bound maximizes over block selections.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, ValueEnum, Serialize)]
pub enum PbfAlgorithm {
    #[value(name = "brute")]
    #[serde(rename = "brute-force")]
    #[display("brute-force")]
    BruteForce,
    #[value(name = "dp")]
    #[serde(rename = "dynamic")]
    #[display("dynamic")]
    Dynamic,
}

/// Everything the search needs to know, parsed once and read-only afterwards.
///
/// The boolean bound switches default to on; pass e.g. `--enable-pbf false`
/// to turn one off.
#[derive(Clone, Debug, Parser, Serialize)]
#[command(
    name = "submax",
    about = "Exact submodular maximization under a cardinality constraint"
)]
pub struct AlgorithmConfiguration {
    /// Instance family: graph or k-medoid.
    #[arg(long, value_enum)]
    #[serde(rename = "structure_type")]
    pub structure: StructureType,

    /// Objective within the family.
    #[arg(long, value_enum)]
    #[serde(rename = "score_function")]
    pub score: ScoreFunction,

    /// Target set size.
    #[arg(long)]
    pub k: usize,

    /// Instance file (edge list or data points).
    #[arg(long)]
    #[serde(rename = "input_file_path")]
    pub input: PathBuf,

    /// JSON file seeding the incumbent, `{"s": [ids...]}`.
    #[arg(long)]
    #[serde(rename = "initial_solution_file_path")]
    pub initial: Option<PathBuf>,

    /// Width bound: f(S) + remaining * best single gain.
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true", action = clap::ArgAction::Set)]
    #[serde(rename = "enable_UB1")]
    pub enable_ub1: bool,

    /// Partial-sum bound over the sorted-accurate prefix.
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true", action = clap::ArgAction::Set)]
    #[serde(rename = "enable_UB2")]
    pub enable_ub2: bool,

    /// Partitioned-block bound, the tightest and most expensive.
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true", action = clap::ArgAction::Set)]
    #[serde(rename = "enable_PBF")]
    pub enable_pbf: bool,

    /// Block-selection maximizer used by the PBF bound.
    #[arg(long = "pbf-algo", value_enum, default_value = "dp")]
    pub pbf_algorithm: PbfAlgorithm,

    /// Candidates per PBF block.
    #[arg(long = "pbf-block", default_value_t = 4)]
    pub pbf_block_size: usize,

    /// Wall-clock budget in seconds; unlimited when absent.
    #[arg(long = "time-limit")]
    pub time_limit_seconds: Option<f64>,

    /// Score-function evaluation budget; unlimited when absent.
    #[arg(long = "max-evals")]
    pub max_sf_evaluations: Option<u64>,

    /// Result destination; stdout when absent.
    #[arg(long)]
    #[serde(rename = "output_path")]
    pub output: Option<PathBuf>,
}

impl AlgorithmConfiguration {
    /// Checks everything that does not need the instance.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.k == 0 {
            return Err(SearchError::ZeroK);
        }
        if self.pbf_block_size == 0 {
            return Err(SearchError::ZeroPbfBlock);
        }
        Ok(())
    }

    /// Checks the instance-dependent precondition `k <= n`.
    pub fn validate_against_instance(&self, n: usize) -> Result<(), SearchError> {
        if n < self.k {
            return Err(SearchError::NotEnoughElements { n, k: self.k });
        }
        Ok(())
    }
}

/// Reads an initial solution file, `{"s": [ids...]}`.
///
/// The reader tolerates arbitrary whitespace, braces and brackets: everything
/// but the `"s":` key and the comma-separated ids is stripped before parsing.
/// Ids come back sorted ascending.
pub fn read_initial_solution(path: &Path) -> Result<Vec<ElementId>, SearchError> {
    let content = std::fs::read_to_string(path).map_err(|source| SearchError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let stripped: String = content
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}' && *c != '[' && *c != ']')
        .collect();

    // left with '"s":x_1,x_2,...,x_n'
    let values = stripped
        .split_once(':')
        .map(|(_, v)| v)
        .ok_or_else(|| SearchError::InvalidInitialSolution {
            path: path.to_path_buf(),
            reason: "no ':' separator found".to_string(),
        })?;

    let mut s = Vec::new();
    for part in values.split(',').filter(|p| !p.is_empty()) {
        let id: ElementId =
            part.parse()
                .map_err(|_| SearchError::InvalidInitialSolution {
                    path: path.to_path_buf(),
                    reason: format!("'{part}' is not an element id"),
                })?;
        s.push(id);
    }
    s.sort_unstable();

    Ok(s)
}

/// Validates a seed solution against the instance at hand.
pub fn check_initial_solution(
    s: &[ElementId],
    n: usize,
    k: usize,
    path: &Path,
) -> Result<(), SearchError> {
    let invalid = |reason: String| SearchError::InvalidInitialSolution {
        path: path.to_path_buf(),
        reason,
    };

    if s.len() != k {
        return Err(invalid(format!("holds {} ids, expected k = {k}", s.len())));
    }
    if s.windows(2).any(|w| w[0] == w[1]) {
        return Err(invalid("holds duplicate ids".to_string()));
    }
    if let Some(&out) = s.iter().find(|&&c| c as usize >= n) {
        return Err(invalid(format!("id {out} is outside [0, {n})")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn initial_solution_plain() {
        let p = write_tmp("submax_init_plain.json", r#"{"s": [3, 1, 2]}"#);
        assert_eq!(read_initial_solution(&p).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn initial_solution_messy_whitespace() {
        let p = write_tmp(
            "submax_init_messy.json",
            "{\n  \"s\" :\n [ 5,\n   0 ,9 ]\n}\n",
        );
        assert_eq!(read_initial_solution(&p).unwrap(), vec![0, 5, 9]);
    }

    #[test]
    fn initial_solution_rejects_garbage() {
        let p = write_tmp("submax_init_bad.json", r#"{"s": [1, x]}"#);
        assert!(read_initial_solution(&p).is_err());
    }

    #[test]
    fn initial_solution_checks() {
        let p = PathBuf::from("unused");
        assert!(check_initial_solution(&[0, 1, 2], 5, 3, &p).is_ok());
        assert!(check_initial_solution(&[0, 1], 5, 3, &p).is_err());
        assert!(check_initial_solution(&[0, 1, 1], 5, 3, &p).is_err());
        assert!(check_initial_solution(&[0, 1, 7], 5, 3, &p).is_err());
    }

    #[test]
    fn cli_defaults() {
        let ac = AlgorithmConfiguration::parse_from([
            "submax",
            "--structure",
            "graph",
            "--score",
            "partial-dominating-set",
            "--k",
            "2",
            "--input",
            "g.edges",
        ]);
        assert!(ac.enable_ub1 && ac.enable_ub2 && ac.enable_pbf);
        assert_eq!(ac.pbf_algorithm, PbfAlgorithm::Dynamic);
        assert_eq!(ac.pbf_block_size, 4);
        assert!(ac.time_limit_seconds.is_none());
        assert!(ac.validate().is_ok());
    }

    #[test]
    fn cli_disable_bounds() {
        let ac = AlgorithmConfiguration::parse_from([
            "submax",
            "--structure",
            "k-medoid",
            "--score",
            "euclidian-distance",
            "--k",
            "4",
            "--input",
            "points.txt",
            "--enable-pbf",
            "false",
            "--pbf-algo",
            "brute",
        ]);
        assert!(!ac.enable_pbf);
        assert_eq!(ac.pbf_algorithm, PbfAlgorithm::BruteForce);
    }

    #[test]
    fn validation_rejects_zero_k() {
        let ac = AlgorithmConfiguration::parse_from([
            "submax",
            "--structure",
            "graph",
            "--score",
            "negative-group-farness",
            "--k",
            "0",
            "--input",
            "g.edges",
        ]);
        assert!(matches!(ac.validate(), Err(SearchError::ZeroK)));
    }
}
