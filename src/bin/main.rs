use clap::Parser;

use submax::algorithms::tree_search::TreeSearchIterative;
use submax::config::AlgorithmConfiguration;
use submax::config::ScoreFunction;
use submax::config::StructureType;
use submax::config::check_initial_solution;
use submax::config::read_initial_solution;
use submax::error::SearchError;
use submax::report::SearchReport;
use submax::report::round6;
use submax::score::Score;
use submax::structures::ElementId;
use submax::structures::ScoreStructure;
use submax::structures::dominating_set::GraphPartialDominatingSet;
use submax::structures::group_farness::GraphNegativeGroupFarness;
use submax::structures::k_medoid::EuclidianKMedoid;

fn main() {
    let ac = AlgorithmConfiguration::parse();

    match run(ac) {
        Ok(()) => {}
        Err(e) => {
            println!("{}", e.to_json());
            std::process::exit(1);
        }
    }
}

fn run(ac: AlgorithmConfiguration) -> Result<(), SearchError> {
    ac.validate()?;

    let report = match (ac.structure, ac.score) {
        (StructureType::Graph, ScoreFunction::NegativeGroupFarness) => {
            let mut g = GraphNegativeGroupFarness::from_path(&ac.input)?;
            search_on(&mut g, ac)?
        }
        (StructureType::Graph, ScoreFunction::PartialDominatingSet) => {
            let mut g = GraphPartialDominatingSet::from_path(&ac.input)?;
            search_on(&mut g, ac)?
        }
        (StructureType::KMedoid, ScoreFunction::EuclidianDistance) => {
            let mut dp = EuclidianKMedoid::from_path(&ac.input)?;
            search_on(&mut dp, ac)?
        }
        (structure, score) => {
            return Err(SearchError::UnknownScoreFunction {
                structure: structure.to_string(),
                score: score.to_string(),
            });
        }
    };

    report.emit()
}

fn search_on<T: ScoreStructure>(
    t: &mut T,
    ac: AlgorithmConfiguration,
) -> Result<SearchReport, SearchError> {
    let n = t.n();
    ac.validate_against_instance(n)?;

    t.finalize();
    t.initialize_helping_structures(ac.k);

    let initial: Option<Vec<ElementId>> = match &ac.initial {
        Some(path) => {
            let s = read_initial_solution(path)?;
            check_initial_solution(&s, n, ac.k, path)?;
            Some(s)
        }
        None => None,
    };

    let outcome = TreeSearchIterative::new(t, &ac, initial).search();

    Ok(SearchReport {
        best_score: outcome.best_score.map(|s| round6(s.as_f64())),
        best_set: outcome.best_set,
        k: ac.k,
        n,
        sf_evaluations: outcome.sf_evaluations,
        elapsed_seconds: round6(outcome.elapsed_seconds),
        timed_out: outcome.timed_out,
        configuration: ac,
    })
}
