use clap::Parser;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use submax::algorithms::tree_search::TreeSearchIterative;
use submax::config::AlgorithmConfiguration;
use submax::generation::random_connected_graph;
use submax::structures::ScoreStructure;
use submax::structures::dominating_set::GraphPartialDominatingSet;
use submax::structures::group_farness::GraphNegativeGroupFarness;

const NODES: usize = 30;
const EDGES: usize = 70;
const K: usize = 4;

fn bench_config(args: &[&str]) -> AlgorithmConfiguration {
    let k = K.to_string();
    let mut argv = vec![
        "submax",
        "--structure",
        "graph",
        "--score",
        "negative-group-farness",
        "--k",
        k.as_str(),
        "--input",
        "unused",
    ];
    argv.extend_from_slice(args);
    AlgorithmConfiguration::parse_from(argv)
}

fn farness(seed: u64, ac: &AlgorithmConfiguration) -> u64 {
    let mut g = GraphNegativeGroupFarness::new(random_connected_graph(NODES, EDGES, seed));
    g.finalize();
    g.initialize_helping_structures(K);

    let outcome = TreeSearchIterative::new(&mut g, ac, None).search();
    outcome.sf_evaluations
}

fn dominating(seed: u64, ac: &AlgorithmConfiguration) -> u64 {
    let mut g = GraphPartialDominatingSet::new(random_connected_graph(NODES, EDGES, seed));
    g.finalize();
    g.initialize_helping_structures(K);

    let outcome = TreeSearchIterative::new(&mut g, ac, None).search();
    outcome.sf_evaluations
}

fn compare_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("TreeSearch Bounds");

    let configs: &[(&str, &[&str])] = &[
        ("all-bounds", &[]),
        ("no-pbf", &["--enable-pbf", "false"]),
        ("ub1-only", &["--enable-ub2", "false", "--enable-pbf", "false"]),
    ];

    for (name, args) in configs {
        let ac = bench_config(args);
        for seed in 0..3u64 {
            group.bench_with_input(
                BenchmarkId::new(format!("farness/{name}"), seed),
                &seed,
                |b, &seed| b.iter(|| farness(seed, &ac)),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("dominating/{name}"), seed),
                &seed,
                |b, &seed| b.iter(|| dominating(seed, &ac)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, compare_bounds);
criterion_main!(benches);
