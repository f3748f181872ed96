use gls_tsp::evaluation::{evaluate, EvaluationConfig, ScoreMode};
use gls_tsp::heuristics::gls::{GlsConfig, GuidedLocalSearch};
use gls_tsp::heuristics::guide::{EdgeGuide, UtilityGuide};
use gls_tsp::heuristics::multi_start::{MultiStart, MultiStartConfig, StartNodes};
use gls_tsp::heuristics::penalty::PenaltyMatrix;
use gls_tsp::instance::{DistanceMatrix, GuideMatrix};
use gls_tsp::{GuideError, Tour};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

type GuideResult = Result<GuideMatrix, GuideError>;

fn random_instance(n: usize, seed: u64) -> DistanceMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let coords: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen::<f64>() * 1000.0, rng.gen::<f64>() * 1000.0))
        .collect();
    DistanceMatrix::from_coords(&coords).unwrap()
}

/// Five nodes where only consecutive nodes of the cycle 0-3-1-4-2 are close
fn five_node_instance() -> (DistanceMatrix, Tour) {
    let optimal = Tour::new(vec![0, 3, 1, 4, 2]).unwrap();
    let mut rows = vec![vec![2.0f32; 5]; 5];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for k in 0..5 {
        let a = optimal.node_at(k);
        let b = optimal.node_at(k + 1);
        rows[a][b] = 1.0;
        rows[b][a] = 1.0;
    }
    // make shortcuts of different lengths so the optimum is unique
    rows[0][1] = 3.0;
    rows[1][0] = 3.0;
    (DistanceMatrix::from_rows(rows).unwrap(), optimal)
}

fn bounded(iter_limit: usize, time_limit: f64) -> GlsConfig {
    GlsConfig {
        time_limit,
        iter_limit,
        ..GlsConfig::evaluator()
    }
}

#[test]
fn test_five_node_instance_is_solved_to_optimality() {
    let (distances, optimal) = five_node_instance();
    let optimal_cost = optimal.cost(distances.matrix());
    assert_eq!(optimal_cost, 5.0);

    for start in 0..5 {
        let gls = GuidedLocalSearch::new(UtilityGuide::default(), bounded(50, 5.0));
        let result = gls.run(&distances, start).unwrap();

        assert_eq!(result.best_cost, optimal_cost);
        assert_eq!(result.best_tour.canonical(), optimal.canonical());
    }
}

#[test]
fn test_regular_polygon_is_solved_to_optimality() {
    let coords: Vec<(f64, f64)> = (0..5)
        .map(|k| {
            let angle = k as f64 * std::f64::consts::TAU / 5.0;
            (angle.cos() * 100.0, angle.sin() * 100.0)
        })
        .collect();
    let distances = DistanceMatrix::from_coords(&coords).unwrap();
    let optimal = Tour::identity(5);

    let gls = GuidedLocalSearch::new(UtilityGuide::default(), bounded(50, 5.0));
    let result = gls.run(&distances, 2).unwrap();

    assert!((result.best_cost - optimal.cost(distances.matrix())).abs() < 1e-3);
    assert_eq!(result.best_tour.canonical(), optimal.canonical());
}

#[test]
fn test_identical_inputs_give_identical_results() {
    let distances = random_instance(60, 5);
    let gls = GuidedLocalSearch::new(UtilityGuide::default(), bounded(25, 1e6));

    let first = gls.run(&distances, 7).unwrap();
    let second = gls.run(&distances, 7).unwrap();

    assert_eq!(first.best_tour, second.best_tour);
    assert_eq!(first.best_cost.to_bits(), second.best_cost.to_bits());
    assert_eq!(first.iterations, 25);
}

#[test]
fn test_time_budget_is_respected() {
    let distances = random_instance(1000, 99);
    let gls = GuidedLocalSearch::new(UtilityGuide::default(), bounded(usize::MAX, 0.1));

    let result = gls.run(&distances, 0).unwrap();

    assert!(result.best_tour.is_permutation());
    assert_eq!(result.best_tour.len(), 1000);
    assert_eq!(result.best_cost, result.best_tour.cost(distances.matrix()));
    assert!(result.elapsed_time < 5.0, "took {}s", result.elapsed_time);
}

#[test]
fn test_multi_start_improves_or_equals_single_start() {
    let distances = random_instance(40, 17);
    let config = MultiStartConfig {
        n_starts: 4,
        threads: Some(4),
        start_nodes: StartNodes::Random { seed: 3 },
        gls: bounded(20, 1e6),
    };
    let starts = config.start_nodes.select(40, 4).unwrap();

    let multi = MultiStart::new(UtilityGuide::default(), config).run(&distances).unwrap();

    let single = GuidedLocalSearch::new(UtilityGuide::default(), config.gls);
    for &start in &starts {
        let result = single.run(&distances, start).unwrap();
        assert!(multi.best_cost <= result.best_cost);
    }
}

#[test]
fn test_penalties_seen_by_guide_are_monotone_and_symmetric() {
    use std::sync::Mutex;

    let distances = random_instance(30, 8);
    let history: Mutex<Vec<PenaltyMatrix>> = Mutex::new(Vec::new());
    let utility = UtilityGuide::default();

    {
        let recording = |d: &DistanceMatrix, tour: &Tour, p: &PenaltyMatrix| -> GuideResult {
            assert!(tour.is_permutation());
            history.lock().unwrap().push(p.clone());
            utility.guide(d, tour, p)
        };

        let gls = GuidedLocalSearch::new(&recording, bounded(15, 1e6));
        gls.run(&distances, 0).unwrap();
    }

    let history = history.into_inner().unwrap();
    assert_eq!(history.len(), 15);
    for pair in history.windows(2) {
        assert!(pair[1].is_symmetric());
        for i in 0..30 {
            for j in 0..30 {
                assert!(pair[1].get(i, j) >= pair[0].get(i, j));
            }
        }
    }
    assert!(history.last().unwrap().total() > 0);
}

#[test]
fn test_evaluation_never_panics_on_bad_guides() {
    let distances = random_instance(20, 1);
    let mut config = EvaluationConfig::default();
    config.search.gls = bounded(5, 1e6);

    let wrong_shape = |_: &DistanceMatrix, _: &Tour, _: &PenaltyMatrix| -> GuideResult {
        Ok(GuideMatrix::filled(3, 0.0))
    };
    let evaluation = evaluate(&distances, wrong_shape, &config);
    assert!(evaluation.is_failed());
    assert_eq!(evaluation.fitness(ScoreMode::Cost), f64::NEG_INFINITY);

    let good = evaluate(&distances, UtilityGuide::default(), &config);
    assert!(!good.is_failed());
    assert!(good.fitness(ScoreMode::Cost) > evaluation.fitness(ScoreMode::Cost));
}
