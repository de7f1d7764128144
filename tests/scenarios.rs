use std::collections::HashSet;
use std::f64::consts::TAU;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tegn::chart::Chart;
use tegn::config::ChartConfig;
use tegn::layout::{
    Force, ForceNode, Simulation, SimulationConfig, StackOffset, StackOrder, Thresholds, bin, bin_values, pie, stack,
};
use tegn::reconcile::{Join, partition};
use tegn::render::Scene;
use tegn::scale::{Band, Invert, Linear, Scale};
use tegn::stats;
use tegn::transition::{Attributes, Easing};

#[test]
fn test_linear_midpoint() {
    let y = Linear::new([0.0, 100.0], [0.0, 500.0]);
    assert_eq!(y.apply(&50.0), 250.0);
}

#[test]
fn test_bin_five_thresholds() {
    let values = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
    let bins = bin_values(&values, [0.0, 10.0], &Thresholds::Count(5)).unwrap();

    assert_eq!(bins.len(), 5);
    for b in &bins {
        assert_eq!(b.width(), 2.0);
    }
    assert_eq!((bins[0].lower_bound, bins[0].upper_bound), (0.0, 2.0));
    assert_eq!(bins[0].members, vec![&0.0]);
    assert_eq!((bins[4].lower_bound, bins[4].upper_bound), (8.0, 10.0));
    assert_eq!(bins[4].members, vec![&8.0, &10.0]);
}

#[test]
fn test_keyed_partition() {
    let split = partition(&["A", "B", "C"], &["B", "C", "D"], |s| *s).unwrap();
    assert_eq!(split.entering, vec!["D"]);
    assert_eq!(split.updating, vec!["B", "C"]);
    assert_eq!(split.exiting, vec!["A"]);
}

#[test]
fn test_stack_two_series() {
    struct Row {
        x: f64,
        y: f64,
    }
    let rows = [Row { x: 1.0, y: 2.0 }, Row { x: 3.0, y: 1.0 }];
    let series = stack(
        &rows,
        &["x", "y"],
        |row, key| if *key == "x" { row.x } else { row.y },
        StackOffset::None,
        StackOrder::None,
    )
    .unwrap();

    assert_eq!(series[0].key, "x");
    assert_eq!(series[0].points, vec![[0.0, 1.0], [0.0, 3.0]]);
    assert_eq!(series[1].points, vec![[1.0, 3.0], [3.0, 4.0]]);
}

#[test]
fn test_linear_round_trip() {
    let domains: [[f64; 2]; 4] = [[0.0, 1.0], [-40.0, 250.0], [1e6, -3.5], [0.001, 0.002]];
    let ranges: [[f64; 2]; 3] = [[0.0, 640.0], [480.0, 0.0], [-1.0, 1.0]];
    for domain in domains {
        for range in ranges {
            let scale = Linear::new(domain, range);
            let span = (domain[1] - domain[0]).abs();
            for i in 0..=20 {
                let v = domain[0] + (domain[1] - domain[0]) * f64::from(i) / 20.0;
                let back = scale.invert(&scale.apply(&v)).unwrap();
                assert!((back - v).abs() <= span * 1e-12, "{v} came back as {back}");
            }
        }
    }
}

#[test]
fn test_band_coverage() {
    for n in 1..8 {
        for padding in [0.0, 0.1, 0.35] {
            let keys: Vec<usize> = (0..n).collect();
            let band = Band::new(keys.iter().copied(), [20.0, 620.0]).padding(padding);
            let step = band.step();

            let first = band.position(&0).unwrap();
            let last = band.position(&(n - 1)).unwrap();
            assert!((first - padding * step - 20.0).abs() < 1e-9);
            assert!((last + band.bandwidth() + padding * step - 620.0).abs() < 1e-9);
            assert!((band.bandwidth() - step * (1.0 - padding)).abs() < 1e-9);
        }
    }
}

#[test]
fn test_normalized_stack_tops_at_one() {
    let rows = [[1.0, 2.0, 3.0], [0.0, 0.0, 0.0], [5.0, 0.5, 0.25], [7.0, 7.0, 7.0]];
    let series = stack(&rows, &[0usize, 1, 2], |row, &k| row[k], StackOffset::Normalize, StackOrder::None).unwrap();

    for (row, cells) in rows.iter().enumerate() {
        let top = series
            .iter()
            .map(|s| s.points[row][1])
            .fold(f64::NEG_INFINITY, f64::max);
        if cells.iter().sum::<f64>() > 0.0 {
            assert!((top - 1.0).abs() < 1e-12, "row {row} tops at {top}");
        } else {
            assert_eq!(top, 0.0);
        }
    }
}

#[test]
fn test_bin_completeness() {
    let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 / 4.0 - 3.0).collect();
    let domain = [0.0, 20.0];
    for thresholds in [Thresholds::Sturges, Thresholds::Count(7), Thresholds::Explicit(vec![2.5, 9.0, 13.0])] {
        let bins = bin(&values, |v| *v, domain, &thresholds).unwrap();
        let binned: usize = bins.iter().map(|b| b.len()).sum();
        let inside = values.iter().filter(|v| (0.0..=20.0).contains(*v)).count();
        assert_eq!(binned, inside);

        for pair in bins.windows(2) {
            assert_eq!(pair[0].upper_bound, pair[1].lower_bound);
        }
        assert_eq!(bins[0].lower_bound, 0.0);
        assert_eq!(bins[bins.len() - 1].upper_bound, 20.0);
    }
}

#[test]
fn test_partition_properties() {
    for seed in 0..40u32 {
        let previous: Vec<u32> = (0..30).filter(|k| (k * 7 + seed) % 3 != 0).collect();
        let dataset: Vec<u32> = (0..30).filter(|k| (k * 5 + seed) % 4 != 0).rev().collect();
        let split = partition(&previous, &dataset, |k| *k).unwrap();

        let entering: HashSet<u32> = split.entering.iter().copied().collect();
        let updating: HashSet<u32> = split.updating.iter().copied().collect();
        let exiting: HashSet<u32> = split.exiting.iter().copied().collect();
        let before: HashSet<u32> = previous.iter().copied().collect();
        let after: HashSet<u32> = dataset.iter().copied().collect();

        assert!(entering.is_disjoint(&updating));
        assert!(updating.is_disjoint(&exiting));
        assert!(entering.is_disjoint(&exiting));
        assert_eq!(entering.union(&updating).copied().collect::<HashSet<_>>(), after);
        assert_eq!(exiting, before.difference(&after).copied().collect());
        assert_eq!(updating, before.intersection(&after).copied().collect());
    }
}

#[test]
fn test_pie_spans_circle() {
    let values = [3.0, 0.0, 12.5, 7.0, 1.0];
    let slices = pie(&values, |v| *v, None).unwrap();
    let total: f64 = slices.iter().map(|s| s.sweep()).sum();
    assert!((total - TAU).abs() < 1e-12);
    assert_eq!(slices[1].sweep(), 0.0);
}

#[test]
fn test_force_layout_settles_without_heavy_overlap() {
    let nodes: Vec<ForceNode> = (0..30).map(|i| ForceNode::new(3.0 + f64::from(i % 4))).collect();
    let mut sim = Simulation::new(nodes, SimulationConfig::default())
        .with_force(Force::collide())
        .with_force(Force::center(0.0, 0.0));

    assert!(sim.run());
    let nodes = sim.nodes();
    assert!(nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            let distance = (a.x - b.x).hypot(a.y - b.y);
            assert!(distance > 0.5 * (a.radius + b.radius));
        }
    }
}

#[test]
fn test_bar_chart_pipeline() {
    #[derive(Debug, Clone)]
    struct Sale {
        region: &'static str,
        amount: f64,
    }

    let first = vec![
        Sale { region: "north", amount: 40.0 },
        Sale { region: "south", amount: 10.0 },
        Sale { region: "east", amount: 25.0 },
    ];
    let second = vec![
        Sale { region: "south", amount: 30.0 },
        Sale { region: "east", amount: 25.0 },
        Sale { region: "west", amount: 50.0 },
    ];

    let height = 300.0;
    let config = ChartConfig::builder()
        .domain(stats::zero_based_domain(&second, |s| s.amount))
        .range([height, 0.0])
        .duration(Duration::from_millis(100))
        .easing(Easing::Linear)
        .build()
        .unwrap();
    let y = config.linear_scale().unwrap();
    let x = Band::new(["north", "south", "east", "west"], [0.0, 400.0]);

    let join = Join::new(
        |s: &Sale| s.region,
        |s: &Sale| {
            Attributes::new()
                .with("x", x.position(&s.region).unwrap_or(0.0))
                .with("y", y.apply(&s.amount))
                .with("height", height - y.apply(&s.amount))
        },
    )
    .enter_from(|s: &Sale| {
        Attributes::new()
            .with("x", x.position(&s.region).unwrap_or(0.0))
            .with("y", height)
            .with("height", 0.0)
    })
    .exit_to(Attributes::new().with("height", 0.0).with("y", height));

    let mut chart = Chart::from_config(Scene::new(), &config);
    chart.update(&first, &join).unwrap();
    assert_eq!(chart.settle(Duration::from_millis(16), 100), 0);
    assert_eq!(chart.adapter().len(), 3);

    let split = chart.update(&second, &join).unwrap();
    assert_eq!(split.entering, vec!["west"]);
    assert_eq!(split.updating, vec!["south", "east"]);
    assert_eq!(split.exiting, vec!["north"]);
    assert_eq!(chart.adapter().len(), 4);

    chart.frame(Duration::from_millis(50));
    let west = chart.adapter().get(&"west").and_then(|a| a.number("height"));
    assert_eq!(west, Some(150.0));

    assert_eq!(chart.settle(Duration::from_millis(16), 100), 0);
    let mut regions: Vec<&str> = chart.adapter().iter().map(|(k, _)| *k).collect();
    regions.sort_unstable();
    assert_eq!(regions, vec!["east", "south", "west"]);
    assert_eq!(
        chart.adapter().get(&"south").and_then(|a| a.number("height")),
        Some(180.0)
    );
}
