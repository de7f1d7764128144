use std::f64::consts::PI;

use tracing::{debug, trace, warn};

/// Velocity multiplier lost per tick when no configuration is supplied.
pub const DEFAULT_VELOCITY_DECAY: f64 = 0.4;

const JIGGLE_SEED: u64 = 0x5eed_f0ce;

/// A circle taking part in a force simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceNode {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    /// Pinned x coordinate; the node never moves along x while set.
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl ForceNode {
    /// Node without a position yet; [`Simulation::new`] places it.
    pub fn new(radius: f64) -> Self {
        Self::at(f64::NAN, f64::NAN, radius)
    }

    pub fn at(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
            fx: None,
            fy: None,
        }
    }

    pub fn fixed(x: f64, y: f64, radius: f64) -> Self {
        Self {
            fx: Some(x),
            fy: Some(y),
            ..Self::at(x, y, radius)
        }
    }

    fn is_placed(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Forces acting on every node during a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    /// Pushes overlapping circles apart.
    ///
    /// Overlaps are resolved by relaxation: every pair is visited
    /// `iterations` times per step and moved apart by `strength` times the
    /// overlap, split in proportion to the other node's area. `padding` is
    /// added to each radius.
    Collide {
        strength: f64,
        iterations: usize,
        padding: f64,
    },
    /// Pulls every node toward `(x, y)`.
    Center { x: f64, y: f64, strength: f64 },
    /// Pulls every node toward a vertical line.
    X { target: f64, strength: f64 },
    /// Pulls every node toward a horizontal line.
    Y { target: f64, strength: f64 },
}

impl Force {
    pub fn collide() -> Self {
        Self::Collide {
            strength: 1.0,
            iterations: 1,
            padding: 0.0,
        }
    }

    pub fn center(x: f64, y: f64) -> Self {
        Self::Center { x, y, strength: 0.1 }
    }

    pub fn x(target: f64) -> Self {
        Self::X { target, strength: 0.1 }
    }

    pub fn y(target: f64) -> Self {
        Self::Y { target, strength: 0.1 }
    }

    fn apply(&self, nodes: &mut [ForceNode], alpha: f64, rng: &mut Lcg) {
        match *self {
            Self::Collide {
                strength,
                iterations,
                padding,
            } => {
                for _ in 0..iterations {
                    collide(nodes, strength, padding, rng);
                }
            }
            Self::Center { x, y, strength } => {
                for node in nodes.iter_mut().filter(|n| n.is_placed()) {
                    node.vx += (x - node.x) * strength * alpha;
                    node.vy += (y - node.y) * strength * alpha;
                }
            }
            Self::X { target, strength } => {
                for node in nodes.iter_mut().filter(|n| n.is_placed()) {
                    node.vx += (target - node.x) * strength * alpha;
                }
            }
            Self::Y { target, strength } => {
                for node in nodes.iter_mut().filter(|n| n.is_placed()) {
                    node.vy += (target - node.y) * strength * alpha;
                }
            }
        }
    }
}

fn collide(nodes: &mut [ForceNode], strength: f64, padding: f64, rng: &mut Lcg) {
    let n = nodes.len();
    for i in 0..n {
        if !nodes[i].is_placed() {
            continue;
        }
        let ri = nodes[i].radius + padding;
        let ri2 = ri * ri;
        for j in (i + 1)..n {
            let (head, tail) = nodes.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if !b.is_placed() {
                continue;
            }
            let rj = b.radius + padding;
            let r = ri + rj;
            let mut dx = a.x + a.vx - b.x - b.vx;
            let mut dy = a.y + a.vy - b.y - b.vy;
            let mut l = dx * dx + dy * dy;
            if l >= r * r {
                continue;
            }
            if dx == 0.0 {
                dx = rng.jiggle();
                l += dx * dx;
            }
            if dy == 0.0 {
                dy = rng.jiggle();
                l += dy * dy;
            }
            let dist = l.sqrt();
            let push = (r - dist) / dist * strength;
            dx *= push;
            dy *= push;
            let rj2 = rj * rj;
            let share = rj2 / (ri2 + rj2);
            a.vx += dx * share;
            a.vy += dy * share;
            b.vx -= dx * (1.0 - share);
            b.vy -= dy * (1.0 - share);
        }
    }
}

/// Movement produced by one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Largest distance any single node moved.
    pub max_displacement: f64,
    /// Sum of the distances moved by all nodes.
    pub total_displacement: f64,
}

/// Advances `nodes` by one step.
///
/// `alpha` is the cooling factor scaling the positional forces: callers
/// driving their own loop lower it over time so the layout comes to rest.
/// Velocities lose [`DEFAULT_VELOCITY_DECAY`] of their magnitude per step.
/// Nodes without a position are left untouched.
pub fn force_step(nodes: &mut [ForceNode], forces: &[Force], alpha: f64) -> StepStats {
    let mut rng = Lcg::seed(JIGGLE_SEED);
    step(nodes, forces, alpha, DEFAULT_VELOCITY_DECAY, &mut rng)
}

fn step(
    nodes: &mut [ForceNode],
    forces: &[Force],
    alpha: f64,
    velocity_decay: f64,
    rng: &mut Lcg,
) -> StepStats {
    for force in forces {
        force.apply(nodes, alpha, rng);
    }

    let keep = 1.0 - velocity_decay;
    let mut stats = StepStats::default();
    for node in nodes.iter_mut().filter(|n| n.is_placed()) {
        let (x0, y0) = (node.x, node.y);
        match node.fx {
            Some(fx) => {
                node.x = fx;
                node.vx = 0.0;
            }
            None => {
                node.vx *= keep;
                node.x += node.vx;
            }
        }
        match node.fy {
            Some(fy) => {
                node.y = fy;
                node.vy = 0.0;
            }
            None => {
                node.vy *= keep;
                node.y += node.vy;
            }
        }
        let moved = (node.x - x0).hypot(node.y - y0);
        stats.max_displacement = stats.max_displacement.max(moved);
        stats.total_displacement += moved;
    }
    stats
}

/// Where nodes without a position start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Sunflower spiral around the origin, 10 units between rings.
    Phyllotaxis,
    /// Uniform in `[0, width) x [0, height)` from a fixed seed.
    Random { seed: u64, width: f64, height: f64 },
}

/// Tuning of a [`Simulation`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// The simulation stops once alpha falls below this.
    pub alpha_min: f64,
    /// Fraction of the distance to `alpha_target` alpha moves per tick.
    pub alpha_decay: f64,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    /// Ticks whose largest displacement is below `epsilon` count as calm.
    pub epsilon: f64,
    /// Consecutive calm ticks required to settle.
    pub calm_ticks: usize,
    /// Upper bound on ticks for [`Simulation::run`].
    pub max_ticks: usize,
    pub placement: Placement,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            alpha_min,
            // reaches alpha_min after about 300 ticks
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: DEFAULT_VELOCITY_DECAY,
            epsilon: 0.01,
            calm_ticks: 5,
            max_ticks: 1000,
            placement: Placement::Phyllotaxis,
        }
    }
}

/// A cooling force simulation over owned nodes.
///
/// ```rust
/// use tegn::layout::{Force, ForceNode, Simulation, SimulationConfig};
///
/// let nodes = (0..20).map(|_| ForceNode::new(4.0)).collect();
/// let mut sim = Simulation::new(nodes, SimulationConfig::default())
///     .with_force(Force::collide())
///     .with_force(Force::center(0.0, 0.0));
///
/// assert!(sim.run());
/// assert!(sim.is_settled());
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<ForceNode>,
    forces: Vec<Force>,
    config: SimulationConfig,
    alpha: f64,
    ticks: usize,
    calm: usize,
    rng: Lcg,
}

impl Simulation {
    /// Places every node lacking a position, then pins fixed nodes.
    pub fn new(mut nodes: Vec<ForceNode>, config: SimulationConfig) -> Self {
        let seed = match config.placement {
            Placement::Random { seed, .. } => seed,
            Placement::Phyllotaxis => JIGGLE_SEED,
        };
        let mut rng = Lcg::seed(seed);
        let golden_angle = PI * (3.0 - 5f64.sqrt());
        for (i, node) in nodes.iter_mut().enumerate() {
            if !node.is_placed() {
                match config.placement {
                    Placement::Phyllotaxis => {
                        let radius = 10.0 * (0.5 + i as f64).sqrt();
                        let angle = i as f64 * golden_angle;
                        node.x = radius * angle.cos();
                        node.y = radius * angle.sin();
                    }
                    Placement::Random { width, height, .. } => {
                        node.x = rng.next_f64() * width;
                        node.y = rng.next_f64() * height;
                    }
                }
            }
            if let Some(fx) = node.fx {
                node.x = fx;
            }
            if let Some(fy) = node.fy {
                node.y = fy;
            }
        }
        Self {
            nodes,
            forces: Vec::new(),
            config,
            alpha: 1.0,
            ticks: 0,
            calm: 0,
            rng,
        }
    }

    #[must_use]
    pub fn with_force(mut self, force: Force) -> Self {
        self.forces.push(force);
        self
    }

    pub fn add_force(&mut self, force: Force) {
        self.forces.push(force);
    }

    pub fn nodes(&self) -> &[ForceNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [ForceNode] {
        &mut self.nodes
    }

    pub fn into_nodes(self) -> Vec<ForceNode> {
        self.nodes
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Ticks run since creation or the last [`Simulation::reheat`].
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Restarts cooling, e.g. after nodes were added or moved.
    pub fn reheat(&mut self, alpha: f64) {
        self.alpha = alpha;
        self.ticks = 0;
        self.calm = 0;
    }

    /// Cooled below `alpha_min`, or calm for `calm_ticks` consecutive ticks.
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min || self.calm >= self.config.calm_ticks
    }

    /// Cools alpha and advances the nodes by one step.
    pub fn tick(&mut self) -> StepStats {
        self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;
        let stats = step(
            &mut self.nodes,
            &self.forces,
            self.alpha,
            self.config.velocity_decay,
            &mut self.rng,
        );
        self.ticks += 1;
        if stats.max_displacement < self.config.epsilon {
            self.calm += 1;
        } else {
            self.calm = 0;
        }
        trace!(tick = self.ticks, alpha = self.alpha, max = stats.max_displacement, "force tick");
        stats
    }

    /// Ticks until settled or the tick budget is spent. Returns whether the
    /// layout settled.
    pub fn run(&mut self) -> bool {
        while !self.is_settled() {
            if self.ticks >= self.config.max_ticks {
                warn!(
                    ticks = self.ticks,
                    alpha = self.alpha,
                    "force simulation exhausted its tick budget before settling"
                );
                return false;
            }
            self.tick();
        }
        debug!(ticks = self.ticks, alpha = self.alpha, nodes = self.nodes.len(), "force simulation settled");
        true
    }
}

/// Small deterministic LCG for placement and overlap jiggle.
#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    fn seed(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Tiny non-zero offset separating coincident nodes.
    fn jiggle(&mut self) -> f64 {
        let v = (self.next_f64() - 0.5) * 1e-6;
        if v == 0.0 { 1e-7 } else { v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: &ForceNode, b: &ForceNode) -> f64 {
        (a.x - b.x).hypot(a.y - b.y)
    }

    #[test]
    fn test_collide_separates_overlapping_nodes() {
        let nodes = vec![ForceNode::at(0.0, 0.0, 5.0), ForceNode::at(1.0, 0.0, 5.0)];
        let mut sim = Simulation::new(nodes, SimulationConfig::default()).with_force(Force::collide());
        assert!(sim.run());
        let [a, b] = sim.nodes() else { panic!("two nodes") };
        assert!(distance(a, b) > 9.5, "distance {}", distance(a, b));
    }

    #[test]
    fn test_coincident_nodes_are_split() {
        let mut nodes = vec![ForceNode::at(3.0, 3.0, 1.0), ForceNode::at(3.0, 3.0, 1.0)];
        for _ in 0..50 {
            force_step(&mut nodes, &[Force::collide()], 1.0);
        }
        assert!(distance(&nodes[0], &nodes[1]) > 1.5);
    }

    #[test]
    fn test_unplaced_nodes_do_not_poison_neighbours() {
        let mut nodes = vec![ForceNode::at(0.0, 0.0, 5.0), ForceNode::new(5.0)];
        force_step(&mut nodes, &[Force::collide(), Force::center(1.0, 1.0), Force::x(2.0)], 1.0);

        let placed = &nodes[0];
        assert!(placed.x.is_finite() && placed.y.is_finite());
        assert!(placed.vx.is_finite() && placed.vy.is_finite());
        assert!(!nodes[1].is_placed());
        assert_eq!((nodes[1].vx, nodes[1].vy), (0.0, 0.0));
    }

    #[test]
    fn test_center_pulls_toward_target() {
        let nodes = vec![ForceNode::at(100.0, -40.0, 1.0)];
        let mut sim = Simulation::new(nodes, SimulationConfig::default()).with_force(Force::center(10.0, 10.0));
        assert!(sim.run());
        let node = &sim.nodes()[0];
        assert!((node.x - 10.0).abs() < 1.0 && (node.y - 10.0).abs() < 1.0, "{node:?}");
    }

    #[test]
    fn test_axis_forces_only_move_their_axis() {
        let mut nodes = vec![ForceNode::at(10.0, 10.0, 1.0)];
        force_step(&mut nodes, &[Force::x(0.0)], 1.0);
        assert!(nodes[0].x < 10.0);
        assert_eq!(nodes[0].y, 10.0);

        force_step(&mut nodes, &[Force::y(20.0)], 1.0);
        assert!(nodes[0].y > 10.0);
    }

    #[test]
    fn test_step_stats() {
        let mut nodes = vec![ForceNode::at(0.0, 0.0, 1.0), ForceNode::at(50.0, 0.0, 1.0)];
        let still = force_step(&mut nodes, &[], 1.0);
        assert_eq!(still, StepStats::default());

        nodes[1].vx = 10.0;
        let stats = force_step(&mut nodes, &[], 1.0);
        assert_eq!(stats.max_displacement, 6.0);
        assert_eq!(stats.total_displacement, 6.0);
    }

    #[test]
    fn test_fixed_nodes_do_not_move() {
        let nodes = vec![ForceNode::fixed(0.0, 0.0, 5.0), ForceNode::at(2.0, 0.0, 5.0)];
        let mut sim = Simulation::new(nodes, SimulationConfig::default())
            .with_force(Force::collide())
            .with_force(Force::center(50.0, 50.0));
        sim.run();
        assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (0.0, 0.0));
        assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > 2.0);
    }

    #[test]
    fn test_phyllotaxis_placement() {
        let sim = Simulation::new(vec![ForceNode::new(1.0); 3], SimulationConfig::default());
        let first = &sim.nodes()[0];
        assert!((first.x - 10.0 * 0.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(first.y, 0.0);
        assert!(sim.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    }

    #[test]
    fn test_random_placement_is_seeded() {
        let config = SimulationConfig {
            placement: Placement::Random {
                seed: 42,
                width: 200.0,
                height: 100.0,
            },
            ..SimulationConfig::default()
        };
        let a = Simulation::new(vec![ForceNode::new(1.0); 10], config.clone());
        let b = Simulation::new(vec![ForceNode::new(1.0); 10], config);
        assert_eq!(a.nodes(), b.nodes());
        assert!(a.nodes().iter().all(|n| (0.0..200.0).contains(&n.x) && (0.0..100.0).contains(&n.y)));
    }

    #[test]
    fn test_budget_exhaustion() {
        let config = SimulationConfig {
            max_ticks: 3,
            ..SimulationConfig::default()
        };
        let nodes = vec![ForceNode::at(500.0, 0.0, 1.0)];
        let mut sim = Simulation::new(nodes, config).with_force(Force::center(0.0, 0.0));
        assert!(!sim.run());
        assert_eq!(sim.ticks(), 3);
        assert!(!sim.is_settled());
    }

    #[test]
    fn test_reheat_resets_cooling() {
        let mut sim = Simulation::new(vec![ForceNode::at(0.0, 0.0, 1.0)], SimulationConfig::default());
        assert!(sim.run());
        sim.reheat(1.0);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.alpha(), 1.0);
        assert!(!sim.is_settled());
    }
}
