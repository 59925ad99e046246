//! Chart-ready point sequences along each leg of a cycle.
//!
//! Points are produced lazily from the closed-form curve of each leg, so a sampler
//! can be cloned and replayed without re-evaluating the cycle.

use crate::aggregate::ThermodynamicCycle;
use crate::error::{CycleError, CycleResult};
use crate::process::{ProcessKind, ThermodynamicProcess};
use crate::state::ThermodynamicState;
use serde::{Deserialize, Serialize};
use tc_fluids::FluidProperties;

/// Segments per leg when the caller has no preference.
pub const DEFAULT_SEGMENTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Pressure over specific volume.
    Pv,
    /// Temperature over specific entropy.
    Ts,
    /// Pressure over specific enthalpy.
    Ph,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 3] = [DiagramKind::Pv, DiagramKind::Ts, DiagramKind::Ph];

    pub fn label(self) -> &'static str {
        match self {
            DiagramKind::Pv => "pv",
            DiagramKind::Ts => "ts",
            DiagramKind::Ph => "ph",
        }
    }

    pub fn x_axis(self) -> &'static str {
        match self {
            DiagramKind::Pv => "v [m³/kg]",
            DiagramKind::Ts => "s [kJ/(kg·K)]",
            DiagramKind::Ph => "h [kJ/kg]",
        }
    }

    pub fn y_axis(self) -> &'static str {
        match self {
            DiagramKind::Pv | DiagramKind::Ph => "P [kPa]",
            DiagramKind::Ts => "T [K]",
        }
    }
}

impl std::fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DiagramKind {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or(CycleError::InvalidArg {
                what: "diagram kind must be one of pv, ts, ph",
            })
    }
}

/// One plotted point. `label` is the state number at cycle vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Vertex {
    t: f64,
    p: f64,
    v: f64,
    s: f64,
    h: f64,
    number: u32,
}

impl Vertex {
    fn of(state: &ThermodynamicState) -> Self {
        Self {
            t: state.temperature_k(),
            p: state.pressure_kpa(),
            v: state.volume(),
            s: state.entropy(),
            h: state.enthalpy(),
            number: state.id().number(),
        }
    }
}

/// Lazy sampler over one leg: `segments + 1` points from start to end state.
#[derive(Debug, Clone)]
pub struct LegSampler {
    start: Vertex,
    end: Vertex,
    path: ProcessKind,
    fluid: FluidProperties,
    diagram: DiagramKind,
    segments: usize,
    next: usize,
    stop: usize,
}

impl LegSampler {
    /// Omit the end state (used when legs are chained).
    fn without_end(mut self) -> Self {
        self.stop = self.segments;
        self
    }

    fn point(&self, i: usize) -> ChartPoint {
        let vertex = if i == 0 {
            Some(self.start)
        } else if i == self.segments {
            Some(self.end)
        } else {
            None
        };
        let (t, p, v, s, h) = match vertex {
            Some(at) => (at.t, at.p, at.v, at.s, at.h),
            None => {
                let (t, p, v) = self.interior(i as f64 / self.segments as f64);
                let fluid = &self.fluid;
                let s = self.start.s + fluid.cp * (t / self.start.t).ln()
                    - fluid.r * (p / self.start.p).ln();
                (t, p, v, s, fluid.cp * t)
            }
        };

        let (x, y) = match self.diagram {
            DiagramKind::Pv => (v, p),
            DiagramKind::Ts => (s, t),
            DiagramKind::Ph => (h, p),
        };
        ChartPoint {
            x,
            y,
            label: vertex.map(|at| at.number.to_string()),
        }
    }

    /// (T, P, v) at fraction `f` of the leg.
    fn interior(&self, f: f64) -> (f64, f64, f64) {
        let (a, b) = (self.start, self.end);
        let r = self.fluid.r;
        match self.path {
            ProcessKind::Isochoric => {
                let t = a.t + (b.t - a.t) * f;
                (t, r * t / a.v, a.v)
            }
            ProcessKind::Isobaric => {
                let t = a.t + (b.t - a.t) * f;
                (t, a.p, r * t / a.p)
            }
            ProcessKind::Isothermal => {
                let v = a.v * (b.v / a.v).powf(f);
                (a.t, r * a.t / v, v)
            }
            ProcessKind::Isentropic | ProcessKind::Polytropic { .. } => {
                let n = self.path.volume_exponent(&self.fluid).unwrap_or(self.fluid.gamma);
                let v = a.v * (b.v / a.v).powf(f);
                let p = a.p * (a.v / v).powf(n);
                (p * v / r, p, v)
            }
        }
    }
}

impl Iterator for LegSampler {
    type Item = ChartPoint;

    fn next(&mut self) -> Option<ChartPoint> {
        if self.next >= self.stop {
            return None;
        }
        let point = self.point(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.stop.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for LegSampler {}

/// Sample one leg of `cycle` with `segments` intervals.
///
/// The first and last points are the exact projections of the leg's end states.
pub fn sample_leg(
    cycle: &ThermodynamicCycle,
    process: &ThermodynamicProcess,
    diagram: DiagramKind,
    segments: usize,
) -> CycleResult<LegSampler> {
    if segments == 0 {
        return Err(CycleError::InvalidArg {
            what: "a leg needs at least one segment",
        });
    }
    let missing = CycleError::Invariant {
        what: "process refers to a state outside its cycle",
    };
    let start = cycle.start_of(process).ok_or(missing.clone())?;
    let end = cycle.end_of(process).ok_or(missing)?;

    Ok(LegSampler {
        start: Vertex::of(start),
        end: Vertex::of(end),
        path: process.kind,
        fluid: *cycle.fluid,
        diagram,
        segments,
        next: 0,
        stop: segments + 1,
    })
}

/// All legs of a cycle chained in traversal order.
///
/// Every vertex appears once, so the sequence holds `legs × segments` points. The
/// loop is not closed; renderers join the last point back to the first.
#[derive(Debug, Clone)]
pub struct DiagramSampler {
    legs: Vec<LegSampler>,
    current: usize,
}

impl Iterator for DiagramSampler {
    type Item = ChartPoint;

    fn next(&mut self) -> Option<ChartPoint> {
        while let Some(leg) = self.legs.get_mut(self.current) {
            if let Some(point) = leg.next() {
                return Some(point);
            }
            self.current += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left: usize = self
            .legs
            .iter()
            .skip(self.current)
            .map(ExactSizeIterator::len)
            .sum();
        (left, Some(left))
    }
}

impl ExactSizeIterator for DiagramSampler {}

pub fn sample_diagram(
    cycle: &ThermodynamicCycle,
    diagram: DiagramKind,
    segments: usize,
) -> CycleResult<DiagramSampler> {
    let legs = cycle
        .processes
        .iter()
        .map(|process| sample_leg(cycle, process, diagram, segments).map(LegSampler::without_end))
        .collect::<CycleResult<Vec<_>>>()?;
    tracing::trace!(
        cycle = %cycle.id(),
        diagram = %diagram,
        legs = legs.len(),
        segments,
        "sampling diagram"
    );
    Ok(DiagramSampler { legs, current: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CarnotParams, CycleSpec, DieselParams, SimulationConfig};
    use crate::run_cycle;

    fn diesel() -> ThermodynamicCycle {
        let config = SimulationConfig::new(
            "air",
            CycleSpec::Diesel(DieselParams {
                t1: 300.0,
                p1: 100.0,
                compression_ratio: 18.0,
                cutoff_ratio: 2.0,
                polytropic_index: None,
            }),
        );
        run_cycle(&config).unwrap()
    }

    #[test]
    fn leg_has_n_plus_one_points_with_exact_endpoints() {
        let cycle = diesel();
        for process in &cycle.processes {
            let points: Vec<_> = sample_leg(&cycle, process, DiagramKind::Pv, 10)
                .unwrap()
                .collect();
            assert_eq!(points.len(), 11);

            let start = cycle.start_of(process).unwrap();
            let end = cycle.end_of(process).unwrap();
            assert_eq!(points[0].x, start.volume());
            assert_eq!(points[0].y, start.pressure_kpa());
            assert_eq!(points[10].x, end.volume());
            assert_eq!(points[10].y, end.pressure_kpa());
            assert_eq!(points[0].label.as_deref(), Some(start.id().number().to_string().as_str()));
            assert!(points[5].label.is_none());
        }
    }

    #[test]
    fn sampler_is_restartable() {
        let cycle = diesel();
        let sampler = sample_leg(&cycle, &cycle.processes[0], DiagramKind::Ts, 8).unwrap();
        let first: Vec<_> = sampler.clone().collect();
        let second: Vec<_> = sampler.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn isentropic_leg_is_vertical_on_ts() {
        let cycle = diesel();
        let points: Vec<_> = sample_leg(&cycle, &cycle.processes[0], DiagramKind::Ts, 12)
            .unwrap()
            .collect();
        let s0 = points[0].x;
        for point in &points {
            assert!((point.x - s0).abs() < 1e-12, "entropy drifted: {point:?}");
        }
    }

    #[test]
    fn isobaric_leg_is_flat_on_pv_and_ph() {
        let cycle = diesel();
        let leg = &cycle.processes[1];
        for kind in [DiagramKind::Pv, DiagramKind::Ph] {
            let points: Vec<_> = sample_leg(&cycle, leg, kind, 6).unwrap().collect();
            let p = points[0].y;
            assert!(points.iter().all(|pt| (pt.y - p).abs() < 1e-6 * p));
        }
    }

    #[test]
    fn isothermal_leg_is_flat_on_ts() {
        let config = SimulationConfig::new(
            "air",
            CycleSpec::Carnot(CarnotParams {
                max_temperature: 800.0,
                min_temperature: 300.0,
                p1: 400.0,
                expansion_ratio: 2.5,
            }),
        );
        let cycle = run_cycle(&config).unwrap();
        let points: Vec<_> = sample_leg(&cycle, &cycle.processes[0], DiagramKind::Ts, 9)
            .unwrap()
            .collect();
        assert!(points.iter().all(|pt| (pt.y - 800.0).abs() < 1e-9));
        assert!(points.windows(2).all(|w| w[1].x > w[0].x));
    }

    #[test]
    fn diagram_emits_each_vertex_once() {
        let cycle = diesel();
        let sampler = sample_diagram(&cycle, DiagramKind::Ph, 5).unwrap();
        assert_eq!(sampler.len(), 4 * 5);
        let points: Vec<_> = sampler.collect();
        assert_eq!(points.len(), 20);

        let labels: Vec<_> = points.iter().filter_map(|p| p.label.clone()).collect();
        assert_eq!(labels, ["1", "2", "3", "4"]);
        assert_eq!(points[0].x, cycle.states[0].enthalpy());
    }

    #[test]
    fn zero_segments_is_invalid() {
        let cycle = diesel();
        assert!(matches!(
            sample_diagram(&cycle, DiagramKind::Pv, 0),
            Err(CycleError::InvalidArg { .. })
        ));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("PV".parse::<DiagramKind>().unwrap(), DiagramKind::Pv);
        assert_eq!(" ts ".parse::<DiagramKind>().unwrap(), DiagramKind::Ts);
        assert!("hs".parse::<DiagramKind>().is_err());
    }
}
