//! Engine session: cycle evaluation and diagram sampling behind bounded caches.

use std::sync::Arc;

use serde::Serialize;
use tc_cache::{Cache, CacheKey, CacheStats};
use tc_cycles::{
    ChartPoint, CycleError, DiagramKind, SimulationConfig, ThermodynamicCycle, cycle_key,
    run_cycle, sample_diagram,
};

use crate::error::{AppError, AppResult};

/// Options for an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineOptions {
    /// Maximum number of memoized cycles.
    pub cycle_cache_capacity: usize,
    /// Maximum number of memoized point sets, per diagram kind.
    pub diagram_cache_capacity: usize,
    /// Segments sampled along each leg.
    pub samples_per_leg: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cycle_cache_capacity: 64,
            diagram_cache_capacity: 32,
            samples_per_leg: tc_cycles::DEFAULT_SEGMENTS,
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> AppResult<()> {
        if self.cycle_cache_capacity == 0 {
            return Err(AppError::Options {
                what: "cycle_cache_capacity must be at least 1",
            });
        }
        if self.diagram_cache_capacity == 0 {
            return Err(AppError::Options {
                what: "diagram_cache_capacity must be at least 1",
            });
        }
        if self.samples_per_leg == 0 {
            return Err(AppError::Options {
                what: "samples_per_leg must be at least 1",
            });
        }
        Ok(())
    }
}

/// Counters of every cache an engine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineCacheStats {
    pub cycles: CacheStats,
    pub pv: CacheStats,
    pub ts: CacheStats,
    pub ph: CacheStats,
}

type DiagramCache = Cache<CacheKey, Arc<[ChartPoint]>>;

/// One calculation session.
///
/// Owns a cycle cache and an independent diagram cache per [`DiagramKind`]. Methods
/// take `&mut self`; share an engine across threads by wrapping it in a `Mutex`.
#[derive(Debug)]
pub struct CycleEngine {
    options: EngineOptions,
    cycles: Cache<CacheKey, Arc<ThermodynamicCycle>>,
    pv: DiagramCache,
    ts: DiagramCache,
    ph: DiagramCache,
}

impl CycleEngine {
    pub fn new(options: EngineOptions) -> AppResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            cycles: Cache::new("cycles", options.cycle_cache_capacity)?,
            pv: Cache::new("pv-diagrams", options.diagram_cache_capacity)?,
            ts: Cache::new("ts-diagrams", options.diagram_cache_capacity)?,
            ph: Cache::new("ph-diagrams", options.diagram_cache_capacity)?,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluate `config`, reusing a memoized result for an identical configuration.
    ///
    /// Fluid names are resolved first, so `"air"` and `"Air"` share one entry. The
    /// returned cycle's `id()` is the cache key.
    pub fn compute_cycle(&mut self, config: &SimulationConfig) -> AppResult<Arc<ThermodynamicCycle>> {
        let fluid = tc_fluids::lookup(&config.fluid)?;
        let key = cycle_key(config, fluid)?;

        if let Some(cycle) = self.cycles.get(&key) {
            return Ok(Arc::clone(cycle));
        }

        let cycle = Arc::new(run_cycle(config)?);
        self.cycles.set(key, Arc::clone(&cycle));
        Ok(cycle)
    }

    /// Points of `cycle` on `kind` at the session's sampling density.
    pub fn sample_diagram(
        &mut self,
        cycle: &ThermodynamicCycle,
        kind: DiagramKind,
    ) -> AppResult<Arc<[ChartPoint]>> {
        let segments = self.options.samples_per_leg;
        self.sample_diagram_with(cycle, kind, segments)
    }

    /// Points of `cycle` on `kind` with `segments` intervals per leg.
    ///
    /// Memoized by diagram kind, cycle id and segment count. The id is the content
    /// hash of the cycle's configuration, so distinct cycles never share points.
    pub fn sample_diagram_with(
        &mut self,
        cycle: &ThermodynamicCycle,
        kind: DiagramKind,
        segments: usize,
    ) -> AppResult<Arc<[ChartPoint]>> {
        if segments == 0 {
            return Err(CycleError::InvalidArg {
                what: "a leg needs at least one segment",
            }
            .into());
        }
        let key = CacheKey::from_args(kind.label(), &(cycle.id(), segments))?;
        let cache = self.diagram_cache(kind);

        if let Some(points) = cache.get(&key) {
            return Ok(Arc::clone(points));
        }

        let points: Arc<[ChartPoint]> = sample_diagram(cycle, kind, segments)?.collect();
        cache.set(key, Arc::clone(&points));
        Ok(points)
    }

    pub fn cache_stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            cycles: self.cycles.stats(),
            pv: self.pv.stats(),
            ts: self.ts.stats(),
            ph: self.ph.stats(),
        }
    }

    /// Drop every memoized result.
    pub fn clear_caches(&mut self) {
        self.cycles.clear();
        self.pv.clear();
        self.ts.clear();
        self.ph.clear();
    }

    fn diagram_cache(&mut self, kind: DiagramKind) -> &mut DiagramCache {
        match kind {
            DiagramKind::Pv => &mut self.pv,
            DiagramKind::Ts => &mut self.ts,
            DiagramKind::Ph => &mut self.ph,
        }
    }
}
