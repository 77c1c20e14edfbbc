//! Per-cycle orchestration.
//!
//! One cycle runs to completion before the next starts:
//!
//! ```text
//! GridPayload ─▶ parse ─▶ decode ─▶ group ─▶ centroid ──┐
//!                                                       ├─▶ CycleResult
//! PosePayload ─▶ pose ──▶ BoundaryMonitor ─▶ Verdict ───┘
//!                                              │
//!                                   Violated ──┴─▶ ActionGateway (fixed target)
//! ```
//!
//! The only state that outlives a cycle is held by [`CleaningOrchestrator`]
//! itself: the boundary monitor's last pose and the controller map id.
//! The action target is fixed configuration data and does not depend on
//! the detected regions.

use tracing::{debug, info, warn};

use crate::core::{DenseGrid, GridDescriptor, WorldPoint};
use crate::coverage::{self, CleaningRegion, RegionGrouper, ScanOrderRegionGrouper};
use crate::error::Result;
use crate::io::payload::{GridPayload, PosePayload};
use crate::monitor::{BoundaryMonitor, RobotPose, Thresholds, Verdict};

/// Receiver of corrective spot-clean requests.
///
/// Fire-and-forget: implementations handle their own failures.
pub trait ActionGateway {
    /// Ask the robot to spot-clean around `target` on map `map_id`
    fn request_spot_clean(&mut self, target: WorldPoint, map_id: &str);
}

impl<G: ActionGateway + ?Sized> ActionGateway for &mut G {
    fn request_spot_clean(&mut self, target: WorldPoint, map_id: &str) {
        (**self).request_spot_clean(target, map_id);
    }
}

/// A spot-clean request captured by [`RecordingGateway`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpotCleanRequest {
    pub target: WorldPoint,
    pub map_id: String,
}

/// Gateway that records requests instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct RecordingGateway {
    requests: Vec<SpotCleanRequest>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests received so far
    pub fn requests(&self) -> &[SpotCleanRequest] {
        &self.requests
    }
}

impl ActionGateway for RecordingGateway {
    fn request_spot_clean(&mut self, target: WorldPoint, map_id: &str) {
        self.requests.push(SpotCleanRequest {
            target,
            map_id: map_id.to_string(),
        });
    }
}

/// What the cycle did about the boundary verdict.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionOutcome {
    /// Verdict was not `Violated`
    NotTriggered,
    /// Spot-clean request sent to the gateway
    Requested(WorldPoint),
    /// Verdict was `Violated` but no map id is known yet
    SkippedNoMapId,
}

/// Everything one cycle produced.
#[derive(Clone, Debug)]
pub struct CycleResult {
    /// Cycle counter, starting at 1
    pub cycle: u64,
    pub descriptor: GridDescriptor,
    /// Decoded grid
    pub grid: DenseGrid,
    /// Regions with centroids, in grouper order
    pub regions: Vec<CleaningRegion>,
    /// Pose used for this cycle's check, `None` if pose data was missing
    pub pose: Option<RobotPose>,
    pub verdict: Verdict,
    pub action: ActionOutcome,
}

impl CycleResult {
    /// Total uncleaned cells across all regions
    pub fn uncleaned_cells(&self) -> usize {
        self.regions.iter().map(CleaningRegion::size).sum()
    }

    /// Region with the most cells (first one wins on ties)
    pub fn largest_region(&self) -> Option<&CleaningRegion> {
        self.regions
            .iter()
            .fold(None, |best: Option<&CleaningRegion>, r| match best {
                Some(b) if b.size() >= r.size() => Some(b),
                _ => Some(r),
            })
    }
}

/// Composes decode, grouping, centroids and the boundary check.
pub struct CleaningOrchestrator<G: ActionGateway> {
    gateway: G,
    monitor: BoundaryMonitor,
    grouper: Box<dyn RegionGrouper>,
    action_target: WorldPoint,
    map_id: Option<String>,
    cycles: u64,
}

impl<G: ActionGateway> CleaningOrchestrator<G> {
    /// Create an orchestrator using scan-order grouping
    pub fn new(gateway: G, thresholds: Thresholds, action_target: WorldPoint) -> Self {
        Self {
            gateway,
            monitor: BoundaryMonitor::new(thresholds),
            grouper: Box::new(ScanOrderRegionGrouper),
            action_target,
            map_id: None,
            cycles: 0,
        }
    }

    /// Replace the region grouper
    pub fn with_grouper(mut self, grouper: Box<dyn RegionGrouper>) -> Self {
        self.grouper = grouper;
        self
    }

    /// Set the controller map id used for spot-clean requests
    pub fn with_map_id(mut self, map_id: impl Into<String>) -> Self {
        self.map_id = Some(map_id.into());
        self
    }

    /// Update the controller map id. `None` keeps the current one.
    pub fn set_map_id(&mut self, map_id: Option<String>) {
        if let Some(id) = map_id {
            if self.map_id.as_deref() != Some(id.as_str()) {
                info!("Controller map id: {}", id);
            }
            self.map_id = Some(id);
        }
    }

    pub fn map_id(&self) -> Option<&str> {
        self.map_id.as_deref()
    }

    pub fn monitor(&self) -> &BoundaryMonitor {
        &self.monitor
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn action_target(&self) -> WorldPoint {
        self.action_target
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle.
    ///
    /// A malformed grid payload aborts the cycle before any state changes.
    /// Missing pose data (`pose_payload` of `None`, or a payload without
    /// `x1`/`y1`) only affects the boundary check: regions are still
    /// returned, the verdict is [`Verdict::Unknown`] and no action is taken.
    pub fn run_cycle(
        &mut self,
        grid_payload: &GridPayload,
        pose_payload: Option<&PosePayload>,
    ) -> Result<CycleResult> {
        let (descriptor, stream) = grid_payload.parse()?;

        let grid = coverage::decode(&stream, descriptor.size_x, descriptor.size_y);
        let regions = self.grouper.group(&grid);
        let regions = coverage::locate_regions(regions, &descriptor);

        let pose = match pose_payload.map(PosePayload::pose) {
            Some(Ok(pose)) => Some(pose),
            Some(Err(e)) => {
                warn!("{}; boundary check skipped", e);
                None
            }
            None => {
                warn!("No pose data this cycle; boundary check skipped");
                None
            }
        };

        let verdict = self.monitor.observe(pose);
        let action = self.act_on(verdict);

        self.cycles += 1;
        let result = CycleResult {
            cycle: self.cycles,
            descriptor,
            grid,
            regions,
            pose,
            verdict,
            action,
        };

        debug!(
            "Cycle {}: {}x{} grid, {} regions ({} uncleaned cells, {}), verdict {:?}",
            result.cycle,
            descriptor.size_x,
            descriptor.size_y,
            result.regions.len(),
            result.uncleaned_cells(),
            self.grouper.name(),
            verdict
        );

        Ok(result)
    }

    fn act_on(&mut self, verdict: Verdict) -> ActionOutcome {
        if !verdict.is_violated() {
            return ActionOutcome::NotTriggered;
        }

        match self.map_id.as_deref() {
            Some(map_id) => {
                self.gateway.request_spot_clean(self.action_target, map_id);
                ActionOutcome::Requested(self.action_target)
            }
            None => {
                warn!("Boundary violated but no map id known yet; spot clean not requested");
                ActionOutcome::SkippedNoMapId
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellIndex, CellState};
    use crate::coverage::{GroupingStrategy, RunLengthStream, encode};

    fn payload(counts: &[usize], size_x: usize, size_y: usize) -> GridPayload {
        GridPayload {
            lower_left_x: Some(0.0),
            lower_left_y: Some(0.0),
            size_x: Some(size_x),
            size_y: Some(size_y),
            resolution: Some(1.0),
            cleaned: Some(counts.to_vec()),
        }
    }

    fn orchestrator() -> CleaningOrchestrator<RecordingGateway> {
        CleaningOrchestrator::new(
            RecordingGateway::new(),
            Thresholds::new(-1300.0, -2500.0),
            WorldPoint::ZERO,
        )
        .with_map_id("7")
    }

    #[test]
    fn test_cycle_regions_and_centroids() {
        let mut orch = orchestrator();
        // 4x2: ..## / #..#
        let result = orch
            .run_cycle(&payload(&[2, 3, 2, 1], 4, 2), Some(&PosePayload::new(0.0, 0.0)))
            .unwrap();

        assert_eq!(result.regions.len(), 2);
        assert_eq!(result.regions[0].size(), 3);
        assert!((result.regions[0].centroid.x - 5.0 / 3.0).abs() < 1e-9);
        assert!((result.regions[0].centroid.y - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.regions[1].size(), 1);
        assert_eq!(result.uncleaned_cells(), 4);
        assert_eq!(result.largest_region().map(CleaningRegion::size), Some(3));
        assert_eq!(result.verdict, Verdict::Nominal);
        assert_eq!(result.action, ActionOutcome::NotTriggered);
        assert_eq!(result.cycle, 1);
        assert!(orch.gateway().requests().is_empty());
    }

    #[test]
    fn test_violation_requests_fixed_target() {
        let mut orch = CleaningOrchestrator::new(
            RecordingGateway::new(),
            Thresholds::new(-1300.0, -2500.0),
            WorldPoint::new(120.0, -40.0),
        )
        .with_map_id("3");

        let result = orch
            .run_cycle(&payload(&[1, 1], 3, 3), Some(&PosePayload::new(-1500.0, 0.0)))
            .unwrap();

        assert_eq!(result.verdict, Verdict::Violated);
        assert_eq!(result.action, ActionOutcome::Requested(WorldPoint::new(120.0, -40.0)));
        assert_eq!(
            orch.gateway().requests(),
            &[SpotCleanRequest {
                target: WorldPoint::new(120.0, -40.0),
                map_id: "3".to_string(),
            }]
        );
    }

    #[test]
    fn test_violation_without_map_id_skips_gateway() {
        let mut orch = CleaningOrchestrator::new(
            RecordingGateway::new(),
            Thresholds::new(-1300.0, -2500.0),
            WorldPoint::ZERO,
        );
        let result = orch
            .run_cycle(&payload(&[], 2, 2), Some(&PosePayload::new(0.0, -3000.0)))
            .unwrap();

        assert_eq!(result.verdict, Verdict::Violated);
        assert_eq!(result.action, ActionOutcome::SkippedNoMapId);
        assert!(orch.gateway().requests().is_empty());

        orch.set_map_id(Some("9".into()));
        orch.run_cycle(&payload(&[], 2, 2), Some(&PosePayload::new(0.0, -3000.0)))
            .unwrap();
        assert_eq!(orch.gateway().requests().len(), 1);
        assert_eq!(orch.map_id(), Some("9"));

        orch.set_map_id(None);
        assert_eq!(orch.map_id(), Some("9"));
    }

    #[test]
    fn test_missing_pose_still_returns_regions() {
        let mut orch = orchestrator();
        let pose = PosePayload {
            x1: Some(-5000.0),
            y1: None,
        };
        let result = orch.run_cycle(&payload(&[0, 2], 2, 2), Some(&pose)).unwrap();

        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.pose, None);
        assert_eq!(result.verdict, Verdict::Unknown);
        assert_eq!(result.action, ActionOutcome::NotTriggered);
        assert!(orch.gateway().requests().is_empty());

        let result = orch.run_cycle(&payload(&[0, 2], 2, 2), None).unwrap();
        assert_eq!(result.verdict, Verdict::Unknown);
        assert!(orch.gateway().requests().is_empty());
    }

    #[test]
    fn test_missing_pose_does_not_reuse_stale_violation() {
        let mut orch = orchestrator();
        orch.run_cycle(&payload(&[], 1, 1), Some(&PosePayload::new(-2000.0, 0.0)))
            .unwrap();
        assert_eq!(orch.gateway().requests().len(), 1);

        let result = orch.run_cycle(&payload(&[], 1, 1), None).unwrap();
        assert_eq!(result.verdict, Verdict::Unknown);
        assert_eq!(orch.gateway().requests().len(), 1);
        assert_eq!(orch.monitor().pose(), Some(RobotPose::new(-2000.0, 0.0)));
    }

    #[test]
    fn test_malformed_grid_aborts_cycle() {
        let mut orch = orchestrator();
        let mut bad = payload(&[1, 1], 2, 2);
        bad.size_y = None;

        let err = orch
            .run_cycle(&bad, Some(&PosePayload::new(-9999.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, crate::error::MarjanaError::MalformedGridPayload(_)));
        assert!(orch.gateway().requests().is_empty());
        assert_eq!(orch.monitor().pose(), None);
        assert_eq!(orch.cycles(), 0);
    }

    #[test]
    fn test_connected_grouper_swap() {
        let mut grid = DenseGrid::new(3, 3);
        for (r, c) in [(0, 1), (1, 1), (2, 1)] {
            grid.set(CellIndex::new(r, c), CellState::NotCleaned);
        }
        let stream: RunLengthStream = encode(&grid);
        let grid_payload = payload(stream.counts(), 3, 3);

        let mut scan = orchestrator();
        let mut flood = orchestrator().with_grouper(GroupingStrategy::FourConnected.build());

        let pose = PosePayload::new(0.0, 0.0);
        assert_eq!(scan.run_cycle(&grid_payload, Some(&pose)).unwrap().regions.len(), 3);
        let flooded = flood.run_cycle(&grid_payload, Some(&pose)).unwrap();
        assert_eq!(flooded.regions.len(), 1);
        assert!((flooded.regions[0].centroid.x - 1.0).abs() < 1e-9);
        assert!((flooded.regions[0].centroid.y - 1.0).abs() < 1e-9);
    }
}
