//! Boundary watchdog for the robot pose.
//!
//! The monitor keeps the most recent pose and a fixed pair of axis
//! thresholds. A pose is out of bounds when it drops below *either*
//! threshold (strict `<`). There is no hysteresis or debouncing: each
//! evaluation looks only at the latest pose.
//!
//! ```text
//!            x1 < threshold_x  OR  y1 < threshold_y
//!   Nominal ────────────────────────────────────────▶ Violated
//!           ◀────────────────────────────────────────
//!            x1 >= threshold_x AND y1 >= threshold_y
//! ```
//!
//! Until a pose has been received (or when a cycle has no pose data) the
//! verdict is [`Verdict::Unknown`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::WorldPoint;

/// Robot position as reported by the controller (`x1`, `y1`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotPose {
    pub x: f64,
    pub y: f64,
}

impl RobotPose {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

/// Lower bounds on the robot position, one per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub x: f64,
    pub y: f64,
}

impl Thresholds {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when the pose is below either threshold
    #[inline]
    pub fn is_violated_by(&self, pose: RobotPose) -> bool {
        pose.x < self.x || pose.y < self.y
    }
}

/// Result of a boundary check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Pose is within both thresholds
    Nominal,
    /// Pose is below at least one threshold
    Violated,
    /// No pose available to check
    Unknown,
}

impl Verdict {
    #[inline]
    pub fn is_violated(self) -> bool {
        self == Verdict::Violated
    }
}

/// Holds the latest pose and evaluates it against fixed thresholds.
#[derive(Clone, Debug)]
pub struct BoundaryMonitor {
    thresholds: Thresholds,
    pose: Option<RobotPose>,
    last_verdict: Verdict,
}

impl BoundaryMonitor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            pose: None,
            last_verdict: Verdict::Unknown,
        }
    }

    #[inline]
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Latest pose, `None` until one has been received
    #[inline]
    pub fn pose(&self) -> Option<RobotPose> {
        self.pose
    }

    /// Verdict returned by the last [`observe`](Self::observe)
    #[inline]
    pub fn last_verdict(&self) -> Verdict {
        self.last_verdict
    }

    /// Replace the stored pose unconditionally
    pub fn update_pose(&mut self, pose: RobotPose) {
        self.pose = Some(pose);
    }

    /// Evaluate the stored pose
    pub fn evaluate(&self) -> Verdict {
        match self.pose {
            None => Verdict::Unknown,
            Some(pose) if self.thresholds.is_violated_by(pose) => Verdict::Violated,
            Some(_) => Verdict::Nominal,
        }
    }

    /// Run one cycle's boundary check.
    ///
    /// With `Some(pose)` the pose is stored and evaluated. With `None` the
    /// stored pose is left untouched and the verdict is `Unknown`; a stale
    /// pose is never re-evaluated.
    pub fn observe(&mut self, pose: Option<RobotPose>) -> Verdict {
        let verdict = match pose {
            Some(pose) => {
                self.update_pose(pose);
                self.evaluate()
            }
            None => Verdict::Unknown,
        };

        if verdict != self.last_verdict {
            match (self.last_verdict, verdict, pose) {
                (_, Verdict::Violated, Some(p)) => info!(
                    "Boundary violated: pose ({:.1}, {:.1}) below thresholds ({:.1}, {:.1})",
                    p.x, p.y, self.thresholds.x, self.thresholds.y
                ),
                (Verdict::Violated, Verdict::Nominal, _) => info!("Pose back within boundary"),
                (from, to, _) => info!("Boundary state {:?} -> {:?}", from, to),
            }
        }

        self.last_verdict = verdict;
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> BoundaryMonitor {
        BoundaryMonitor::new(Thresholds::new(-1300.0, -2500.0))
    }

    fn verdict_for(x: f64, y: f64) -> Verdict {
        let mut m = monitor();
        m.update_pose(RobotPose::new(x, y));
        m.evaluate()
    }

    #[test]
    fn test_no_pose_is_unknown() {
        assert_eq!(monitor().evaluate(), Verdict::Unknown);
        assert_eq!(monitor().pose(), None);
    }

    #[test]
    fn test_either_axis_violates() {
        assert_eq!(verdict_for(-1301.0, 0.0), Verdict::Violated);
        assert_eq!(verdict_for(0.0, -2501.0), Verdict::Violated);
        assert_eq!(verdict_for(-1301.0, -2501.0), Verdict::Violated);
        assert_eq!(verdict_for(0.0, 0.0), Verdict::Nominal);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(verdict_for(-1300.0, -2500.0), Verdict::Nominal);
        assert_eq!(verdict_for(-1300.001, -2500.0), Verdict::Violated);
    }

    #[test]
    fn test_origin_pose_distinct_from_no_pose() {
        let mut m = monitor();
        assert_eq!(m.evaluate(), Verdict::Unknown);
        m.update_pose(RobotPose::new(0.0, 0.0));
        assert_eq!(m.pose(), Some(RobotPose::new(0.0, 0.0)));
        assert_eq!(m.evaluate(), Verdict::Nominal);
    }

    #[test]
    fn test_no_hysteresis() {
        let mut m = monitor();
        let sequence = [
            (-1301.0, Verdict::Violated),
            (-1299.0, Verdict::Nominal),
            (-1301.0, Verdict::Violated),
            (-1299.0, Verdict::Nominal),
        ];
        for (x, expected) in sequence {
            assert_eq!(m.observe(Some(RobotPose::new(x, 0.0))), expected);
            assert_eq!(m.last_verdict(), expected);
        }
    }

    #[test]
    fn test_missing_pose_keeps_stored_pose() {
        let mut m = monitor();
        assert_eq!(m.observe(Some(RobotPose::new(-2000.0, 0.0))), Verdict::Violated);
        assert_eq!(m.observe(None), Verdict::Unknown);
        assert_eq!(m.pose(), Some(RobotPose::new(-2000.0, 0.0)));
        assert_eq!(m.last_verdict(), Verdict::Unknown);
    }
}
