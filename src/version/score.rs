//! Version score encoding
//!
//! A version is turned into a single integer by concatenating its
//! major, minor and patch components, each zero-padded to a fixed width.
//! With the default width of 3, `1.2.3` scores `1_002_003`, so the
//! difference between two scores reflects how far apart the versions are.

use tracing::warn;

use crate::version::semver::Version;

/// Default number of decimal digits reserved for each component
pub const DEFAULT_PADDING: usize = 3;

/// Number of leading components that contribute to a score
const SCORED_COMPONENTS: usize = 3;

/// Controls how versions are encoded into scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePolicy {
    /// Digits reserved per component (at least 1)
    pub padding: usize,
    /// Keep components wider than `padding` instead of capping them
    pub allow_overflow: bool,
    /// Drop the major component and score `0.x.y` as if it were `x.y.0`
    pub shift_left: bool,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            allow_overflow: false,
            shift_left: false,
        }
    }
}

impl ScorePolicy {
    /// Same policy with shift-left enabled
    pub fn shifted(self) -> Self {
        Self {
            shift_left: true,
            ..self
        }
    }
}

/// Encode a version into a comparable integer score.
///
/// Components are consumed from patch up to major and prepended to the
/// result, each left-padded with zeros to `policy.padding` digits. Missing
/// components count as `0`; components past patch are ignored.
///
/// Unless overflow is allowed, a component wider than the padding that does
/// not start with `0` is capped at the largest value the width can hold,
/// so a minor of `1000` cannot spill into the major digits.
///
/// Scores that do not fit an `i64` saturate at `i64::MAX`.
pub fn encode(version: &Version, policy: ScorePolicy) -> i64 {
    let padding = policy.padding.max(1);

    let mut positions: Vec<&str> = (0..SCORED_COMPONENTS)
        .map(|index| version.component(index))
        .collect();
    if policy.shift_left {
        positions.remove(0);
        positions.push("0");
    }

    let cap = "9".repeat(padding);
    let mut encoded = String::with_capacity(padding * SCORED_COMPONENTS);

    for component in positions.into_iter().rev() {
        let component = if !policy.allow_overflow
            && component.len() > padding
            && !component.starts_with('0')
        {
            cap.as_str()
        } else {
            component
        };
        encoded.insert_str(0, &format!("{component:0>padding$}"));
    }

    encoded.parse().unwrap_or_else(|_| {
        warn!("Score for version {} exceeds i64, saturating", version);
        i64::MAX
    })
}

/// Score difference between the latest and current version.
///
/// Positive when `current` is behind, zero when up to date and negative
/// when `current` is ahead of what the registry calls latest.
pub fn diff(current: &Version, latest: &Version, policy: ScorePolicy) -> i64 {
    encode(latest, policy).saturating_sub(encode(current, policy))
}
