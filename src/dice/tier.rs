use std::ops::Range;

/// One band of the skill tier table: every tier in `tiers` rolls a die
/// with `faces` sides. The last band is open ended.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TierBand {
    pub tiers: Range<u32>,
    pub faces: u32,
}

/// Maps the abstract skill tier written after `s` to a concrete die
/// size. Bands are contiguous from zero and the final band covers
/// everything above it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SkillTierTable {
    bands: Vec<TierBand>,
}

const SKILL_TIERS: &[(u32, u32, u32)] = &[
    (0, 2, 40),
    (2, 4, 60),
    (4, 6, 90),
    (6, 8, 140),
    (8, 10, 220),
    (10, 11, 350),
    (11, u32::MAX, 375),
];

impl Default for SkillTierTable {
    fn default() -> Self {
        SkillTierTable {
            bands: SKILL_TIERS
                .iter()
                .map(|&(start, end, faces)| TierBand {
                    tiers: start..end,
                    faces,
                })
                .collect(),
        }
    }
}

impl SkillTierTable {
    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    /// Resolve a tier into a face count. Total: anything past the last
    /// band's start (including u32::MAX) lands in the last band.
    pub fn resolve(&self, tier: u32) -> u32 {
        self.bands
            .iter()
            .find(|band| band.tiers.contains(&tier))
            .or_else(|| self.bands.last())
            .map(|band| band.faces)
            .unwrap_or(0)
    }
}
