//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the kinds of static city geometry.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// The open ground plane.
    Ground = 1 << 0,
    /// Zone platforms (drivable, low).
    Platform = 1 << 1,
    /// Buildings and towers (walls for the vehicle).
    Structure = 1 << 2,
    /// Jump ramps (drivable slopes).
    Ramp = 1 << 3,
}

impl CollisionGroup {
    /// Membership/filter pair for a static collider of this kind.
    pub fn groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_retain(self as u32), Group::ALL)
    }

    /// Bit of this group.
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Which part of the city a query should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSet {
    /// Only what blocks horizontal movement.
    StructuresOnly,
    /// Everything a ground probe may land on.
    All,
}

impl CollisionSet {
    pub fn from_structures_only(structures_only: bool) -> Self {
        if structures_only {
            CollisionSet::StructuresOnly
        } else {
            CollisionSet::All
        }
    }

    /// Membership mask for this set.
    pub fn mask(self) -> Group {
        match self {
            CollisionSet::StructuresOnly => Group::from_bits_retain(CollisionGroup::Structure.bits()),
            CollisionSet::All => Group::from_bits_retain(
                CollisionGroup::Ground.bits()
                    | CollisionGroup::Platform.bits()
                    | CollisionGroup::Structure.bits()
                    | CollisionGroup::Ramp.bits(),
            ),
        }
    }

    /// Query filter that only accepts colliders in this set.
    pub fn filter(self) -> QueryFilter<'static> {
        QueryFilter::default().groups(InteractionGroups::new(Group::ALL, self.mask()))
    }

    /// Whether a collider with `groups` belongs to this set.
    pub fn contains(self, groups: InteractionGroups) -> bool {
        groups.memberships.intersects(self.mask())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structures_only_excludes_ground_and_ramps() {
        let set = CollisionSet::StructuresOnly;
        assert!(set.contains(CollisionGroup::Structure.groups()));
        assert!(!set.contains(CollisionGroup::Ground.groups()));
        assert!(!set.contains(CollisionGroup::Ramp.groups()));
        assert!(!set.contains(CollisionGroup::Platform.groups()));
    }

    #[test]
    fn all_set_contains_every_group() {
        let set = CollisionSet::All;
        for g in [
            CollisionGroup::Ground,
            CollisionGroup::Platform,
            CollisionGroup::Structure,
            CollisionGroup::Ramp,
        ] {
            assert!(set.contains(g.groups()));
        }
    }
}
