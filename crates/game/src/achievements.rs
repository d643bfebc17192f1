//! Achievement catalog and evaluation over an immutable statistics snapshot.
//!
//! Unlocking returns the reward; `Session::grant_reward` applies it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::player::{GemColor, Upgrade};

/// Reference tag of the missions the tech_master achievement tracks.
pub const TECH_REFERENCE: &str = "https://github.com/wisrovi/wkafka";
/// Zones a full exploration covers.
pub const ZONE_COUNT: usize = 8;

/// Statistic updates fed in by gameplay.
#[derive(Debug, Clone, PartialEq)]
pub enum StatUpdate {
    VisitZone(String),
    MissionCompleted,
    /// Landing fall height.
    Jump(f32),
    /// Speed in units per second.
    Speed(f32),
}

/// Statistics accumulated by the book itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressStats {
    pub zones_visited: BTreeSet<String>,
    pub missions_completed: u32,
    pub highest_jump: f32,
    pub top_speed: f32,
}

/// Statistics owned elsewhere (wallet, upgrades, mission board).
#[derive(Debug, Clone, Default)]
pub struct LiveStats {
    pub coins: u32,
    pub gems: BTreeMap<GemColor, u32>,
    pub upgrades_owned: usize,
    pub reference_missions_completed: usize,
    pub reference_missions_total: usize,
}

/// Everything predicates may look at.
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub zones_visited: usize,
    pub missions_completed: u32,
    pub highest_jump: f32,
    pub top_speed: f32,
    pub coins: u32,
    pub gems: BTreeMap<GemColor, u32>,
    pub upgrades_owned: usize,
    pub reference_missions_completed: usize,
    pub reference_missions_total: usize,
}

impl StatsSnapshot {
    fn gem(&self, color: GemColor) -> u32 {
        self.gems.get(&color).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementReward {
    pub coins: u32,
    pub xp: u32,
}

pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub reward: AchievementReward,
    pub predicate: fn(&StatsSnapshot) -> bool,
    pub completed: bool,
}

/// A fresh unlock, for notification and reward granting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementUnlock {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub reward: AchievementReward,
}

impl AchievementUnlock {
    pub fn message(&self) -> String {
        format!(
            "Achievement unlocked! {} {} +{} coins, +{} XP",
            self.title, self.icon, self.reward.coins, self.reward.xp
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSave {
    pub unlocked: BTreeSet<String>,
}

fn first_mission(s: &StatsSnapshot) -> bool {
    s.missions_completed >= 1
}
fn explorer(s: &StatsSnapshot) -> bool {
    s.zones_visited >= ZONE_COUNT
}
fn collector(s: &StatsSnapshot) -> bool {
    GemColor::ALL.iter().all(|c| s.gem(*c) > 0)
}
fn jumper(s: &StatsSnapshot) -> bool {
    s.highest_jump > 6.0
}
fn speed_demon(s: &StatsSnapshot) -> bool {
    s.top_speed > 15.0
}
fn tech_master(s: &StatsSnapshot) -> bool {
    s.reference_missions_total > 0 && s.reference_missions_completed == s.reference_missions_total
}
fn half_way(s: &StatsSnapshot) -> bool {
    s.missions_completed >= 4
}
fn rich(s: &StatsSnapshot) -> bool {
    s.coins >= 500
}
fn fully_upgraded(s: &StatsSnapshot) -> bool {
    s.upgrades_owned >= Upgrade::ALL.len()
}
fn master_engineer(s: &StatsSnapshot) -> bool {
    s.missions_completed >= 8
}

fn entry(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    coins: u32,
    xp: u32,
    predicate: fn(&StatsSnapshot) -> bool,
) -> Achievement {
    Achievement {
        id,
        title,
        description,
        icon,
        reward: AchievementReward { coins, xp },
        predicate,
        completed: false,
    }
}

fn catalog() -> Vec<Achievement> {
    vec![
        entry("first_mission", "First Step", "Complete your first mission", "🏆", 50, 25, first_mission),
        entry("explorer", "Explorer", "Visit every zone of the campus", "🧭", 100, 50, explorer),
        entry("collector", "Collector", "Own at least one gem of every color", "💎", 150, 75, collector),
        entry("jumper", "Expert Jumper", "Land an epic jump from a great height", "🚀", 75, 40, jumper),
        entry("speed_demon", "Speed Demon", "Reach top speed in the car", "🏎️", 80, 35, speed_demon),
        entry("tech_master", "Tech Master", "Complete every mission of one project", "🧠", 200, 100, tech_master),
        entry("half_way", "Half Way", "Complete 4 missions", "🔄", 120, 60, half_way),
        entry("rich", "Wealthy", "Hold 500 coins", "💰", 100, 50, rich),
        entry("fully_upgraded", "Fully Upgraded", "Buy every upgrade", "⚡", 150, 80, fully_upgraded),
        entry("master_engineer", "Master Engineer", "Complete every mission in the game", "🎓", 300, 150, master_engineer),
    ]
}

pub struct AchievementBook {
    achievements: Vec<Achievement>,
    unlocked: BTreeSet<String>,
    progress: ProgressStats,
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementBook {
    pub fn new() -> Self {
        Self {
            achievements: catalog(),
            unlocked: BTreeSet::new(),
            progress: ProgressStats::default(),
        }
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn progress(&self) -> &ProgressStats {
        &self.progress
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Combine own progress with `live` into a snapshot.
    pub fn snapshot(&self, live: &LiveStats) -> StatsSnapshot {
        StatsSnapshot {
            zones_visited: self.progress.zones_visited.len(),
            missions_completed: self.progress.missions_completed,
            highest_jump: self.progress.highest_jump,
            top_speed: self.progress.top_speed,
            coins: live.coins,
            gems: live.gems.clone(),
            upgrades_owned: live.upgrades_owned,
            reference_missions_completed: live.reference_missions_completed,
            reference_missions_total: live.reference_missions_total,
        }
    }

    /// Evaluate every locked achievement. Returns the new unlocks.
    pub fn check_all(&mut self, live: &LiveStats) -> Vec<AchievementUnlock> {
        let snapshot = self.snapshot(live);
        let due: Vec<&'static str> = self
            .achievements
            .iter()
            .filter(|a| !a.completed && !self.unlocked.contains(a.id))
            .filter(|a| (a.predicate)(&snapshot))
            .map(|a| a.id)
            .collect();
        due.into_iter().filter_map(|id| self.unlock(id)).collect()
    }

    /// Mark `id` unlocked. None when unknown or already unlocked.
    pub fn unlock(&mut self, id: &str) -> Option<AchievementUnlock> {
        if self.unlocked.contains(id) {
            return None;
        }
        let Some(a) = self.achievements.iter_mut().find(|a| a.id == id) else {
            log::warn!("Unknown achievement: {}", id);
            return None;
        };
        a.completed = true;
        self.unlocked.insert(a.id.to_string());
        log::info!("Achievement unlocked: {}", a.title);
        Some(AchievementUnlock {
            id: a.id,
            title: a.title,
            icon: a.icon,
            reward: a.reward,
        })
    }

    /// Fold `update` into the statistics, then evaluate.
    pub fn update_stat(&mut self, update: StatUpdate, live: &LiveStats) -> Vec<AchievementUnlock> {
        match update {
            StatUpdate::VisitZone(zone) => {
                if self.progress.zones_visited.insert(zone.clone()) {
                    log::info!("Zone visited: {}", zone);
                }
            }
            StatUpdate::MissionCompleted => self.progress.missions_completed += 1,
            StatUpdate::Jump(height) => {
                self.progress.highest_jump = self.progress.highest_jump.max(height);
            }
            StatUpdate::Speed(speed) => self.progress.top_speed = self.progress.top_speed.max(speed),
        }
        self.check_all(live)
    }

    /// Align the mission counter with a restored board.
    pub fn set_missions_completed(&mut self, count: u32) {
        self.progress.missions_completed = count;
    }

    pub fn serialize(&self) -> AchievementSave {
        AchievementSave {
            unlocked: self.unlocked.clone(),
        }
    }

    /// Replace the unlocked set and resync every entry's completed flag.
    pub fn restore(&mut self, save: &AchievementSave) {
        self.unlocked = save.unlocked.clone();
        for a in &mut self.achievements {
            a.completed = self.unlocked.contains(a.id);
        }
    }
}
