//! Player state: the car plus wallet, inventory, upgrades and derived stats.

use engine_core::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::vehicle::{Vehicle, VehicleTuning};

pub const STARTING_COINS: u32 = 100;
pub const INVENTORY_CAPACITY: usize = 12;
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 0.5, 0.0);

const DEFAULT_BODY_COLOR: [f32; 3] = [0.2, 0.4, 0.8];
const CUSTOM_BODY_COLOR: [f32; 3] = [1.0, 0.4, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GemColor {
    Blue,
    Green,
    Red,
    Violet,
}

impl GemColor {
    pub const ALL: [GemColor; 4] = [GemColor::Blue, GemColor::Green, GemColor::Red, GemColor::Violet];

    pub fn label(self) -> &'static str {
        match self {
            GemColor::Blue => "blue",
            GemColor::Green => "green",
            GemColor::Red => "red",
            GemColor::Violet => "violet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    SpeedBoost,
    GemDetector,
    VisualCustom,
    AnalysisBoost,
}

impl Upgrade {
    /// Market order; hotkeys 1-4 follow it.
    pub const ALL: [Upgrade; 4] = [
        Upgrade::SpeedBoost,
        Upgrade::GemDetector,
        Upgrade::VisualCustom,
        Upgrade::AnalysisBoost,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Upgrade::SpeedBoost => "speed_boost",
            Upgrade::GemDetector => "gem_detector",
            Upgrade::VisualCustom => "visual_custom",
            Upgrade::AnalysisBoost => "analysis_boost",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.id() == id)
    }

    pub fn cost(self) -> u32 {
        match self {
            Upgrade::SpeedBoost => 50,
            Upgrade::GemDetector => 75,
            Upgrade::VisualCustom => 30,
            Upgrade::AnalysisBoost => 100,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Upgrade::SpeedBoost => "Speed Boost",
            Upgrade::GemDetector => "Gem Detector",
            Upgrade::VisualCustom => "Custom Paint",
            Upgrade::AnalysisBoost => "Analysis Boost",
        }
    }
}

/// An item carried in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Ordered, capacity-bounded item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
    pub capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            capacity: INVENTORY_CAPACITY,
        }
    }
}

impl Inventory {
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Append `item`. Returns false when full.
    pub fn add(&mut self, item: InventoryItem) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Remove and return the first item with `id`.
    pub fn take(&mut self, id: &str) -> Option<InventoryItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }
}

/// Values recomputed from the upgrade flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub speed: f32,
    pub body_color: [f32; 3],
    pub analysis_time_multiplier: f32,
    pub gem_detector: bool,
}

/// Wallet, inventory and upgrades as stored in the save slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub coins: u32,
    pub xp: u32,
    pub gems: BTreeMap<GemColor, u32>,
    pub inventory: Vec<InventoryItem>,
    pub upgrades: BTreeSet<Upgrade>,
    pub position: Vec3,
    pub yaw: f32,
}

pub struct Player {
    pub name: String,
    pub vehicle: Vehicle,
    pub coins: u32,
    pub xp: u32,
    gems: BTreeMap<GemColor, u32>,
    pub inventory: Inventory,
    upgrades: BTreeSet<Upgrade>,
    pub derived: DerivedStats,
    base_speed: f32,
}

impl Player {
    pub fn new(name: impl Into<String>, tuning: VehicleTuning) -> Self {
        let base_speed = tuning.base_speed;
        let mut player = Self {
            name: name.into(),
            vehicle: Vehicle::new(SPAWN_POINT, tuning),
            coins: STARTING_COINS,
            xp: 0,
            gems: GemColor::ALL.into_iter().map(|c| (c, 0)).collect(),
            inventory: Inventory::default(),
            upgrades: BTreeSet::new(),
            derived: DerivedStats {
                speed: base_speed,
                body_color: DEFAULT_BODY_COLOR,
                analysis_time_multiplier: 1.0,
                gem_detector: false,
            },
            base_speed,
        };
        player.apply_upgrade_effects();
        player
    }

    pub fn position(&self) -> Vec3 {
        self.vehicle.position
    }

    pub fn gems(&self, color: GemColor) -> u32 {
        self.gems.get(&color).copied().unwrap_or(0)
    }

    pub fn gem_counts(&self) -> &BTreeMap<GemColor, u32> {
        &self.gems
    }

    pub fn has_upgrade(&self, upgrade: Upgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }

    pub fn upgrades(&self) -> &BTreeSet<Upgrade> {
        &self.upgrades
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn add_gem(&mut self, color: GemColor, amount: u32) {
        let count = self.gems.entry(color).or_insert(0);
        *count = count.saturating_add(amount);
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
    }

    /// Buy an upgrade by market id. Unknown, owned and unaffordable upgrades are refused.
    pub fn purchase_upgrade(&mut self, id: &str) -> bool {
        let Some(upgrade) = Upgrade::from_id(id) else {
            log::warn!("Unknown upgrade: {}", id);
            return false;
        };
        if self.has_upgrade(upgrade) {
            log::warn!("Upgrade already purchased: {}", id);
            return false;
        }
        let cost = upgrade.cost();
        if self.coins < cost {
            log::warn!("Not enough coins for {} ({} < {})", id, self.coins, cost);
            return false;
        }
        self.coins -= cost;
        self.upgrades.insert(upgrade);
        self.apply_upgrade_effects();
        log::info!("Purchased upgrade: {}", id);
        true
    }

    /// Reset derived stats to base, then apply every owned upgrade.
    pub fn apply_upgrade_effects(&mut self) {
        let mut derived = DerivedStats {
            speed: self.base_speed,
            body_color: DEFAULT_BODY_COLOR,
            analysis_time_multiplier: 1.0,
            gem_detector: false,
        };
        for upgrade in &self.upgrades {
            match upgrade {
                Upgrade::SpeedBoost => derived.speed *= 1.5,
                Upgrade::GemDetector => derived.gem_detector = true,
                Upgrade::VisualCustom => derived.body_color = CUSTOM_BODY_COLOR,
                Upgrade::AnalysisBoost => derived.analysis_time_multiplier = 0.5,
            }
        }
        self.derived = derived;
        self.vehicle.speed = derived.speed;
    }

    /// Remove and return the item at `index`. Out-of-range indices are refused.
    pub fn drop_item(&mut self, index: usize) -> Option<InventoryItem> {
        if index >= self.inventory.items.len() {
            log::warn!("No inventory item at slot {}", index);
            return None;
        }
        let item = self.inventory.items.remove(index);
        log::info!("Dropped item: {}", item.name);
        Some(item)
    }

    pub fn to_save(&self) -> PlayerSave {
        PlayerSave {
            coins: self.coins,
            xp: self.xp,
            gems: self.gems.clone(),
            inventory: self.inventory.items.clone(),
            upgrades: self.upgrades.clone(),
            position: self.vehicle.position,
            yaw: self.vehicle.yaw,
        }
    }

    pub fn restore(&mut self, save: &PlayerSave) {
        self.coins = save.coins;
        self.xp = save.xp;
        self.gems = GemColor::ALL
            .into_iter()
            .map(|c| (c, save.gems.get(&c).copied().unwrap_or(0)))
            .collect();
        self.inventory.items = save.inventory.iter().take(self.inventory.capacity).cloned().collect();
        self.upgrades = save.upgrades.clone();
        self.vehicle.teleport(save.position, save.yaw);
        self.apply_upgrade_effects();
    }
}
