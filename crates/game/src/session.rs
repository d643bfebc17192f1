//! Game session: owns every system and runs one frame at a time.

use engine_core::{Entity, Vec3};
use input::{Action, InputState};

use crate::achievements::{AchievementBook, AchievementUnlock, LiveStats, StatUpdate, TECH_REFERENCE};
use crate::camera::ChaseCamera;
use crate::config::GameConfig;
use crate::hud::{Hud, Panel, Tone};
use crate::layout::{self, InteractionKind};
use crate::missions::{MissionBoard, MissionStatus, StepAction};
use crate::player::{GemColor, Player, Upgrade};
use crate::save::{FileStore, SaveBlob, SaveError, SaveStore};
use crate::vehicle::{JumpTier, VehicleEvent};
use crate::world::WorldRegistry;

/// Seconds each kind of notice stays on screen.
const BOUNDARY_NOTICE_SECS: f32 = 1.5;
const JUMP_NOTICE_SECS: f32 = 2.0;
const ACHIEVEMENT_NOTICE_SECS: f32 = 5.0;

/// Something the player earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Gems { color: GemColor, amount: u32 },
    Wallet { coins: u32, xp: u32 },
}

pub struct Session {
    pub config: GameConfig,
    pub player: Player,
    pub world: WorldRegistry,
    pub missions: MissionBoard,
    pub achievements: AchievementBook,
    pub hud: Hud,
    pub camera: ChaseCamera,
    store: Box<dyn SaveStore>,
    achievement_timer: f32,
    pub(crate) prompt_target: Option<Entity>,
    current_zone: Option<String>,
}

impl Session {
    /// Build the city, load mission definitions and start the first mission.
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            config.max_frame_delta > 0.0,
            "max_frame_delta must be positive, got {}",
            config.max_frame_delta
        );
        let mut missions = MissionBoard::new();
        match missions.load_from_path(&config.missions_path) {
            Ok(count) => log::info!("{} missions from {:?}", count, config.missions_path),
            Err(e) => log::error!("Mission definitions unavailable: {}", e),
        }
        let store = Box::new(FileStore::new(config.save_dir.clone()));
        Ok(Self::with_parts(config, WorldRegistry::city(), missions, store))
    }

    pub fn with_parts(
        config: GameConfig,
        world: WorldRegistry,
        missions: MissionBoard,
        store: Box<dyn SaveStore>,
    ) -> Self {
        let player = Player::new("Player", config.vehicle.clone());
        let camera = ChaseCamera::new(&player.vehicle);
        let hud = Hud::new(config.notification_duration);
        let mut session = Self {
            config,
            player,
            world,
            missions,
            achievements: AchievementBook::new(),
            hud,
            camera,
            store,
            achievement_timer: 0.0,
            prompt_target: None,
            current_zone: None,
        };
        if session.missions.is_ready() {
            session.start_next_mission();
        } else {
            session.hud.warning("Mission data could not be loaded");
        }
        session
    }

    /// One frame: simulate, react, then collapse the input latch.
    pub fn frame(&mut self, input: &mut InputState, dt: f32) {
        let events = self.player.vehicle.update(input, self.world.physics(), dt);
        for event in events {
            self.handle_vehicle_event(event);
        }
        self.camera.update(&self.player.vehicle, dt);
        self.world.update(dt);

        self.track_zone();
        let speed = self.player.vehicle.speed_per_second();
        if speed > 0.5 {
            self.update_stat(StatUpdate::Speed(speed));
        }

        self.update_prompt();
        if input.was_action_pressed(Action::Interact) {
            let reading = matches!(self.hud.panel(), Panel::Dialogue { .. } | Panel::Document { .. });
            if reading {
                self.hud.close_panel();
            } else if let Some(target) = self.prompt_target {
                self.interact(target);
            }
        }
        if input.was_action_pressed(Action::ToggleInventory) {
            self.hud.toggle(Panel::Inventory);
        }
        if input.was_action_pressed(Action::ToggleHelp) {
            self.hud.toggle(Panel::Help);
        }
        if let Some(digit) = input.pressed_digit() {
            if self.hud.is_market_open() {
                if let Some(upgrade) = Upgrade::ALL.get(digit).copied() {
                    self.purchase(upgrade);
                }
            } else if *self.hud.panel() == Panel::Inventory {
                self.drop_item(digit);
            }
        }
        if input.is_save_pressed() {
            self.save();
        }
        if input.is_load_pressed() {
            self.load();
        }

        self.achievement_timer += dt;
        if self.achievement_timer >= self.config.achievement_check_interval {
            self.achievement_timer = 0.0;
            self.check_achievements();
        }

        self.player.apply_upgrade_effects();
        self.hud.update(dt);
        input.reset_action_flags();
    }

    fn handle_vehicle_event(&mut self, event: VehicleEvent) {
        match event {
            VehicleEvent::BoundaryReached => {
                self.hud
                    .notify_for("You reached the edge of the city", Tone::Warning, BOUNDARY_NOTICE_SECS)
            }
            VehicleEvent::Respawned => {
                self.hud
                    .notify_for("You left the map! Back to the start.", Tone::Warning, JUMP_NOTICE_SECS)
            }
            VehicleEvent::Jumped { from_ramp } => {
                log::debug!("Jump (ramp: {})", from_ramp);
            }
            VehicleEvent::Landed { fall_height, trick } => {
                self.update_stat(StatUpdate::Jump(fall_height));
                if let Some(trick) = trick {
                    self.grant_reward(Reward::Wallet { coins: 0, xp: trick.xp });
                    let text = match trick.tier {
                        JumpTier::Good => format!("Good jump! +{} XP", trick.xp),
                        JumpTier::Epic => format!("EPIC JUMP! +{} XP", trick.xp),
                    };
                    self.hud.notify_for(text, Tone::Success, JUMP_NOTICE_SECS);
                }
            }
        }
    }

    fn track_zone(&mut self) {
        let zone = self
            .world
            .zone_at(self.player.position())
            .map(|z| (z.id.clone(), z.name.clone()));
        let zone_id = zone.as_ref().map(|(id, _)| id.clone());
        if zone_id == self.current_zone {
            return;
        }
        self.current_zone = zone_id;
        if let Some((id, name)) = zone {
            if !self.achievements.progress().zones_visited.contains(&id) {
                self.hud.info(format!("Discovered: {}", name));
            }
            self.update_stat(StatUpdate::VisitZone(id));
        }
    }

    fn update_prompt(&mut self) {
        let nearest = self.player.vehicle.nearest_interactable(self.world.interactables());
        if nearest == self.prompt_target {
            return;
        }
        self.prompt_target = nearest;
        match nearest.and_then(|e| self.world.interactable(e)) {
            Some(target) => self.hud.show_prompt(target.prompt.as_deref()),
            None => self.hud.hide_prompt(),
        }
    }

    fn purchase(&mut self, upgrade: Upgrade) {
        if self.player.purchase_upgrade(upgrade.id()) {
            self.hud.success(format!("Purchased {}", upgrade.title()));
            self.hud.request_refresh();
            self.check_achievements();
        } else if self.player.has_upgrade(upgrade) {
            self.hud.info(format!("{} already owned", upgrade.title()));
        } else {
            self.hud.warning(format!("Not enough coins for {} ({})", upgrade.title(), upgrade.cost()));
        }
    }

    /// Drop the item in `slot` at the car's feet, where it can be picked up again.
    fn drop_item(&mut self, slot: usize) {
        let Some(item) = self.player.drop_item(slot) else {
            return;
        };
        self.hud.info(format!("Dropped {}", item.name));
        let position = self.player.position() + Vec3::new(0.0, 0.5, 0.0);
        self.world.spawn_pickup(item, position);
        self.prompt_target = None;
        self.hud.request_refresh();
    }

    /// Make world pickups agree with the inventory after a load: an item is in
    /// the world unless it is carried or was already delivered.
    fn sync_pickups(&mut self) {
        let delivered = self.missions.delivered_targets();
        let specs = layout::interactables();
        let consumed: Vec<String> = specs
            .iter()
            .filter(|spec| delivered.contains(spec.id))
            .filter_map(|spec| match &spec.kind {
                InteractionKind::MissionObject { requires_item, .. } => requires_item.clone(),
                _ => None,
            })
            .collect();

        for spec in &specs {
            let InteractionKind::CollectibleItem { item } = &spec.kind else {
                continue;
            };
            let belongs_in_world = !self.player.inventory.contains(&item.id) && !consumed.contains(&item.id);
            match (belongs_in_world, self.world.find_pickup(&item.id)) {
                (true, None) => {
                    self.world.spawn_interactable(spec);
                    log::info!("Pickup {} returned to the world", spec.id);
                }
                (false, Some(entity)) => {
                    self.world.remove_interactable(entity);
                    log::debug!("Pickup {} removed, already carried or delivered", spec.id);
                }
                _ => {}
            }
        }
    }

    /// Statistics the achievement book does not track itself.
    pub fn live_stats(&self) -> LiveStats {
        let tech = self.missions.by_reference(TECH_REFERENCE);
        LiveStats {
            coins: self.player.coins,
            gems: self.player.gem_counts().clone(),
            upgrades_owned: self.player.upgrades().len(),
            reference_missions_completed: tech
                .iter()
                .filter(|m| m.status == MissionStatus::Completed)
                .count(),
            reference_missions_total: tech.len(),
        }
    }

    pub fn update_stat(&mut self, update: StatUpdate) {
        let live = self.live_stats();
        let unlocks = self.achievements.update_stat(update, &live);
        self.announce_unlocks(unlocks);
    }

    pub fn check_achievements(&mut self) {
        let live = self.live_stats();
        let unlocks = self.achievements.check_all(&live);
        self.announce_unlocks(unlocks);
    }

    fn announce_unlocks(&mut self, unlocks: Vec<AchievementUnlock>) {
        for unlock in unlocks {
            self.grant_reward(Reward::Wallet {
                coins: unlock.reward.coins,
                xp: unlock.reward.xp,
            });
            self.hud
                .notify_for(unlock.message(), Tone::Success, ACHIEVEMENT_NOTICE_SECS);
        }
    }

    /// The only place rewards reach the player.
    pub fn grant_reward(&mut self, reward: Reward) {
        match reward {
            Reward::Gems { color, amount } => self.player.add_gem(color, amount),
            Reward::Wallet { coins, xp } => {
                self.player.add_coins(coins);
                self.player.add_xp(xp);
            }
        }
        log::debug!("Reward granted: {:?}", reward);
        self.hud.request_refresh();
    }

    /// Finish the active mission, pay out its gems and move on to the next one.
    pub fn complete_mission(&mut self, id: u32) -> bool {
        let Some(mission) = self.missions.complete(id) else {
            return false;
        };
        self.grant_reward(Reward::Gems {
            color: mission.gem_color,
            amount: mission.gem_reward,
        });
        self.hud.success(format!(
            "Mission complete: {} (+{} {} gem)",
            mission.title,
            mission.gem_reward,
            mission.gem_color.label()
        ));
        self.update_stat(StatUpdate::MissionCompleted);
        self.start_next_mission();
        true
    }

    /// Start the lowest available mission when none is active.
    fn start_next_mission(&mut self) {
        if self.missions.active().is_some() {
            return;
        }
        let Some(next) = self.missions.available().first().map(|m| m.id) else {
            if !self.missions.is_empty() && self.missions.completed_count() == self.missions.len() {
                self.hud.success("Every mission is complete!");
            }
            return;
        };
        if !self.missions.start(next) {
            return;
        }
        if let Some(mission) = self.missions.active() {
            self.hud.info(format!("New mission: {}", mission.title));
        }
        // Items picked up earlier count toward collect steps.
        let held: Vec<String> = self
            .missions
            .active()
            .map(|m| {
                m.steps
                    .iter()
                    .filter(|s| s.action == StepAction::Collect && self.player.inventory.contains(&s.target))
                    .map(|s| s.target.clone())
                    .collect()
            })
            .unwrap_or_default();
        for item in held {
            self.report_progress(StepAction::Collect, &item);
        }
    }

    pub(crate) fn report_progress(&mut self, action: StepAction, target: &str) {
        if let Some(id) = self.missions.record_progress(action, target) {
            self.complete_mission(id);
        }
    }

    /// Write the save slot. False when nothing was written.
    pub fn save(&mut self) -> bool {
        if !self.missions.is_ready() {
            log::error!("Save refused: mission data not loaded");
            self.hud.warning("Cannot save right now");
            return false;
        }
        let blob = SaveBlob::new(
            self.player.to_save(),
            self.missions.serialize(),
            self.achievements.serialize(),
        );
        match self.store.save(&self.config.save_key, &blob) {
            Ok(()) => {
                log::info!("Game saved at {}", blob.timestamp);
                self.hud.success("Game saved");
                true
            }
            Err(e) => {
                log::error!("Save failed: {}", e);
                self.hud.warning("Save failed");
                false
            }
        }
    }

    /// Replace the whole session state with the save slot. Nothing changes on failure.
    pub fn load(&mut self) -> bool {
        if !self.missions.is_ready() {
            log::error!("Load refused: mission data not loaded");
            self.hud.warning("Cannot load right now");
            return false;
        }
        let blob = match self.store.load(&self.config.save_key) {
            Ok(blob) => blob,
            Err(SaveError::NotFound) => {
                self.hud.warning("No save found");
                return false;
            }
            Err(e) => {
                log::error!("Load failed: {}", e);
                self.hud.warning("Load failed");
                return false;
            }
        };
        if !self.missions.restore(&blob.missions) {
            self.hud.warning("Load failed");
            return false;
        }
        self.player.restore(&blob.player);
        self.sync_pickups();
        self.achievements.restore(&blob.achievements);
        self.achievements
            .set_missions_completed(self.missions.completed_count() as u32);
        self.camera = ChaseCamera::new(&self.player.vehicle);
        self.prompt_target = None;
        self.current_zone = None;
        self.hud.hide_prompt();
        self.hud.close_panel();
        self.hud.request_refresh();
        log::info!("Game loaded (saved {})", blob.timestamp);
        self.hud.success("Game loaded");
        true
    }

    /// Wallet, gems, mission and whereabouts, one line.
    pub fn status_line(&self) -> String {
        let mission = self
            .missions
            .active()
            .map(|m| format!("{} ({} left)", m.title, m.steps_remaining()))
            .unwrap_or_else(|| "none".to_string());
        format!(
            "Coins {} | XP {} | Gems B{} G{} R{} V{} | Mission: {} | {}",
            self.player.coins,
            self.player.xp,
            self.player.gems(GemColor::Blue),
            self.player.gems(GemColor::Green),
            self.player.gems(GemColor::Red),
            self.player.gems(GemColor::Violet),
            mission,
            self.world.location_label(self.player.position())
        )
    }

    /// One-line rendering of the open panel.
    pub fn panel_line(&self) -> Option<String> {
        let line = match self.hud.panel() {
            Panel::Closed => return None,
            Panel::Dialogue { speaker, text } => format!("{}: {}", speaker, text),
            Panel::Document { title, body } => format!("{}: {}", title, body),
            Panel::Market => {
                let offers: Vec<String> = Upgrade::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, u)| {
                        let owned = if self.player.has_upgrade(*u) { " [owned]" } else { "" };
                        format!("{} {} ({}){}", i + 1, u.title(), u.cost(), owned)
                    })
                    .collect();
                format!("Market ({} coins): {}", self.player.coins, offers.join(", "))
            }
            Panel::Inventory => {
                let items = &self.player.inventory.items;
                if items.is_empty() {
                    "Inventory: empty".to_string()
                } else {
                    let names: Vec<String> = items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| format!("{} {}", i + 1, item.name))
                        .collect();
                    format!(
                        "Inventory ({}/{}): {}",
                        items.len(),
                        self.player.inventory.capacity,
                        names.join(", ")
                    )
                }
            }
            Panel::Help => "WASD drive, Space jump, E interact, I inventory, H help, F5 save, F9 load".to_string(),
        };
        Some(line)
    }

    /// Window title mirror of the HUD: notification, open panel, prompt, then status.
    pub fn window_title(&self) -> String {
        let detail = if let Some(n) = self.hud.notification() {
            n.text.clone()
        } else if let Some(panel) = self.panel_line() {
            panel
        } else if let Some(p) = self.hud.prompt() {
            p.text.clone()
        } else {
            self.status_line()
        };
        format!("Legacy City | {}", detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missions::parse_definitions;
    use crate::save::MemoryStore;
    use crate::vehicle::TrickReward;
    use input::{ElementState, KeyCode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MISSIONS: &str = r#"[
        (id: 1, title: "Logs", description: "", gem_reward: 1, gem_color: blue, reference: "wiliutils",
         steps: [(action: interact, target: "log_panel_1")]),
        (id: 2, title: "Faces", description: "", gem_reward: 1, gem_color: green, reference: "facial_recognition",
         steps: [(action: interact, target: "buzon_digital_logs_faciales")]),
        (id: 3, title: "Chip", description: "", gem_reward: 1, gem_color: red, reference: "https://github.com/wisrovi/wkafka",
         steps: [(action: collect, target: "chip_wkafka"), (action: deliver, target: "buzon_terminal_1")]),
    ]"#;

    fn board() -> MissionBoard {
        let mut board = MissionBoard::new();
        board.load(parse_definitions(MISSIONS).unwrap());
        board
    }

    fn session_with(store: MemoryStore) -> Session {
        Session::with_parts(
            GameConfig::default(),
            WorldRegistry::city_with_rng(StdRng::seed_from_u64(5)),
            board(),
            Box::new(store),
        )
    }

    fn session() -> Session {
        session_with(MemoryStore::new())
    }

    fn target(s: &Session, id: &str) -> Entity {
        s.world.find_interactable(id).unwrap()
    }

    #[test]
    fn new_game_starts_first_mission() {
        let s = session();
        assert_eq!(s.missions.active().map(|m| m.id), Some(1));
        assert_eq!(s.player.coins, 100);
    }

    #[test]
    fn completing_a_mission_pays_out_and_advances() {
        let mut s = session();
        let panel = target(&s, "log_panel_1");
        assert!(s.interact(panel));
        assert!(s.missions.is_completed(1));
        assert_eq!(s.player.gems(GemColor::Blue), 1);
        assert_eq!(s.missions.active().map(|m| m.id), Some(2));
        assert!(s.achievements.is_unlocked("first_mission"));
        // first_mission reward.
        assert_eq!(s.player.coins, 150);
        assert_eq!(s.player.xp, 25);
    }

    #[test]
    fn chip_picked_up_early_counts_for_later_mission() {
        let mut s = session();
        let chip = target(&s, "chip_wkafka_1");
        assert!(s.interact(chip));
        assert!(s.player.inventory.contains("chip_wkafka"));
        assert!(s.world.interactable(chip).is_none());

        // Mission 3 is not active yet, so the mailbox keeps its hands off the chip.
        let mailbox = target(&s, "buzon_terminal_1");
        assert!(!s.interact(mailbox));
        assert!(s.player.inventory.contains("chip_wkafka"));

        let panel = target(&s, "log_panel_1");
        let faces = target(&s, "buzon_digital_logs_faciales");
        s.interact(panel);
        s.interact(faces);
        let active = s.missions.active().unwrap();
        assert_eq!(active.id, 3);
        assert_eq!(active.steps_remaining(), 1);

        assert!(s.interact(mailbox));
        assert!(s.missions.is_completed(3));
        assert!(!s.player.inventory.contains("chip_wkafka"));
        assert_eq!(s.player.gems(GemColor::Red), 1);
        assert!(s.achievements.is_unlocked("tech_master"));
    }

    #[test]
    fn vanished_target_is_tolerated() {
        let mut s = session();
        let chip = target(&s, "chip_wkafka_1");
        assert!(s.interact(chip));
        assert!(!s.interact(chip));
        assert_eq!(s.player.inventory.items.len(), 1);
    }

    #[test]
    fn save_then_load_restores_progress() {
        let mut s = session();
        let panel = target(&s, "log_panel_1");
        s.interact(panel);
        assert!(s.save());

        s.player.coins = 3;
        s.player.add_gem(GemColor::Violet, 4);
        assert!(s.load());
        assert_eq!(s.player.coins, 150);
        assert_eq!(s.player.gems(GemColor::Violet), 0);
        assert!(s.missions.is_completed(1));
        assert_eq!(s.missions.active().map(|m| m.id), Some(2));
        assert_eq!(s.achievements.progress().missions_completed, 1);
        assert!(s.achievements.is_unlocked("first_mission"));
    }

    #[test]
    fn corrupt_save_reports_no_save_and_keeps_state() {
        let mut store = MemoryStore::new();
        store.write("legacy_city_save", "(player: (coins: ").unwrap();
        let mut s = session_with(store);
        s.player.coins = 42;
        assert!(!s.load());
        assert_eq!(s.player.coins, 42);
        assert_eq!(s.hud.notification().map(|n| n.text.as_str()), Some("No save found"));
        // The corrupt entry is gone.
        assert!(!s.load());
    }

    #[test]
    fn unready_board_refuses_save() {
        let mut s = Session::with_parts(
            GameConfig::default(),
            WorldRegistry::city_with_rng(StdRng::seed_from_u64(5)),
            MissionBoard::new(),
            Box::new(MemoryStore::new()),
        );
        assert!(!s.save());
        assert!(!s.load());
    }

    #[test]
    fn market_hotkey_buys_upgrade() {
        let mut s = session();
        let mut input = InputState::new();
        s.player.vehicle.teleport(Vec3::new(-26.0, 0.5, -9.0), std::f32::consts::PI);

        input.process_keyboard(KeyCode::KeyE, ElementState::Pressed);
        s.frame(&mut input, 1.0 / 60.0);
        input.process_keyboard(KeyCode::KeyE, ElementState::Released);
        assert!(s.hud.is_market_open());

        input.process_keyboard(KeyCode::Digit1, ElementState::Pressed);
        s.frame(&mut input, 1.0 / 60.0);
        assert!(s.player.has_upgrade(Upgrade::SpeedBoost));
        assert_eq!(s.player.coins, 50);
        assert!((s.player.vehicle.speed - 12.0).abs() < 1e-5);
    }

    #[test]
    fn inventory_hotkey_drops_item() {
        let mut s = session();
        let chip = target(&s, "chip_wkafka_1");
        s.interact(chip);
        s.hud.open(Panel::Inventory);
        assert_eq!(
            s.panel_line().as_deref(),
            Some("Inventory (1/12): 1 WKafka Config Chip")
        );
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Digit1, ElementState::Pressed);
        s.frame(&mut input, 1.0 / 60.0);
        assert!(s.player.inventory.items.is_empty());
        let pickup = s.world.find_pickup("chip_wkafka").unwrap();
        let spot = s.world.interactable(pickup).unwrap().position;
        assert!(spot.distance(s.player.position()) < 1.0);
    }

    #[test]
    fn dropped_chip_still_finishes_the_delivery_mission() {
        let mut s = session();
        let chip = target(&s, "chip_wkafka_1");
        s.interact(chip);
        s.hud.open(Panel::Inventory);
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Digit1, ElementState::Pressed);
        s.frame(&mut input, 1.0 / 60.0);
        assert!(!s.player.inventory.contains("chip_wkafka"));

        let panel = target(&s, "log_panel_1");
        let faces = target(&s, "buzon_digital_logs_faciales");
        s.interact(panel);
        s.interact(faces);
        assert_eq!(s.missions.active().map(|m| m.id), Some(3));

        let dropped = s.world.find_pickup("chip_wkafka").unwrap();
        assert!(s.interact(dropped));
        let mailbox = target(&s, "buzon_terminal_1");
        assert!(s.interact(mailbox));
        assert!(s.missions.is_completed(3));
    }

    #[test]
    fn load_puts_pickups_back_where_the_save_expects_them() {
        let mut s = session();
        assert!(s.save());
        let chip = target(&s, "chip_wkafka_1");
        s.interact(chip);
        assert!(s.world.find_pickup("chip_wkafka").is_none());

        // The save predates the pickup: the chip is back in the world.
        assert!(s.load());
        assert!(!s.player.inventory.contains("chip_wkafka"));
        let restored = s.world.find_pickup("chip_wkafka").unwrap();

        // The save holds the chip: the dropped copy disappears.
        assert!(s.interact(restored));
        assert!(s.save());
        s.drop_item(0);
        assert!(s.world.find_pickup("chip_wkafka").is_some());
        assert!(s.load());
        assert!(s.player.inventory.contains("chip_wkafka"));
        assert!(s.world.find_pickup("chip_wkafka").is_none());
    }

    #[test]
    fn delivered_chip_stays_gone_after_load() {
        let mut s = session();
        let chip = target(&s, "chip_wkafka_1");
        let panel = target(&s, "log_panel_1");
        let faces = target(&s, "buzon_digital_logs_faciales");
        let mailbox = target(&s, "buzon_terminal_1");
        s.interact(chip);
        s.interact(panel);
        s.interact(faces);
        s.interact(mailbox);
        assert!(s.missions.is_completed(3));
        assert!(s.save());
        assert!(s.load());
        assert!(s.world.find_pickup("chip_wkafka").is_none());
    }

    #[test]
    fn epic_landing_pays_xp_once() {
        let mut s = session();
        s.handle_vehicle_event(VehicleEvent::Landed {
            fall_height: 7.0,
            trick: Some(TrickReward { tier: JumpTier::Epic, xp: 14 }),
        });
        // jumper pays 75 coins and 40 XP on top of the trick.
        assert!(s.achievements.is_unlocked("jumper"));
        assert_eq!(s.player.xp, 54);
        assert_eq!(s.player.coins, 175);
        let n = s.hud.notification().unwrap();
        assert_eq!(n.text, "EPIC JUMP! +14 XP");
        assert!((n.time_remaining - JUMP_NOTICE_SECS).abs() < 1e-6);

        s.handle_vehicle_event(VehicleEvent::Landed { fall_height: 0.5, trick: None });
        assert_eq!(s.player.xp, 54);
        assert_eq!(s.hud.notification().map(|n| n.text.as_str()), Some("EPIC JUMP! +14 XP"));
    }

    #[test]
    fn notices_use_per_event_durations() {
        let mut s = session();
        s.handle_vehicle_event(VehicleEvent::BoundaryReached);
        let n = s.hud.notification().unwrap();
        assert!((n.time_remaining - BOUNDARY_NOTICE_SECS).abs() < 1e-6);

        s.update_stat(StatUpdate::Speed(20.0));
        let n = s.hud.notification().unwrap();
        assert!(n.text.contains("Speed Demon"), "{}", n.text);
        assert!((n.time_remaining - ACHIEVEMENT_NOTICE_SECS).abs() < 1e-6);

        s.hud.info("Plain");
        let n = s.hud.notification().unwrap();
        assert!((n.time_remaining - s.config.notification_duration).abs() < 1e-6);
    }

    #[test]
    fn status_line_names_the_location() {
        let s = session();
        assert!(s.status_line().ends_with("| Street"), "{}", s.status_line());
    }

    #[test]
    fn window_title_mirrors_notification() {
        let mut s = session();
        s.hud.warning("Careful");
        assert_eq!(s.window_title(), "Legacy City | Careful");
    }
}
