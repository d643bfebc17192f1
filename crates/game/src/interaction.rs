//! Interaction dispatch: what pressing interact does to each kind of target.

use engine_core::Entity;

use crate::hud::Panel;
use crate::layout::InteractionKind;
use crate::missions::StepAction;
use crate::player::InventoryItem;
use crate::session::Session;
use crate::world::InteractableView;

impl Session {
    /// Interact with `entity`. False when nothing happened (target gone, refused, or blocked).
    pub fn interact(&mut self, entity: Entity) -> bool {
        let Some(target) = self.world.interactable(entity) else {
            log::debug!("Interaction target {:?} no longer exists", entity);
            self.forget_target(entity);
            return false;
        };
        log::debug!("Interact: {} ({})", target.name, target.id);
        match target.kind.clone() {
            InteractionKind::Npc { dialogue } => {
                self.hud.open(Panel::Dialogue {
                    speaker: target.name.clone(),
                    text: dialogue,
                });
                self.report_progress(StepAction::Interact, &target.id);
                true
            }
            InteractionKind::CollectibleItem { item } => self.collect(&target, item),
            InteractionKind::Panel { .. } => {
                self.read(&target);
                self.report_progress(StepAction::Interact, &target.id);
                true
            }
            InteractionKind::MissionObject { requires_item, .. } => self.use_device(&target, requires_item),
            InteractionKind::Market => {
                self.hud.open(Panel::Market);
                true
            }
        }
    }

    fn collect(&mut self, target: &InteractableView, item: InventoryItem) -> bool {
        if self.player.inventory.is_full() {
            self.hud.warning("Inventory full");
            return false;
        }
        let item_id = item.id.clone();
        let name = item.name.clone();
        if !self.player.inventory.add(item) {
            return false;
        }
        self.world.remove_interactable(target.entity);
        self.forget_target(target.entity);
        self.hud.success(format!("Picked up {}", name));
        self.hud.request_refresh();
        self.report_progress(StepAction::Collect, &item_id);
        true
    }

    fn read(&mut self, target: &InteractableView) {
        self.hud.open(Panel::Document {
            title: target.name.clone(),
            body: target.content.clone(),
        });
    }

    fn use_device(&mut self, target: &InteractableView, requires_item: Option<String>) -> bool {
        let Some(item_id) = requires_item else {
            self.read(target);
            self.hud.success(format!("{} activated", target.name));
            self.report_progress(StepAction::Interact, &target.id);
            return true;
        };
        let wanted = self
            .missions
            .active()
            .is_some_and(|m| m.has_pending_step(StepAction::Deliver, &target.id));
        if !wanted {
            self.hud.info(format!("{} has nothing to do right now", target.name));
            return false;
        }
        let Some(item) = self.player.inventory.take(&item_id) else {
            self.hud.warning(format!("You need {}", item_id));
            return false;
        };
        self.hud.success(format!("{} delivered", item.name));
        self.hud.request_refresh();
        self.report_progress(StepAction::Deliver, &target.id);
        true
    }

    fn forget_target(&mut self, entity: Entity) {
        if self.prompt_target == Some(entity) {
            self.prompt_target = None;
            self.hud.hide_prompt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::missions::{parse_definitions, MissionBoard};
    use crate::player::INVENTORY_CAPACITY;
    use crate::save::MemoryStore;
    use crate::world::WorldRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(missions: &str) -> Session {
        let mut board = MissionBoard::new();
        board.load(parse_definitions(missions).unwrap());
        Session::with_parts(
            GameConfig::default(),
            WorldRegistry::city_with_rng(StdRng::seed_from_u64(9)),
            board,
            Box::new(MemoryStore::new()),
        )
    }

    fn filler(i: usize) -> InventoryItem {
        InventoryItem {
            id: format!("junk_{i}"),
            name: format!("Junk {i}"),
            description: String::new(),
        }
    }

    #[test]
    fn npc_opens_dialogue_and_counts_as_interact() {
        let mut s = session(
            r#"[(id: 1, title: "Meet", description: "", gem_reward: 2, gem_color: green, reference: "",
                 steps: [(action: interact, target: "profesor_lumen")])]"#,
        );
        let npc = s.world.find_interactable("profesor_lumen").unwrap();
        assert!(s.interact(npc));
        assert!(matches!(s.hud.panel(), Panel::Dialogue { speaker, .. } if speaker == "Professor Lumen"));
        assert!(s.missions.is_completed(1));
        assert_eq!(s.player.gems(crate::player::GemColor::Green), 2);
    }

    #[test]
    fn full_inventory_refuses_pickup() {
        let mut s = session("[]");
        for i in 0..INVENTORY_CAPACITY {
            assert!(s.player.inventory.add(filler(i)));
        }
        let chip = s.world.find_interactable("chip_wkafka_1").unwrap();
        assert!(!s.interact(chip));
        assert!(s.world.interactable(chip).is_some());
        assert_eq!(s.hud.notification().map(|n| n.text.as_str()), Some("Inventory full"));
    }

    #[test]
    fn delivery_without_item_is_refused() {
        let mut s = session(
            r#"[(id: 1, title: "Deliver", description: "", gem_reward: 1, gem_color: red, reference: "",
                 steps: [(action: deliver, target: "buzon_terminal_1")])]"#,
        );
        let mailbox = s.world.find_interactable("buzon_terminal_1").unwrap();
        assert!(!s.interact(mailbox));
        assert_eq!(
            s.hud.notification().map(|n| n.text.as_str()),
            Some("You need chip_wkafka")
        );
        assert!(!s.missions.is_completed(1));
    }

    #[test]
    fn device_without_requirement_activates() {
        let mut s = session(
            r#"[(id: 1, title: "Repair", description: "", gem_reward: 1, gem_color: green, reference: "",
                 steps: [(action: interact, target: "repair_module_1")])]"#,
        );
        let module = s.world.find_interactable("repair_module_1").unwrap();
        assert!(s.interact(module));
        assert!(matches!(s.hud.panel(), Panel::Document { .. }));
        assert!(s.missions.is_completed(1));
    }

    #[test]
    fn kiosk_opens_market() {
        let mut s = session("[]");
        let kiosk = s.world.find_interactable("market_kiosk_1").unwrap();
        assert!(s.interact(kiosk));
        assert!(s.hud.is_market_open());
    }
}
