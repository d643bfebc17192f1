//! Linear mission chain: loading, start/complete transitions, unlocks, step progress and save data.
//!
//! The board never grants rewards. `complete` hands the finished mission back
//! and the caller applies its gem reward.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::player::GemColor;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("could not read mission definitions from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed mission definitions: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Locked,
    Available,
    Active,
    Completed,
}

/// What an interaction handler did, as reported to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Collect,
    Interact,
    Deliver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStep {
    pub action: StepAction,
    pub target: String,
}

/// One record of the definitions file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionDefinition {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub gem_reward: u32,
    pub gem_color: GemColor,
    pub reference: String,
    #[serde(default)]
    pub steps: Vec<MissionStep>,
    #[serde(default)]
    pub status: Option<MissionStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub gem_reward: u32,
    pub gem_color: GemColor,
    pub reference: String,
    pub steps: Vec<MissionStep>,
    /// One flag per step.
    pub steps_done: Vec<bool>,
    pub status: MissionStatus,
}

impl Mission {
    fn from_definition(def: MissionDefinition) -> Self {
        let status = def.status.unwrap_or(if def.id == 1 {
            MissionStatus::Available
        } else {
            MissionStatus::Locked
        });
        Self {
            steps_done: vec![false; def.steps.len()],
            id: def.id,
            title: def.title,
            description: def.description,
            gem_reward: def.gem_reward,
            gem_color: def.gem_color,
            reference: def.reference,
            steps: def.steps,
            status,
        }
    }

    /// Whether an unmet step asks for `action` on `target`.
    pub fn has_pending_step(&self, action: StepAction, target: &str) -> bool {
        self.steps
            .iter()
            .zip(&self.steps_done)
            .any(|(step, done)| !done && step.action == action && step.target == target)
    }

    pub fn steps_remaining(&self) -> usize {
        self.steps_done.iter().filter(|d| !**d).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStatusRecord {
    pub id: u32,
    pub status: MissionStatus,
}

/// Mission section of the save slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSave {
    pub active_id: Option<u32>,
    pub completed: BTreeSet<u32>,
    /// Absent in older saves; statuses are then rebuilt from the chain rule.
    #[serde(default)]
    pub statuses: Option<Vec<MissionStatusRecord>>,
    #[serde(default)]
    pub active_steps_done: Vec<bool>,
}

#[derive(Debug, Default)]
pub struct MissionBoard {
    missions: BTreeMap<u32, Mission>,
    active: Option<u32>,
    completed: BTreeSet<u32>,
    ready: bool,
}

impl MissionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether definitions were loaded successfully.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Read and load a RON definitions file. On failure the board is left empty and unready.
    pub fn load_from_path(&mut self, path: &Path) -> Result<usize, MissionError> {
        let parsed = std::fs::read_to_string(path)
            .map_err(|source| MissionError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|data| parse_definitions(&data));
        match parsed {
            Ok(defs) => Ok(self.load(defs)),
            Err(e) => {
                self.missions.clear();
                self.active = None;
                self.completed.clear();
                self.ready = false;
                Err(e)
            }
        }
    }

    /// Replace the catalog. Returns the number of missions kept.
    pub fn load(&mut self, definitions: Vec<MissionDefinition>) -> usize {
        self.missions.clear();
        self.active = None;
        self.completed.clear();

        for def in definitions {
            if def.id == 0 {
                log::warn!("Mission '{}' has no valid id, skipped", def.title);
                continue;
            }
            if self.missions.contains_key(&def.id) {
                log::warn!("Duplicate mission id {} ('{}'), skipped", def.id, def.title);
                continue;
            }
            let mission = Mission::from_definition(def);
            match mission.status {
                MissionStatus::Completed => {
                    self.completed.insert(mission.id);
                }
                MissionStatus::Active if self.active.is_none() => self.active = Some(mission.id),
                _ => {}
            }
            self.missions.insert(mission.id, mission);
        }
        self.demote_stray_actives();
        self.ready = true;
        log::info!("Loaded {} missions", self.missions.len());
        self.recompute_unlocks();
        self.missions.len()
    }

    /// Available → Active. Refused when unknown, not available, or another mission is active.
    pub fn start(&mut self, id: u32) -> bool {
        if !self.check_ready("start") {
            return false;
        }
        if let Some(active) = self.active {
            log::warn!("Mission {} is already active, cannot start {}", active, id);
            return false;
        }
        let Some(mission) = self.missions.get_mut(&id) else {
            log::error!("Mission {} not found", id);
            return false;
        };
        if mission.status != MissionStatus::Available {
            log::warn!("Mission '{}' is not available ({:?})", mission.title, mission.status);
            return false;
        }
        mission.status = MissionStatus::Active;
        self.active = Some(id);
        log::info!("Mission started: {}", mission.title);
        true
    }

    /// Active → Completed. Returns the finished mission for reward handling.
    pub fn complete(&mut self, id: u32) -> Option<Mission> {
        if !self.check_ready("complete") {
            return None;
        }
        if !self.missions.contains_key(&id) {
            log::error!("Mission {} not found", id);
            return None;
        }
        if self.active != Some(id) {
            log::warn!("Mission {} is not the active mission", id);
            return None;
        }
        let mission = self.missions.get_mut(&id)?;
        mission.status = MissionStatus::Completed;
        let done = mission.clone();
        self.completed.insert(id);
        self.active = None;
        log::info!("Mission completed: {}", done.title);
        self.recompute_unlocks();
        Some(done)
    }

    /// Make mission `completed + 1` available when every lower id is completed.
    pub fn recompute_unlocks(&mut self) {
        let next_id = self.completed.len() as u32 + 1;
        let chain_intact = (1..next_id).all(|id| self.completed.contains(&id));
        if let Some(next) = self.missions.get_mut(&next_id) {
            if next.status == MissionStatus::Locked && chain_intact {
                next.status = MissionStatus::Available;
                log::info!("Mission unlocked: {}", next.title);
            }
        }
    }

    /// Mark the first unmet step of the active mission matching `action` on `target`.
    /// Returns the mission id once all its steps are done.
    pub fn record_progress(&mut self, action: StepAction, target: &str) -> Option<u32> {
        let id = self.active?;
        let mission = self.missions.get_mut(&id)?;
        let index = mission
            .steps
            .iter()
            .zip(&mission.steps_done)
            .position(|(step, done)| !done && step.action == action && step.target == target)?;
        mission.steps_done[index] = true;
        log::debug!("Mission {} step {} done ({:?} {})", id, index, action, target);
        (mission.steps_remaining() == 0).then_some(id)
    }

    // Queries

    pub fn by_id(&self, id: u32) -> Option<&Mission> {
        self.missions.get(&id)
    }

    pub fn available(&self) -> Vec<&Mission> {
        self.missions
            .values()
            .filter(|m| m.status == MissionStatus::Available)
            .collect()
    }

    pub fn active(&self) -> Option<&Mission> {
        self.active.and_then(|id| self.missions.get(&id))
    }

    pub fn is_completed(&self, id: u32) -> bool {
        self.completed.contains(&id)
    }

    /// Targets of delivery steps already carried out, finished missions included.
    pub fn delivered_targets(&self) -> BTreeSet<String> {
        let finished = self.completed.iter().filter_map(|id| self.by_id(*id));
        let mut targets: BTreeSet<String> = finished
            .flat_map(|m| &m.steps)
            .filter(|step| step.action == StepAction::Deliver)
            .map(|step| step.target.clone())
            .collect();
        if let Some(m) = self.active() {
            for (step, done) in m.steps.iter().zip(&m.steps_done) {
                if *done && step.action == StepAction::Deliver {
                    targets.insert(step.target.clone());
                }
            }
        }
        targets
    }

    pub fn by_reference(&self, reference: &str) -> Vec<&Mission> {
        self.missions.values().filter(|m| m.reference == reference).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn serialize(&self) -> MissionSave {
        MissionSave {
            active_id: self.active,
            completed: self.completed.clone(),
            statuses: Some(
                self.missions
                    .values()
                    .map(|m| MissionStatusRecord {
                        id: m.id,
                        status: m.status,
                    })
                    .collect(),
            ),
            active_steps_done: self.active().map(|m| m.steps_done.clone()).unwrap_or_default(),
        }
    }

    /// Apply saved progress. Refused (false) when no definitions are loaded.
    pub fn restore(&mut self, save: &MissionSave) -> bool {
        if !self.check_ready("restore") {
            return false;
        }
        self.completed = save.completed.clone();
        self.active = save.active_id.filter(|id| {
            let known = self.missions.contains_key(id);
            if !known {
                log::warn!("Saved active mission {} no longer exists", id);
            }
            known
        });

        for mission in self.missions.values_mut() {
            mission.steps_done.iter_mut().for_each(|d| *d = false);
        }

        match &save.statuses {
            Some(records) => {
                for record in records {
                    if let Some(m) = self.missions.get_mut(&record.id) {
                        m.status = record.status;
                    }
                }
            }
            None => {
                let completed = &self.completed;
                let active = self.active;
                for m in self.missions.values_mut() {
                    m.status = legacy_status(m.id, completed, active);
                }
            }
        }

        if let Some(id) = self.active {
            if let Some(m) = self.missions.get_mut(&id) {
                if m.status != MissionStatus::Active {
                    log::warn!(
                        "Active mission {} had inconsistent status {:?}, correcting to active",
                        id,
                        m.status
                    );
                    m.status = MissionStatus::Active;
                }
                if save.active_steps_done.len() == m.steps_done.len() {
                    m.steps_done = save.active_steps_done.clone();
                }
            }
        }
        self.demote_stray_actives();
        true
    }

    /// Any Active mission other than the active one falls back to its chain status.
    fn demote_stray_actives(&mut self) {
        let completed = &self.completed;
        let active = self.active;
        for m in self.missions.values_mut() {
            if m.status == MissionStatus::Active && Some(m.id) != active {
                let status = legacy_status(m.id, completed, active);
                log::warn!("Mission {} was marked active alongside {:?}, now {:?}", m.id, active, status);
                m.status = status;
            }
        }
    }

    fn check_ready(&self, op: &str) -> bool {
        if !self.ready {
            log::error!("Mission {} requested before definitions were loaded", op);
        }
        self.ready
    }
}

pub fn parse_definitions(data: &str) -> Result<Vec<MissionDefinition>, MissionError> {
    Ok(ron::from_str(data)?)
}

fn legacy_status(id: u32, completed: &BTreeSet<u32>, active: Option<u32>) -> MissionStatus {
    if completed.contains(&id) {
        MissionStatus::Completed
    } else if active == Some(id) {
        MissionStatus::Active
    } else if id == 1 || completed.contains(&(id - 1)) {
        MissionStatus::Available
    } else {
        MissionStatus::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: u32) -> MissionDefinition {
        MissionDefinition {
            id,
            title: format!("Mission {id}"),
            description: String::new(),
            gem_reward: 1,
            gem_color: GemColor::Blue,
            reference: if id % 2 == 0 { "even".into() } else { "odd".into() },
            steps: Vec::new(),
            status: None,
        }
    }

    fn board(n: u32) -> MissionBoard {
        let mut b = MissionBoard::new();
        b.load((1..=n).map(def).collect());
        b
    }

    fn active_count(b: &MissionBoard) -> usize {
        (1..=b.len() as u32)
            .filter(|id| b.by_id(*id).map(|m| m.status) == Some(MissionStatus::Active))
            .count()
    }

    #[test]
    fn first_mission_starts_available() {
        let b = board(3);
        assert_eq!(b.by_id(1).unwrap().status, MissionStatus::Available);
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Locked);
        assert_eq!(b.available().len(), 1);
    }

    #[test]
    fn start_complete_unlocks_next() {
        let mut b = board(3);
        assert!(b.start(1));
        assert_eq!(b.active().map(|m| m.id), Some(1));
        let done = b.complete(1).expect("completed");
        assert_eq!(done.id, 1);
        assert_eq!(b.by_id(1).unwrap().status, MissionStatus::Completed);
        assert!(b.is_completed(1));
        assert_eq!(b.completed_count(), 1);
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Available);
        assert_eq!(b.by_id(3).unwrap().status, MissionStatus::Locked);
        assert!(b.active().is_none());
    }

    #[test]
    fn at_most_one_active_for_any_start_sequence() {
        for seq in 0..256u32 {
            let mut b = board(4);
            // Make everything startable so only the single-active rule can refuse.
            b.restore(&MissionSave {
                active_id: None,
                completed: BTreeSet::new(),
                statuses: Some(
                    (1..=4)
                        .map(|id| MissionStatusRecord {
                            id,
                            status: MissionStatus::Available,
                        })
                        .collect(),
                ),
                active_steps_done: Vec::new(),
            });
            for step in 0..4 {
                let id = (seq >> (step * 2)) % 4 + 1;
                b.start(id);
                assert!(active_count(&b) <= 1);
            }
        }
    }

    #[test]
    fn invalid_transitions_are_refused() {
        let mut b = board(3);
        assert!(!b.start(2), "locked");
        assert!(!b.start(99), "unknown");
        assert!(b.complete(1).is_none(), "not active");
        assert!(b.start(1));
        assert!(!b.start(1), "already active");
        assert!(b.complete(2).is_none());
        assert!(b.complete(1).is_some());
        assert!(b.complete(1).is_none(), "already completed");
    }

    #[test]
    fn broken_chain_never_unlocks() {
        let mut b = board(4);
        b.restore(&MissionSave {
            active_id: None,
            completed: [1, 4].into_iter().collect(),
            statuses: Some(vec![
                MissionStatusRecord { id: 1, status: MissionStatus::Completed },
                MissionStatusRecord { id: 2, status: MissionStatus::Locked },
                MissionStatusRecord { id: 3, status: MissionStatus::Locked },
                MissionStatusRecord { id: 4, status: MissionStatus::Completed },
            ]),
            active_steps_done: Vec::new(),
        });
        b.recompute_unlocks();
        assert_eq!(b.by_id(3).unwrap().status, MissionStatus::Locked);
    }

    #[test]
    fn duplicate_ids_are_skipped() {
        let mut b = MissionBoard::new();
        let mut dup = def(1);
        dup.title = "Impostor".into();
        assert_eq!(b.load(vec![def(1), dup, def(2)]), 2);
        assert_eq!(b.by_id(1).unwrap().title, "Mission 1");
    }

    #[test]
    fn unready_board_refuses_everything() {
        let mut b = MissionBoard::new();
        assert!(!b.is_ready());
        assert!(!b.start(1));
        assert!(b.complete(1).is_none());
        assert!(!b.restore(&MissionSave {
            active_id: None,
            completed: BTreeSet::new(),
            statuses: None,
            active_steps_done: Vec::new(),
        }));
    }

    #[test]
    fn missing_file_leaves_board_unready() {
        let mut b = board(2);
        let err = b.load_from_path(Path::new("definitely/not/here.ron"));
        assert!(matches!(err, Err(MissionError::Io { .. })));
        assert!(!b.is_ready());
        assert!(b.is_empty());
    }

    #[test]
    fn definitions_parse_from_ron() {
        let data = r#"[
            (id: 1, title: "A", description: "d", gem_reward: 2, gem_color: green,
             reference: "r", steps: [(action: collect, target: "chip")]),
            (id: 2, title: "B", description: "d", gem_reward: 1, gem_color: red,
             reference: "r", status: Some(locked)),
        ]"#;
        let defs = parse_definitions(data).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].steps[0].action, StepAction::Collect);
        assert_eq!(defs[1].status, Some(MissionStatus::Locked));
        assert!(parse_definitions("[(id: 1,").is_err());
    }

    #[test]
    fn steps_complete_in_any_order() {
        let mut d = def(1);
        d.steps = vec![
            MissionStep { action: StepAction::Collect, target: "chip".into() },
            MissionStep { action: StepAction::Deliver, target: "mailbox".into() },
        ];
        let mut b = MissionBoard::new();
        b.load(vec![d]);
        assert_eq!(b.record_progress(StepAction::Collect, "chip"), None, "nothing active");
        b.start(1);
        assert_eq!(b.record_progress(StepAction::Deliver, "mailbox"), None);
        assert_eq!(b.record_progress(StepAction::Deliver, "mailbox"), None, "already done");
        assert_eq!(b.record_progress(StepAction::Interact, "chip"), None, "wrong action");
        assert_eq!(b.record_progress(StepAction::Collect, "chip"), Some(1));
    }

    #[test]
    fn serialize_restore_round_trip() {
        let mut b = board(4);
        b.start(1);
        b.complete(1);
        b.start(2);
        let save = b.serialize();

        let mut fresh = board(4);
        assert!(fresh.restore(&save));
        assert_eq!(fresh.active().map(|m| m.id), Some(2));
        assert!(fresh.is_completed(1));
        assert_eq!(fresh.by_id(3).unwrap().status, MissionStatus::Locked);
        assert_eq!(fresh.serialize(), save);
    }

    #[test]
    fn legacy_save_recomputes_statuses() {
        let mut b = board(4);
        b.restore(&MissionSave {
            active_id: Some(3),
            completed: [1, 2].into_iter().collect(),
            statuses: None,
            active_steps_done: Vec::new(),
        });
        assert_eq!(b.by_id(1).unwrap().status, MissionStatus::Completed);
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Completed);
        assert_eq!(b.by_id(3).unwrap().status, MissionStatus::Active);
        assert_eq!(b.by_id(4).unwrap().status, MissionStatus::Locked);
    }

    #[test]
    fn inconsistent_active_status_is_corrected() {
        let mut b = board(3);
        b.restore(&MissionSave {
            active_id: Some(2),
            completed: [1].into_iter().collect(),
            statuses: Some(vec![
                MissionStatusRecord { id: 1, status: MissionStatus::Completed },
                MissionStatusRecord { id: 2, status: MissionStatus::Available },
            ]),
            active_steps_done: Vec::new(),
        });
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Active);
        assert!(!b.start(1));
    }

    #[test]
    fn second_active_definition_is_demoted() {
        let mut defs: Vec<MissionDefinition> = (1..=3).map(def).collect();
        defs[0].status = Some(MissionStatus::Active);
        defs[1].status = Some(MissionStatus::Active);
        let mut b = MissionBoard::new();
        b.load(defs);
        assert_eq!(active_count(&b), 1);
        assert_eq!(b.active().map(|m| m.id), Some(1));
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Locked);

        assert!(b.complete(1).is_some());
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Available);
        assert!(b.start(2));
        assert!(b.complete(2).is_some());
    }

    #[test]
    fn restore_keeps_a_single_active_mission() {
        let mut b = board(4);
        b.restore(&MissionSave {
            active_id: Some(2),
            completed: [1].into_iter().collect(),
            statuses: Some(vec![
                MissionStatusRecord { id: 1, status: MissionStatus::Completed },
                MissionStatusRecord { id: 2, status: MissionStatus::Active },
                MissionStatusRecord { id: 3, status: MissionStatus::Active },
                MissionStatusRecord { id: 4, status: MissionStatus::Locked },
            ]),
            active_steps_done: Vec::new(),
        });
        assert_eq!(active_count(&b), 1);
        assert_eq!(b.active().map(|m| m.id), Some(2));
        assert_eq!(b.by_id(3).unwrap().status, MissionStatus::Locked);

        b.restore(&MissionSave {
            active_id: None,
            completed: [1].into_iter().collect(),
            statuses: Some(vec![MissionStatusRecord { id: 2, status: MissionStatus::Active }]),
            active_steps_done: Vec::new(),
        });
        assert_eq!(active_count(&b), 0);
        assert_eq!(b.by_id(2).unwrap().status, MissionStatus::Available);
    }

    #[test]
    fn delivered_targets_cover_finished_and_active_missions() {
        let mut first = def(1);
        first.steps = vec![MissionStep { action: StepAction::Deliver, target: "mailbox".into() }];
        let mut second = def(2);
        second.steps = vec![
            MissionStep { action: StepAction::Deliver, target: "locker".into() },
            MissionStep { action: StepAction::Interact, target: "panel".into() },
        ];
        let mut b = MissionBoard::new();
        b.load(vec![first, second]);
        assert!(b.delivered_targets().is_empty());

        b.start(1);
        assert_eq!(b.record_progress(StepAction::Deliver, "mailbox"), Some(1));
        b.complete(1);
        b.start(2);
        b.record_progress(StepAction::Deliver, "locker");
        let delivered: Vec<String> = b.delivered_targets().into_iter().collect();
        assert_eq!(delivered, vec!["locker".to_string(), "mailbox".to_string()]);
    }

    #[test]
    fn reference_query() {
        let b = board(4);
        let odd: Vec<u32> = b.by_reference("odd").iter().map(|m| m.id).collect();
        assert_eq!(odd, vec![1, 3]);
        assert!(b.by_reference("none").is_empty());
    }

    #[test]
    fn shipped_definitions_form_a_chain() {
        let defs = parse_definitions(include_str!("../../../assets/data/missions.ron")).unwrap();
        let mut b = MissionBoard::new();
        assert_eq!(b.load(defs), 8);
        assert_eq!(b.by_id(1).unwrap().status, MissionStatus::Available);
        assert!((2..=8).all(|id| b.by_id(id).unwrap().status == MissionStatus::Locked));
        assert!(b.by_id(3).unwrap().has_pending_step(StepAction::Deliver, "buzon_terminal_1"));
    }
}
