//! City layout: zones, streets, ramps, interactables and NPCs.

use engine_core::Vec3;
use std::f32::consts::PI;

use crate::player::InventoryItem;

/// Distance between neighbouring zone centres.
pub const BUILDING_SPACING: f32 = 15.0;
pub const STREET_WIDTH: f32 = 5.0;
/// Size of the ground plane (square).
pub const GROUND_SIZE: f32 = 200.0;
/// Top face of the ground plane.
pub const GROUND_LEVEL: f32 = -0.1;
pub const PLATFORM_HEIGHT: f32 = 0.2;
/// NPC body centre height.
pub const NPC_HEIGHT: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureShape {
    Building,
    /// Upright cylinder; size.x is the diameter.
    Tower,
}

#[derive(Debug, Clone)]
pub struct ZoneSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub center: Vec3,
    /// Platform width and depth.
    pub footprint: (f32, f32),
    pub structure: StructureShape,
    pub structure_size: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct StreetSpec {
    pub start: Vec3,
    pub end: Vec3,
    pub width: f32,
}

impl StreetSpec {
    /// Whether `point` lies on the street surface, ignoring height.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        let start = Vec3::new(self.start.x, 0.0, self.start.z);
        let along = Vec3::new(self.end.x, 0.0, self.end.z) - start;
        let offset = Vec3::new(point.x, 0.0, point.z) - start;
        let t = if along.length_squared() > 0.0 {
            (offset.dot(along) / along.length_squared()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        offset.distance(along * t) <= self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RampSpec {
    pub position: Vec3,
    pub size: Vec3,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    LogPanel,
    ReadPanel,
    ReadMailbox,
    ViewTerminal,
    ViewDashboard,
    ViewDemo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    DepositItem,
    ActivateTerminal,
    RepairModule,
    ActivateNode,
    RunMigration,
}

/// What happens when the player interacts.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionKind {
    Npc { dialogue: String },
    CollectibleItem { item: InventoryItem },
    Panel { kind: PanelKind },
    MissionObject {
        kind: DeviceKind,
        requires_item: Option<String>,
    },
    Market,
}

#[derive(Debug, Clone)]
pub struct InteractableSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub position: Vec3,
    pub size: Vec3,
    pub kind: InteractionKind,
    pub prompt: Option<&'static str>,
    pub content: &'static str,
}

#[derive(Debug, Clone)]
pub struct NpcSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub position: Vec3,
    pub patrol_radius: f32,
    pub dialogue: &'static str,
}

const S: f32 = BUILDING_SPACING;

pub fn zones() -> Vec<ZoneSpec> {
    let zone = |id, name, center, footprint, structure, structure_size| ZoneSpec {
        id,
        name,
        center,
        footprint,
        structure,
        structure_size,
    };
    use StructureShape::*;
    vec![
        zone("campus_vision", "Vision Campus", Vec3::new(0.0, 0.0, S), (10.0, 8.0), Building, Vec3::new(8.0, 6.0, 6.0)),
        zone("taller_audio", "Audio Workshop", Vec3::new(S, 0.0, 0.0), (8.0, 8.0), Building, Vec3::new(6.0, 5.0, 6.0)),
        zone("canalizaciones_datos", "Data Pipelines", Vec3::new(0.0, 0.0, -S), (10.0, 8.0), Building, Vec3::new(8.0, 4.0, 6.0)),
        zone("torre_kafka", "Kafka Tower", Vec3::new(-S, 0.0, 0.0), (8.0, 8.0), Tower, Vec3::new(4.0, 10.0, 4.0)),
        zone("lab_gpu_redis", "GPU Lab", Vec3::new(S, 0.0, 2.0 * S), (8.0, 8.0), Building, Vec3::new(6.0, 4.0, 8.0)),
        zone("redis_hub", "Redis Hub", Vec3::new(2.0 * S, 0.0, S), (8.0, 8.0), Building, Vec3::new(6.0, 5.0, 6.0)),
        zone("centro_yoloservice", "Yolo Center", Vec3::new(-S, 0.0, 2.0 * S), (8.0, 8.0), Building, Vec3::new(6.0, 6.0, 6.0)),
        zone("mercado", "Market", Vec3::new(-2.0 * S, 0.0, -S), (8.0, 8.0), Building, Vec3::new(7.0, 3.0, 7.0)),
    ]
}

pub fn streets() -> Vec<StreetSpec> {
    let street = |start: Vec3, end: Vec3| StreetSpec {
        start,
        end,
        width: STREET_WIDTH,
    };
    vec![
        street(Vec3::new(-3.0 * S, 0.0, 0.0), Vec3::new(3.0 * S, 0.0, 0.0)),
        street(Vec3::new(0.0, 0.0, -3.0 * S), Vec3::new(0.0, 0.0, 3.0 * S)),
        street(Vec3::new(S, 0.0, 0.0), Vec3::new(S, 0.0, 2.0 * S)),
        street(Vec3::new(S, 0.0, S), Vec3::new(2.0 * S, 0.0, S)),
        street(Vec3::new(-S, 0.0, 0.0), Vec3::new(-S, 0.0, 2.0 * S)),
        street(Vec3::new(-2.0 * S, 0.0, -S), Vec3::new(-S, 0.0, -S)),
    ]
}

pub fn ramps() -> Vec<RampSpec> {
    vec![
        RampSpec {
            position: Vec3::new(S / 2.0, 0.0, S / 2.0),
            size: Vec3::new(4.0, 1.5, 4.0),
            rotation: Vec3::new(-PI / 8.0, PI / 4.0, 0.0),
        },
        RampSpec {
            position: Vec3::new(-S / 2.0, 0.0, -S / 2.0),
            size: Vec3::new(4.0, 1.2, 4.0),
            rotation: Vec3::new(-PI / 10.0, -PI / 4.0, 0.0),
        },
        RampSpec {
            position: Vec3::new(S / 2.0, 0.0, -S * 1.5),
            size: Vec3::new(5.0, 1.8, 4.0),
            rotation: Vec3::new(-PI / 6.0, PI / 6.0, 0.0),
        },
    ]
}

fn panel(
    id: &'static str,
    name: &'static str,
    position: Vec3,
    kind: PanelKind,
    prompt: &'static str,
    content: &'static str,
) -> InteractableSpec {
    InteractableSpec {
        id,
        name,
        position,
        size: Vec3::new(1.5, 1.5, 0.2),
        kind: InteractionKind::Panel { kind },
        prompt: Some(prompt),
        content,
    }
}

fn device(
    id: &'static str,
    name: &'static str,
    position: Vec3,
    kind: DeviceKind,
    requires_item: Option<&str>,
    prompt: &'static str,
    content: &'static str,
) -> InteractableSpec {
    InteractableSpec {
        id,
        name,
        position,
        size: TERMINAL_SIZE,
        kind: InteractionKind::MissionObject {
            kind,
            requires_item: requires_item.map(str::to_string),
        },
        prompt: Some(prompt),
        content,
    }
}

const TERMINAL_SIZE: Vec3 = Vec3::new(1.2, 1.8, 0.8);

pub fn interactables() -> Vec<InteractableSpec> {
    vec![
        panel(
            "log_panel_1",
            "wiliutils Log Panel",
            Vec3::new(0.0, 1.0, S + 4.0),
            PanelKind::LogPanel,
            "Press [E] to read the log panel",
            "wiliutils is a Python utility collection for logging, file handling and text processing. \
             It keeps repetitive tasks short and is the base of every other project here.",
        ),
        InteractableSpec {
            size: Vec3::new(1.0, 1.5, 1.0),
            ..device(
                "buzon_terminal_1",
                "Terminal Mailbox",
                Vec3::new(3.0, 1.0, S + 3.0),
                DeviceKind::DepositItem,
                Some("chip_wkafka"),
                "Press [E] to deposit the chip",
                "This mailbox forwards configuration chips to the distributed processing services.",
            )
        },
        InteractableSpec {
            size: Vec3::new(1.0, 1.5, 1.0),
            ..panel(
                "buzon_digital_logs_faciales",
                "Digital Mailbox",
                Vec3::new(-3.0, 1.0, S + 3.0),
                PanelKind::ReadMailbox,
                "Press [E] to review the facial logs",
                "The facial recognition system uses convolutional networks to detect and recognise faces. \
                 The logs list precision and throughput of the trained model.",
            )
        },
        InteractableSpec {
            id: "chip_wkafka_1",
            name: "WKafka Chip",
            position: Vec3::new(S + 3.0, 1.0, 2.0),
            size: Vec3::splat(0.5),
            kind: InteractionKind::CollectibleItem {
                item: InventoryItem {
                    id: "chip_wkafka".to_string(),
                    name: "WKafka Config Chip".to_string(),
                    description: "Holds configuration for the wkafka messaging system".to_string(),
                },
            },
            prompt: Some("Press [E] to pick up the chip"),
            content: "",
        },
        device(
            "terminal_kafka_test_1",
            "Simulation Terminal",
            Vec3::new(-S - 2.0, 1.0, 3.0),
            DeviceKind::ActivateTerminal,
            None,
            "Press [E] to activate the terminal",
            "wkafka is a messaging layer over Apache Kafka for IoT and real-time events. \
             This terminal sends test events to verify the queues and consumer distribution.",
        ),
        panel(
            "panel_redis_map_1",
            "Cluster Map Panel",
            Vec3::new(2.0 * S + 2.0, 1.0, S + 2.0),
            PanelKind::ReadPanel,
            "Press [E] to view the cluster map",
            "wredis wraps Redis for distributed applications. The map shows primary and replica nodes, \
             how keys are sharded and how replication keeps the cluster available.",
        ),
        InteractableSpec {
            size: Vec3::splat(1.2),
            ..device(
                "repair_module_1",
                "Faulty Module",
                Vec3::new(S + 3.0, 1.0, 2.0 * S - 2.0),
                DeviceKind::RepairModule,
                None,
                "Press [E] to repair the module",
                "wcontainer schedules containers for machine learning workloads and balances GPU use \
                 across cards during parallel training.",
            )
        },
        InteractableSpec {
            size: TERMINAL_SIZE,
            ..panel(
                "terminal_yolo_main_1",
                "Main Terminal",
                Vec3::new(-S - 2.0, 1.0, 2.0 * S - 1.0),
                PanelKind::ViewTerminal,
                "Press [E] to inspect the architecture",
                "wyoloservice trains and serves YOLO object detection models. \
                 Images pass through the network once to predict boxes and classes.",
            )
        },
        InteractableSpec {
            size: Vec3::new(1.0, 1.5, 1.0),
            ..device(
                "controlador_optuna_1",
                "Optuna Controller",
                Vec3::new(-S - 3.0, 1.0, 2.0 * S + 2.0),
                DeviceKind::ActivateNode,
                None,
                "Press [E] to activate Optuna",
                "Optuna searches hyperparameters automatically: learning rate, batch size and network shape \
                 are tuned to get the best out of the YOLO models.",
            )
        },
        panel(
            "panel_wml_architecture_1",
            "WML Architecture Panel",
            Vec3::new(0.0, 1.0, -S - 2.0),
            PanelKind::ReadPanel,
            "Press [E] to explore WML",
            "WML unifies preprocessing, training, evaluation and deployment of machine learning models.",
        ),
        InteractableSpec {
            size: TERMINAL_SIZE,
            ..panel(
                "dashboard_wmonitor_1",
                "WMonitor Dashboard",
                Vec3::new(3.0, 1.0, -S - 1.0),
                PanelKind::ViewDashboard,
                "Press [E] to configure WMonitor",
                "WMonitor collects CPU, memory, network and application metrics and flags anomalies.",
            )
        },
        InteractableSpec {
            size: TERMINAL_SIZE,
            ..panel(
                "demo_wapi_interactive_1",
                "WAPI Interactive Demo",
                Vec3::new(-2.0 * S - 2.0, 1.0, -S + 1.0),
                PanelKind::ViewDemo,
                "Press [E] to try WAPI",
                "WAPI is a web framework for REST APIs with request validation and generated OpenAPI docs.",
            )
        },
        device(
            "terminal_wdbmigrate_1",
            "WDBMigrate Terminal",
            Vec3::new(-2.0 * S + 2.0, 1.0, -S - 2.0),
            DeviceKind::RunMigration,
            None,
            "Press [E] to run the migration",
            "WDBMigrate migrates database schemas across engines with automatic rollbacks \
             and integrity checks.",
        ),
        InteractableSpec {
            id: "market_kiosk_1",
            name: "Market Kiosk",
            position: Vec3::new(-2.0 * S + 4.0, 1.0, -S + 4.5),
            size: Vec3::new(1.5, 2.0, 1.5),
            kind: InteractionKind::Market,
            prompt: Some("Press [E] to browse upgrades"),
            content: "",
        },
    ]
}

pub fn npcs() -> Vec<NpcSpec> {
    vec![
        NpcSpec {
            id: "profesor_lumen",
            name: "Professor Lumen",
            position: Vec3::new(5.0, 0.0, 5.0),
            patrol_radius: 3.0,
            dialogue: "Welcome! Rebuilding the legacy starts with the basics: explore the campus \
                       and find the log panel.",
        },
        NpcSpec {
            id: "tecnico_otto",
            name: "Technician Otto",
            position: Vec3::new(-10.0, 0.0, 15.0),
            patrol_radius: 2.0,
            dialogue: "Need an analysis module? Or a repair on those containers? Bring me the parts.",
        },
        NpcSpec {
            id: "analista_vega",
            name: "Analyst Vega",
            position: Vec3::new(15.0, 0.0, -10.0),
            patrol_radius: 3.0,
            dialogue: "Data is the key. Facial logs or Kafka streams, understanding them is power.",
        },
        NpcSpec {
            id: "ia_yulia",
            name: "Yulia AI",
            position: Vec3::new(-15.0, 0.0, -15.0),
            patrol_radius: 0.0,
            dialogue: "I see images without eyes. To tune me, find the tool whose name rhymes with fortune.",
        },
        NpcSpec {
            id: "mercader_torus",
            name: "Torus the Merchant",
            position: Vec3::new(25.0, 0.0, 25.0),
            patrol_radius: 1.0,
            dialogue: "Shiny coins for useful upgrades! Speed, detection, analysis, I have it all.",
        },
    ]
}
