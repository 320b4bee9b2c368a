use serde_json::Map;

use crate::record::{ProductRecord, Stage, StageStatus, TimelineEntry};

/// The two demo records written into an empty registry on first start.
pub fn demo_products() -> Vec<ProductRecord> {
    vec![
        ProductRecord {
            id: "AGT001".to_string(),
            name: "Organic Tomatoes".to_string(),
            farm: "Green Valley Farms".to_string(),
            harvest_date: "2024-01-15".to_string(),
            current_location: "Distribution Center".to_string(),
            status: "Fresh".to_string(),
            timeline: vec![
                TimelineEntry::new(
                    Stage::Harvesting,
                    "Green Valley Farms",
                    "2024-01-15",
                    "22°C",
                    StageStatus::Completed,
                ),
                TimelineEntry::new(
                    Stage::Storage,
                    "Cold Storage Unit #5",
                    "2024-01-16",
                    "4°C",
                    StageStatus::Completed,
                ),
                TimelineEntry::new(
                    Stage::Transport,
                    "In Transit to Retail",
                    "2024-01-18",
                    "6°C",
                    StageStatus::Current,
                ),
                TimelineEntry::new(
                    Stage::Retail,
                    "Supermarket Shelf",
                    "2024-01-19",
                    "8°C",
                    StageStatus::Upcoming,
                ),
            ],
            extra: Map::new(),
        },
        ProductRecord {
            id: "AGT002".to_string(),
            name: "Fresh Carrots".to_string(),
            farm: "Sunshine Farms".to_string(),
            harvest_date: "2024-01-10".to_string(),
            current_location: "Retail Store".to_string(),
            status: "Good".to_string(),
            timeline: vec![
                TimelineEntry::new(
                    Stage::Harvesting,
                    "Sunshine Farms",
                    "2024-01-10",
                    "18°C",
                    StageStatus::Completed,
                ),
                TimelineEntry::new(
                    Stage::Storage,
                    "Warehouse A",
                    "2024-01-11",
                    "5°C",
                    StageStatus::Completed,
                ),
                TimelineEntry::new(
                    Stage::Transport,
                    "Delivery Truck",
                    "2024-01-12",
                    "7°C",
                    StageStatus::Completed,
                ),
                TimelineEntry::new(
                    Stage::Retail,
                    "Local Market",
                    "2024-01-13",
                    "10°C",
                    StageStatus::Current,
                ),
            ],
            extra: Map::new(),
        },
    ]
}
