use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Location assigned to a freshly registered product.
pub const DEFAULT_LOCATION: &str = "Farm - Ready for Processing";

/// Status assigned to a freshly registered product.
pub const DEFAULT_STATUS: &str = "Fresh";

/// Placeholder for a location or date that is not known yet.
pub const PENDING: &str = "Pending";

/// Temperature sentinel; clients omit it from display.
pub const TEMPERATURE_NOT_AVAILABLE: &str = "N/A";

/// Temperature recorded for the harvesting stage of a new registration.
const HARVEST_TEMPERATURE: &str = "22°C";

/// The on-disk container: `{ "products": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// One tracked product and its full stage history.
///
/// Absent fields load as empty values and unrecognised keys are carried in
/// `extra`, so a rewrite of the registry keeps whatever other tools stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub farm: String,
    pub harvest_date: String,
    pub current_location: String,
    pub status: String,
    pub timeline: Vec<TimelineEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One stage event in a product's history.
///
/// `stage` and `status` are kept as free-form strings so that files written by
/// other tools still load; [`Stage`] and [`StageStatus`] classify them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEntry {
    pub stage: String,
    pub location: String,
    pub date: String,
    pub temperature: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimelineEntry {
    pub fn new(
        stage: Stage,
        location: impl Into<String>,
        date: impl Into<String>,
        temperature: impl Into<String>,
        status: StageStatus,
    ) -> Self {
        Self {
            stage: stage.label().to_string(),
            location: location.into(),
            date: date.into(),
            temperature: temperature.into(),
            status: status.as_str().to_string(),
            extra: Map::new(),
        }
    }

    /// The known stage this entry refers to, if any.
    pub fn known_stage(&self) -> Option<Stage> {
        Stage::from_label(&self.stage)
    }

    /// The display status of this entry, if it is one of the known values.
    pub fn stage_status(&self) -> Option<StageStatus> {
        self.status.parse().ok()
    }

    /// Temperature for display, `None` when it holds the `"N/A"` sentinel.
    pub fn displayed_temperature(&self) -> Option<&str> {
        if self.temperature == TEMPERATURE_NOT_AVAILABLE {
            None
        } else {
            Some(&self.temperature)
        }
    }
}

/// Supply-chain stages with a dedicated label.
///
/// The set is open-ended on the wire: entries may carry any stage string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Harvesting,
    Processing,
    Storage,
    Transport,
    Retail,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Harvesting,
        Stage::Processing,
        Stage::Storage,
        Stage::Transport,
        Stage::Retail,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Harvesting => "Harvesting",
            Stage::Processing => "Processing",
            Stage::Storage => "Storage",
            Stage::Transport => "Transport",
            Stage::Retail => "Retail",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display status of a timeline entry. Advisory only; nothing transitions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageStatus {
    Completed,
    Current,
    Upcoming,
}

impl StageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Completed => "completed",
            StageStatus::Current => "current",
            StageStatus::Upcoming => "upcoming",
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(StageStatus::Completed),
            "current" => Ok(StageStatus::Current),
            "upcoming" => Ok(StageStatus::Upcoming),
            _ => Err(format!("Invalid stage status: {}", s)),
        }
    }
}

/// Input of a registration: the three fields a caller must supply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub farm: String,
    pub harvest_date: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        farm: impl Into<String>,
        harvest_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            farm: farm.into(),
            harvest_date: harvest_date.into(),
        }
    }

    /// Names (wire spelling) of the required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.farm.is_empty() {
            missing.push("farm");
        }
        if self.harvest_date.is_empty() {
            missing.push("harvestDate");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl ProductRecord {
    /// Build a newly registered product: harvesting done at the farm, the
    /// remaining three stages pending.
    pub fn registered(id: String, draft: NewProduct) -> Self {
        let timeline = vec![
            TimelineEntry::new(
                Stage::Harvesting,
                draft.farm.clone(),
                draft.harvest_date.clone(),
                HARVEST_TEMPERATURE,
                StageStatus::Completed,
            ),
            TimelineEntry::new(
                Stage::Processing,
                "Awaiting Processing",
                PENDING,
                TEMPERATURE_NOT_AVAILABLE,
                StageStatus::Upcoming,
            ),
            TimelineEntry::new(
                Stage::Storage,
                PENDING,
                PENDING,
                TEMPERATURE_NOT_AVAILABLE,
                StageStatus::Upcoming,
            ),
            TimelineEntry::new(
                Stage::Retail,
                PENDING,
                PENDING,
                TEMPERATURE_NOT_AVAILABLE,
                StageStatus::Upcoming,
            ),
        ];

        Self {
            id,
            name: draft.name,
            farm: draft.farm,
            harvest_date: draft.harvest_date,
            current_location: DEFAULT_LOCATION.to_string(),
            status: DEFAULT_STATUS.to_string(),
            timeline,
            extra: Map::new(),
        }
    }
}
