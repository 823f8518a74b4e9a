//! Catalog of sensor kinds reported by JQ-300/200/100 meters.
//!
//! The cloud identifies each measurement by a numeric id. Only ids listed
//! here are turned into entities; anything else the cloud reports is ignored.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, FromRepr};

/// Device class advertised to the host for a sensor kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    Humidity,
    Pm25,
    Pm10,
    VolatileOrganicCompounds,
    CarbonDioxide,
}

/// Kind of measurement, keyed by the cloud's numeric sensor id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromRepr, EnumIter)]
#[repr(u16)]
pub enum SensorKind {
    Temperature = 4,
    Humidity = 5,
    Pm25 = 6,
    Hcho = 7,
    Tvoc = 8,
    Eco2 = 9,
    Pm10 = 10,
}

/// Static presentation metadata for a sensor kind.
#[derive(Debug, PartialEq, Eq)]
pub struct SensorDescription {
    /// Human-readable label, appended to the device name.
    pub label: &'static str,
    /// Unit used when the controller does not report one.
    pub unit: &'static str,
    pub icon: &'static str,
    pub device_class: Option<DeviceClass>,
    /// Shorter name used for entity ids instead of the label.
    pub short_name: Option<&'static str>,
}

const TEMPERATURE: SensorDescription = SensorDescription {
    label: "Temperature",
    unit: "°C",
    icon: "mdi:thermometer",
    device_class: Some(DeviceClass::Temperature),
    short_name: Some("temp"),
};

const HUMIDITY: SensorDescription = SensorDescription {
    label: "Humidity",
    unit: "%",
    icon: "mdi:water-percent",
    device_class: Some(DeviceClass::Humidity),
    short_name: Some("hum"),
};

const PM25: SensorDescription = SensorDescription {
    label: "PM 2.5",
    unit: "µg/m³",
    icon: "mdi:air-filter",
    device_class: Some(DeviceClass::Pm25),
    short_name: Some("pm25"),
};

const HCHO: SensorDescription = SensorDescription {
    label: "Formaldehyde",
    unit: "mg/m³",
    icon: "mdi:chemical-weapon",
    device_class: None,
    short_name: Some("hcho"),
};

const TVOC: SensorDescription = SensorDescription {
    label: "Total Volatile Organic Compounds",
    unit: "mg/m³",
    icon: "mdi:air-filter",
    device_class: Some(DeviceClass::VolatileOrganicCompounds),
    short_name: Some("tvoc"),
};

const ECO2: SensorDescription = SensorDescription {
    label: "eCO2",
    unit: "ppm",
    icon: "mdi:molecule-co2",
    device_class: Some(DeviceClass::CarbonDioxide),
    short_name: Some("eco2"),
};

const PM10: SensorDescription = SensorDescription {
    label: "PM 10",
    unit: "µg/m³",
    icon: "mdi:air-filter",
    device_class: Some(DeviceClass::Pm10),
    short_name: None,
};

impl SensorKind {
    /// Numeric id used by the cloud for this kind.
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Look up a kind by cloud id. Returns `None` for kinds not in the catalog.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::from_repr(id)
    }

    pub fn description(self) -> &'static SensorDescription {
        match self {
            Self::Temperature => &TEMPERATURE,
            Self::Humidity => &HUMIDITY,
            Self::Pm25 => &PM25,
            Self::Hcho => &HCHO,
            Self::Tvoc => &TVOC,
            Self::Eco2 => &ECO2,
            Self::Pm10 => &PM10,
        }
    }

    /// Name used when deriving entity ids: the short name, or the label.
    pub fn entity_name(self) -> &'static str {
        let description = self.description();
        description.short_name.unwrap_or(description.label)
    }
}
