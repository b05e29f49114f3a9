//! Mode 01 parameter IDs
//!
//! Each [`Pid`] knows its wire code, how many data bytes a response carries
//! and how to turn those bytes into a physical value using the standard
//! scale and offset.

use crate::error::ParseError;

/// Mode 01 PIDs understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pid {
    /// PIDs supported [01 - 20]
    SupportedPids01To20,
    /// PIDs supported [21 - 40]
    SupportedPids21To40,
    /// PIDs supported [41 - 60]
    SupportedPids41To60,
    /// PIDs supported [61 - 80]
    SupportedPids61To80,
    /// PIDs supported [81 - A0]
    SupportedPids81ToA0,
    /// Monitor status since DTCs cleared
    MonitorStatus,
    /// Engine coolant temperature
    CoolantTemperature,
    /// Short term fuel trim, bank 1
    ShortTermFuelTrimBank1,
    /// Engine speed
    EngineSpeed,
    /// Vehicle speed
    VehicleSpeed,
    /// Throttle position
    ThrottlePosition,
    /// Fuel tank level input
    FuelTankLevel,
    /// Distance traveled since codes cleared
    DistanceSinceCodesCleared,
    /// Control module voltage
    ControlModuleVoltage,
    /// Ambient air temperature
    AmbientAirTemperature,
    /// Transmission actual gear
    TransmissionActualGear,
    /// Odometer
    Odometer,
}

impl Pid {
    /// Every known PID, ordered by code
    pub const ALL: [Pid; 17] = [
        Pid::SupportedPids01To20,
        Pid::MonitorStatus,
        Pid::CoolantTemperature,
        Pid::ShortTermFuelTrimBank1,
        Pid::EngineSpeed,
        Pid::VehicleSpeed,
        Pid::ThrottlePosition,
        Pid::SupportedPids21To40,
        Pid::FuelTankLevel,
        Pid::DistanceSinceCodesCleared,
        Pid::SupportedPids41To60,
        Pid::ControlModuleVoltage,
        Pid::AmbientAirTemperature,
        Pid::SupportedPids61To80,
        Pid::SupportedPids81ToA0,
        Pid::TransmissionActualGear,
        Pid::Odometer,
    ];

    /// The PID byte on the wire
    pub fn code(&self) -> u8 {
        match self {
            Pid::SupportedPids01To20 => 0x00,
            Pid::MonitorStatus => 0x01,
            Pid::CoolantTemperature => 0x05,
            Pid::ShortTermFuelTrimBank1 => 0x06,
            Pid::EngineSpeed => 0x0C,
            Pid::VehicleSpeed => 0x0D,
            Pid::ThrottlePosition => 0x11,
            Pid::SupportedPids21To40 => 0x20,
            Pid::FuelTankLevel => 0x2F,
            Pid::DistanceSinceCodesCleared => 0x31,
            Pid::SupportedPids41To60 => 0x40,
            Pid::ControlModuleVoltage => 0x42,
            Pid::AmbientAirTemperature => 0x46,
            Pid::SupportedPids61To80 => 0x60,
            Pid::SupportedPids81ToA0 => 0x80,
            Pid::TransmissionActualGear => 0xA4,
            Pid::Odometer => 0xA6,
        }
    }

    /// Look up a PID by its wire byte
    pub fn from_code(code: u8) -> Result<Pid, ParseError> {
        Self::ALL
            .into_iter()
            .find(|pid| pid.code() == code)
            .ok_or(ParseError::UnknownPid(code))
    }

    /// The PID as it appears in a request, e.g. `"0C"`
    pub fn hex(&self) -> &'static str {
        match self {
            Pid::SupportedPids01To20 => "00",
            Pid::MonitorStatus => "01",
            Pid::CoolantTemperature => "05",
            Pid::ShortTermFuelTrimBank1 => "06",
            Pid::EngineSpeed => "0C",
            Pid::VehicleSpeed => "0D",
            Pid::ThrottlePosition => "11",
            Pid::SupportedPids21To40 => "20",
            Pid::FuelTankLevel => "2F",
            Pid::DistanceSinceCodesCleared => "31",
            Pid::SupportedPids41To60 => "40",
            Pid::ControlModuleVoltage => "42",
            Pid::AmbientAirTemperature => "46",
            Pid::SupportedPids61To80 => "60",
            Pid::SupportedPids81ToA0 => "80",
            Pid::TransmissionActualGear => "A4",
            Pid::Odometer => "A6",
        }
    }

    /// Returns a human-readable name for the PID
    pub fn name(&self) -> &'static str {
        match self {
            Pid::SupportedPids01To20 => "PIDs supported [01 - 20]",
            Pid::SupportedPids21To40 => "PIDs supported [21 - 40]",
            Pid::SupportedPids41To60 => "PIDs supported [41 - 60]",
            Pid::SupportedPids61To80 => "PIDs supported [61 - 80]",
            Pid::SupportedPids81ToA0 => "PIDs supported [81 - A0]",
            Pid::MonitorStatus => "Monitor status since DTCs cleared",
            Pid::CoolantTemperature => "Engine coolant temperature",
            Pid::ShortTermFuelTrimBank1 => "Short term fuel trim - Bank 1",
            Pid::EngineSpeed => "Engine speed",
            Pid::VehicleSpeed => "Vehicle speed",
            Pid::ThrottlePosition => "Throttle position",
            Pid::FuelTankLevel => "Fuel tank level input",
            Pid::DistanceSinceCodesCleared => "Distance traveled since codes cleared",
            Pid::ControlModuleVoltage => "Control module voltage",
            Pid::AmbientAirTemperature => "Ambient air temperature",
            Pid::TransmissionActualGear => "Transmission actual gear",
            Pid::Odometer => "Odometer",
        }
    }

    /// Unit of the decoded value, empty for bitmask and status PIDs
    pub fn unit(&self) -> &'static str {
        match self {
            Pid::CoolantTemperature | Pid::AmbientAirTemperature => "°C",
            Pid::ShortTermFuelTrimBank1 | Pid::ThrottlePosition | Pid::FuelTankLevel => "%",
            Pid::EngineSpeed => "rpm",
            Pid::VehicleSpeed => "km/h",
            Pid::DistanceSinceCodesCleared | Pid::Odometer => "km",
            Pid::ControlModuleVoltage => "V",
            Pid::TransmissionActualGear => ":1",
            Pid::SupportedPids01To20
            | Pid::SupportedPids21To40
            | Pid::SupportedPids41To60
            | Pid::SupportedPids61To80
            | Pid::SupportedPids81ToA0
            | Pid::MonitorStatus => "",
        }
    }

    /// Number of data bytes following the PID byte in a response
    pub fn data_len(&self) -> usize {
        match self {
            Pid::CoolantTemperature
            | Pid::ShortTermFuelTrimBank1
            | Pid::VehicleSpeed
            | Pid::ThrottlePosition
            | Pid::FuelTankLevel
            | Pid::AmbientAirTemperature => 1,
            Pid::EngineSpeed | Pid::DistanceSinceCodesCleared | Pid::ControlModuleVoltage => 2,
            Pid::SupportedPids01To20
            | Pid::SupportedPids21To40
            | Pid::SupportedPids41To60
            | Pid::SupportedPids61To80
            | Pid::SupportedPids81ToA0
            | Pid::MonitorStatus
            | Pid::TransmissionActualGear
            | Pid::Odometer => 4,
        }
    }

    /// Whether this PID is one of the "PIDs supported" bitmask queries
    pub fn is_supported_bitmask(&self) -> bool {
        matches!(
            self,
            Pid::SupportedPids01To20
                | Pid::SupportedPids21To40
                | Pid::SupportedPids41To60
                | Pid::SupportedPids61To80
                | Pid::SupportedPids81ToA0
        )
    }

    /// Decode response data bytes into a physical value
    ///
    /// Returns `None` for PIDs without a scalar value (bitmasks, monitor
    /// status) or when `data` is shorter than [`Pid::data_len`].
    pub fn decode(&self, data: &[u8]) -> Option<f64> {
        if data.len() < self.data_len() {
            return None;
        }
        let a = f64::from(data[0]);
        let word = || f64::from(u16::from_be_bytes([data[0], data[1]]));

        match self {
            Pid::CoolantTemperature | Pid::AmbientAirTemperature => Some(a - 40.0),
            Pid::ShortTermFuelTrimBank1 => Some(a * 100.0 / 128.0 - 100.0),
            Pid::ThrottlePosition | Pid::FuelTankLevel => Some(a * 100.0 / 255.0),
            Pid::EngineSpeed => Some(word() / 4.0),
            Pid::VehicleSpeed => Some(a),
            Pid::DistanceSinceCodesCleared => Some(word()),
            Pid::ControlModuleVoltage => Some(word() / 1000.0),
            // Ratio is carried in the first two data bytes
            Pid::TransmissionActualGear => Some(word() / 1000.0),
            Pid::Odometer => {
                let raw = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
                Some(f64::from(raw) / 10.0)
            }
            Pid::SupportedPids01To20
            | Pid::SupportedPids21To40
            | Pid::SupportedPids41To60
            | Pid::SupportedPids61To80
            | Pid::SupportedPids81ToA0
            | Pid::MonitorStatus => None,
        }
    }

    /// Expand a "PIDs supported" bitmask into the PID codes it announces
    ///
    /// Bit 31 of the mask stands for the PID right after this one.
    pub fn supported_pids(&self, data: &[u8]) -> Option<Vec<u8>> {
        if !self.is_supported_bitmask() || data.len() < 4 {
            return None;
        }
        let mask = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let base = self.code();
        Some(
            (0..32u8)
                .filter(|bit| mask & (0x8000_0000 >> bit) != 0)
                .map(|bit| base + bit + 1)
                .collect(),
        )
    }
}
