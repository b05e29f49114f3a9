//! PID response table
//!
//! Requests are matched against an ordered list of entries. A PID code is
//! recognized when it starts with the entry's key, and the first entry that
//! matches wins, so new entries must be placed with their priority in mind.

use obd_protocol::{ParseError, Pid, ResponseFrame};

use crate::waveform::WaveformGenerator;

/// How an entry produces its reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Constant data bytes
    Fixed(&'static [u8]),
    /// Advances the shared waveform index (engine speed)
    EngineSpeed,
    /// Reads the shared waveform index (vehicle speed)
    VehicleSpeed,
}

impl Reading {
    /// Whether this reading depends on waveform state
    pub fn is_cyclic(&self) -> bool {
        !matches!(self, Reading::Fixed(_))
    }
}

/// One row of the response table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidEntry {
    /// PID answered by this entry
    pub pid: Pid,
    /// Reply source
    pub reading: Reading,
}

impl PidEntry {
    const fn fixed(pid: Pid, data: &'static [u8]) -> Self {
        Self {
            pid,
            reading: Reading::Fixed(data),
        }
    }

    const fn cyclic(pid: Pid, reading: Reading) -> Self {
        Self { pid, reading }
    }

    /// Whether a requested PID code selects this entry
    pub fn matches(&self, code: &str) -> bool {
        code.starts_with(self.pid.hex())
    }

    /// Produce the reply frame, advancing `waveform` for engine speed
    pub fn respond(&self, waveform: &mut WaveformGenerator) -> Result<ResponseFrame, ParseError> {
        match self.reading {
            Reading::Fixed(data) => ResponseFrame::new(self.pid, data),
            Reading::EngineSpeed => waveform.engine_speed(),
            Reading::VehicleSpeed => waveform.vehicle_speed(),
        }
    }
}

/// Table entries in match priority order
pub static PID_TABLE: [PidEntry; 17] = [
    // 05, 06 and 0C
    PidEntry::fixed(Pid::SupportedPids01To20, &[0x0C, 0x10, 0x00, 0x00]),
    PidEntry::fixed(Pid::SupportedPids21To40, &[0x00, 0x00, 0x00, 0x00]),
    PidEntry::fixed(Pid::SupportedPids41To60, &[0x00, 0x00, 0x00, 0x00]),
    PidEntry::fixed(Pid::SupportedPids61To80, &[0x00, 0x00, 0x00, 0x00]),
    PidEntry::fixed(Pid::SupportedPids81ToA0, &[0x00, 0x00, 0x00, 0x00]),
    // MIL on, 127 stored DTCs
    PidEntry::fixed(Pid::MonitorStatus, &[0xFF, 0x00, 0x00, 0x00]),
    // 39 °C
    PidEntry::fixed(Pid::CoolantTemperature, &[0x4F]),
    // -98.4375 %
    PidEntry::fixed(Pid::ShortTermFuelTrimBank1, &[0x02]),
    PidEntry::cyclic(Pid::EngineSpeed, Reading::EngineSpeed),
    // 41.96 %
    PidEntry::fixed(Pid::FuelTankLevel, &[0x6B]),
    PidEntry::cyclic(Pid::VehicleSpeed, Reading::VehicleSpeed),
    // 524 km
    PidEntry::fixed(Pid::DistanceSinceCodesCleared, &[0x02, 0x0C]),
    // 13.2 V
    PidEntry::fixed(Pid::ControlModuleVoltage, &[0x33, 0x90]),
    // 42,000.0 km
    PidEntry::fixed(Pid::Odometer, &[0x00, 0x06, 0x68, 0xA0]),
    // 18 °C
    PidEntry::fixed(Pid::AmbientAirTemperature, &[0x3A]),
    // 10.0:1
    PidEntry::fixed(Pid::TransmissionActualGear, &[0x27, 0x10, 0x00, 0x00]),
    // 31.4 %
    PidEntry::fixed(Pid::ThrottlePosition, &[0x50]),
];

/// Find the first entry whose key prefixes `code`
pub fn lookup(code: &str) -> Option<&'static PidEntry> {
    PID_TABLE.iter().find(|entry| entry.matches(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_fixed_entry_builds_a_valid_frame() {
        let mut wave = WaveformGenerator::new();
        for entry in PID_TABLE.iter().filter(|e| !e.reading.is_cyclic()) {
            let frame = entry.respond(&mut wave).unwrap();
            assert_eq!(frame.pid(), entry.pid);
        }
        assert_eq!(wave.index(), None);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in PID_TABLE.iter().enumerate() {
            for b in &PID_TABLE[i + 1..] {
                assert_ne!(a.pid, b.pid);
            }
        }
    }

    #[test]
    fn test_lookup_by_prefix() {
        assert_eq!(lookup("05").map(|e| e.pid), Some(Pid::CoolantTemperature));
        assert_eq!(lookup("0C").map(|e| e.pid), Some(Pid::EngineSpeed));
        // Trailing characters after the key are ignored
        assert_eq!(lookup("0C1").map(|e| e.pid), Some(Pid::EngineSpeed));
        assert_eq!(lookup("A6FF").map(|e| e.pid), Some(Pid::Odometer));
    }

    #[test]
    fn test_lookup_misses() {
        assert_eq!(lookup("99"), None);
        assert_eq!(lookup("0"), None);
        assert_eq!(lookup(""), None);
        // Keys are upper-case hex
        assert_eq!(lookup("0c"), None);
    }

    #[test]
    fn test_table_priority_order() {
        let order: Vec<u8> = PID_TABLE.iter().map(|e| e.pid.code()).collect();
        assert_eq!(
            order,
            vec![
                0x00, 0x20, 0x40, 0x60, 0x80, 0x01, 0x05, 0x06, 0x0C, 0x2F, 0x0D, 0x31, 0x42,
                0xA6, 0x46, 0xA4, 0x11,
            ]
        );
        // Bitmask keys are checked before monitor status
        assert_eq!(lookup("00").map(|e| e.pid), Some(Pid::SupportedPids01To20));
        assert_eq!(lookup("01").map(|e| e.pid), Some(Pid::MonitorStatus));
    }

    #[test]
    fn test_fixed_values() {
        let mut wave = WaveformGenerator::new();
        let value = |code: &str, wave: &mut WaveformGenerator| {
            lookup(code).unwrap().respond(wave).unwrap().value().unwrap()
        };
        assert_eq!(value("05", &mut wave), 39.0);
        assert_eq!(value("06", &mut wave), -98.4375);
        assert_eq!(value("31", &mut wave), 524.0);
        assert_eq!(value("42", &mut wave), 13.2);
        assert_eq!(value("A6", &mut wave), 42_000.0);
        assert_eq!(value("46", &mut wave), 18.0);
        assert_eq!(value("A4", &mut wave), 10.0);
        assert!((value("2F", &mut wave) - 41.96).abs() < 0.01);
        assert!((value("11", &mut wave) - 31.37).abs() < 0.01);
    }
}
