//! Phase-locked waveform generator
//!
//! Engine speed and vehicle speed are driven by a single cyclic index.
//! Every engine speed query advances the index before reading its table;
//! vehicle speed only reads the index. Querying speed alone therefore
//! returns the same reading until engine speed is queried again.

use obd_protocol::{ParseError, Pid, ResponseFrame};
use tracing::trace;

/// Number of samples in one drive cycle
pub const WAVEFORM_LEN: usize = 31;

/// Index value before the first engine speed query
const INITIAL_INDEX: i32 = -1;

/// Raw PID 0C values (rpm * 4): a triangle ramping 1232 → 3190 → 1232 rpm
const ENGINE_SPEED_RAW: [u16; WAVEFORM_LEN] = [
    0x1340, 0x1528, 0x1710, 0x19F8, 0x1BE0, 0x1DC8, 0x1FB0, 0x2198, 0x2380, 0x2568, 0x2750,
    0x2938, 0x2A20, 0x2C08, 0x2EF0, 0x31D8, 0x2EF0, 0x2C08, 0x2A20, 0x2938, 0x2750, 0x2568,
    0x2380, 0x2198, 0x1FB0, 0x1DC8, 0x1BE0, 0x19F8, 0x1710, 0x1528, 0x1340,
];

/// PID 0D values in km/h, ramping up over one drive cycle
const VEHICLE_SPEED_KMH: [u8; WAVEFORM_LEN] = [
    0x00, 0x03, 0x05, 0x0A, 0x0F, 0x14, 0x19, 0x1E, 0x23, 0x28, 0x2D, 0x32, 0x37, 0x3C, 0x41,
    0x46, 0x4B, 0x50, 0x55, 0x5A, 0x5F, 0x64, 0x69, 0x6B, 0x71, 0x76, 0x7A, 0x7F, 0x80, 0x85,
    0x89,
];

/// Cyclic index shared by the engine speed and vehicle speed signals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformGenerator {
    index: i32,
}

impl Default for WaveformGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveformGenerator {
    /// Create a generator that has not produced a sample yet
    pub fn new() -> Self {
        Self {
            index: INITIAL_INDEX,
        }
    }

    /// Current table index, `None` before the first engine speed query
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }

    /// Return to the state before the first engine speed query
    pub fn reset(&mut self) {
        self.index = INITIAL_INDEX;
    }

    /// Advance the index and return the engine speed frame at the new position
    pub fn engine_speed(&mut self) -> Result<ResponseFrame, ParseError> {
        let index = self.advance();
        let raw = ENGINE_SPEED_RAW[index];
        ResponseFrame::new(Pid::EngineSpeed, &raw.to_be_bytes())
    }

    /// Return the vehicle speed frame at the current index without advancing
    ///
    /// Before any engine speed query this reads the first sample.
    pub fn vehicle_speed(&self) -> Result<ResponseFrame, ParseError> {
        let index = self.index().unwrap_or(0);
        ResponseFrame::new(Pid::VehicleSpeed, &[VEHICLE_SPEED_KMH[index]])
    }

    fn advance(&mut self) -> usize {
        self.index += 1;
        if self.index >= WAVEFORM_LEN as i32 {
            self.index = 0;
        }
        trace!("Waveform index advanced to {}", self.index);
        // Non-negative after the increment above
        self.index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_before_first_sample() {
        let wave = WaveformGenerator::new();
        assert_eq!(wave.index(), None);
    }

    #[test]
    fn test_first_engine_speed_is_index_zero() {
        let mut wave = WaveformGenerator::new();
        let frame = wave.engine_speed().unwrap();
        assert_eq!(frame.to_string(), "41 0C 13 40");
        assert_eq!(wave.index(), Some(0));
    }

    #[test]
    fn test_engine_speed_wraps_after_full_cycle() {
        let mut wave = WaveformGenerator::new();
        let first = wave.engine_speed().unwrap();
        for _ in 1..WAVEFORM_LEN {
            wave.engine_speed().unwrap();
        }
        assert_eq!(wave.index(), Some(WAVEFORM_LEN - 1));

        let wrapped = wave.engine_speed().unwrap();
        assert_eq!(wave.index(), Some(0));
        assert_eq!(wrapped, first);
    }

    #[test]
    fn test_engine_speed_peaks_mid_cycle() {
        let mut wave = WaveformGenerator::new();
        let rpms: Vec<f64> = (0..WAVEFORM_LEN)
            .map(|_| wave.engine_speed().unwrap().value().unwrap())
            .collect();

        let peak = rpms.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(peak, 3190.0);
        assert_eq!(rpms[15], peak);
        assert_eq!(rpms[0], 1232.0);
        assert_eq!(rpms[WAVEFORM_LEN - 1], 1232.0);
    }

    #[test]
    fn test_vehicle_speed_before_engine_speed_reads_first_sample() {
        let wave = WaveformGenerator::new();
        assert_eq!(wave.vehicle_speed().unwrap().to_string(), "41 0D 00");
        assert_eq!(wave.index(), None);
    }

    #[test]
    fn test_vehicle_speed_does_not_advance() {
        let mut wave = WaveformGenerator::new();
        wave.engine_speed().unwrap();
        wave.engine_speed().unwrap();

        let a = wave.vehicle_speed().unwrap();
        let b = wave.vehicle_speed().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "41 0D 03");
        assert_eq!(wave.index(), Some(1));
    }

    #[test]
    fn test_vehicle_speed_is_non_decreasing() {
        assert!(VEHICLE_SPEED_KMH.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_engine_speed_is_symmetric() {
        for i in 0..WAVEFORM_LEN {
            assert_eq!(ENGINE_SPEED_RAW[i], ENGINE_SPEED_RAW[WAVEFORM_LEN - 1 - i]);
        }
    }

    #[test]
    fn test_reset() {
        let mut wave = WaveformGenerator::new();
        wave.engine_speed().unwrap();
        wave.engine_speed().unwrap();
        wave.reset();
        assert_eq!(wave, WaveformGenerator::new());
        assert_eq!(wave.engine_speed().unwrap().to_string(), "41 0C 13 40");
    }
}
