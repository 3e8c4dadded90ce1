use serde::{Deserialize, Serialize};

use crate::Ranged;

pub mod tables;
pub mod operator;
pub mod patch;
pub mod patchbank;
pub mod registers;
pub mod command;
pub mod factory;

/// Number of operators in a patch.
pub const OPERATOR_COUNT: usize = 8;

/// Number of distinct MIDI program numbers, and so the maximum number
/// of patches in a bank.
pub const PROGRAM_COUNT: usize = 128;

/// MIDI program number (0...127).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Program(i32);

crate::ranged_impl!(Program, 0, 127, 0);

impl Program {
    /// Gets the General MIDI instrument name for this program number.
    pub fn instrument_name(&self) -> String {
        tables::instrument_name(self.0)
    }
}

/// Modulation mode (0...12), the topology of the eight operators.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct ModMode(i32);

crate::ranged_impl!(ModMode, 0, 12, 4);

impl ModMode {
    pub fn as_byte(&self) -> u8 {
        self.0 as u8
    }

    pub fn name(&self) -> String {
        tables::modulation_mode_name(self.0)
    }
}

/// Feedback amount (0...255), centered at 128.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Feedback(i32);

crate::ranged_impl!(Feedback, 0, 255, 128);

impl Feedback {
    const CENTER: i32 = 128;

    pub fn as_byte(&self) -> u8 {
        self.0 as u8
    }

    /// Makes a feedback value from its signed form (-128...127).
    pub fn from_signed(value: i32) -> Self {
        Feedback::clamped(value.saturating_add(Self::CENTER))
    }

    /// Gets the signed value, i.e. the stored value minus 128.
    pub fn signed(&self) -> i32 {
        self.0 - Self::CENTER
    }
}

/// Key shift in semitones (-96...+96).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct KeyShift(i32);

crate::ranged_impl!(KeyShift, -96, 96, 0);

/// Operator waveform (0...15).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Waveform(i32);

crate::ranged_impl!(Waveform, 0, 15, 0);

impl Waveform {
    pub fn as_byte(&self) -> u8 {
        self.0 as u8
    }

    pub fn name(&self) -> String {
        tables::waveform_name(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_signed() {
        let feedback = Feedback::new(200);
        assert_eq!(feedback.signed(), 72);

        let feedback = Feedback::from_signed(-10);
        assert_eq!(feedback.value(), 118);
    }

    #[test]
    fn test_feedback_signed_limits() {
        assert_eq!(Feedback::from_signed(-128).value(), 0);
        assert_eq!(Feedback::from_signed(127).value(), 255);
        assert_eq!(Feedback::from_signed(300).value(), 255);
        assert_eq!(Feedback::from_signed(i32::MAX).value(), 255);
        assert_eq!(Feedback::from_signed(i32::MIN).value(), 0);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ModMode::default().value(), 4);
        assert_eq!(Feedback::default().value(), 128);
        assert_eq!(KeyShift::default().value(), 0);
        assert_eq!(Program::default().value(), 0);
        assert_eq!(Waveform::default().value(), 0);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(KeyShift::clamped(-100).value(), -96);
        assert_eq!(KeyShift::clamped(97).value(), 96);
        assert_eq!(ModMode::clamped(13).value(), 12);
        assert_eq!(Program::clamped(-1).value(), 0);
        assert_eq!(Waveform::clamped(7).value(), 7);
    }

    #[test]
    #[should_panic]
    fn test_new_out_of_range() {
        let _ = Program::new(128);
    }

    #[test]
    fn test_random_in_range() {
        for _ in 0..100 {
            assert!(KeyShift::contains(KeyShift::random().value()));
        }
    }

    #[test]
    fn test_serialize_as_integer() {
        assert_eq!(serde_json::to_string(&KeyShift::new(-12)).unwrap(), "-12");
        let mode: ModMode = serde_json::from_str("7").unwrap();
        assert_eq!(mode, ModMode::new(7));
    }
}
