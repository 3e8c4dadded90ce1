use std::fmt;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::Ranged;
use crate::bank::Waveform;

/// Names the operator parameters the way the bank file does.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OperatorField {
    Frequency,
    Waveform,
    Volume,
    Attack,
    Decay,
    Sustain,
    Release,
}

impl OperatorField {
    /// Gets the inclusive range of values for this field.
    pub fn range(&self) -> (i32, i32) {
        match self {
            OperatorField::Frequency => (0, u16::MAX as i32),
            OperatorField::Waveform => (Waveform::FIRST, Waveform::LAST),
            _ => (0, u8::MAX as i32),
        }
    }

    fn clamp(&self, value: i32) -> i32 {
        let (first, last) = self.range();
        if value < first || value > last {
            warn!("{} value {} out of range [{}...{}], clamping", self, value, first, last);
        }
        num::clamp(value, first, last)
    }
}

/// Operator. Every field is zero unless set.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Operator {
    #[serde(deserialize_with = "clamped_u16")]
    pub frequency: u16,  // MSB = coarse, LSB = fine
    pub waveform: Waveform,
    #[serde(deserialize_with = "clamped_u8")]
    pub volume: u8,
    #[serde(deserialize_with = "clamped_u8")]
    pub attack: u8,
    #[serde(deserialize_with = "clamped_u8")]
    pub decay: u8,
    #[serde(deserialize_with = "clamped_u8")]
    pub sustain: u8,
    #[serde(deserialize_with = "clamped_u8")]
    pub release: u8,
}

// A bank file can hold any integer here. Out of range values are
// clamped with a warning, the same as `Operator::set_field` does.
fn clamp_loaded(value: i64, last: i64) -> i64 {
    if value < 0 || value > last {
        warn!("Operator value {} out of range [0...{}], clamping", value, last);
    }
    num::clamp(value, 0, last)
}

fn clamped_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(clamp_loaded(value, u8::MAX as i64) as u8)
}

fn clamped_u16<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(clamp_loaded(value, u16::MAX as i64) as u16)
}

impl Operator {
    /// Creates a new zero-valued operator.
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes a new random operator.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Operator {
            frequency: rng.random(),
            waveform: Waveform::random(),
            volume: rng.random(),
            attack: rng.random(),
            decay: rng.random(),
            sustain: rng.random(),
            release: rng.random(),
        }
    }

    pub fn frequency(&self) -> u16 {
        self.frequency
    }

    /// Gets the high byte of the frequency.
    pub fn frequency_msb(&self) -> u8 {
        (self.frequency >> 8) as u8
    }

    /// Gets the low byte of the frequency.
    pub fn frequency_lsb(&self) -> u8 {
        (self.frequency & 0xff) as u8
    }

    /// Gets the frequency split into (MSB, LSB).
    pub fn frequency_bytes(&self) -> (u8, u8) {
        (self.frequency_msb(), self.frequency_lsb())
    }

    pub fn set_frequency(&mut self, value: u16) {
        self.frequency = value;
    }

    /// Sets the frequency from its two bytes.
    pub fn set_frequency_bytes(&mut self, msb: u8, lsb: u8) {
        self.frequency = ((msb as u16) << 8) | lsb as u16;
    }

    pub fn set_frequency_msb(&mut self, msb: u8) {
        self.set_frequency_bytes(msb, self.frequency_lsb());
    }

    pub fn set_frequency_lsb(&mut self, lsb: u8) {
        self.set_frequency_bytes(self.frequency_msb(), lsb);
    }

    /// Gets the value of `field`.
    pub fn field(&self, field: OperatorField) -> i32 {
        match field {
            OperatorField::Frequency => self.frequency as i32,
            OperatorField::Waveform => self.waveform.value(),
            OperatorField::Volume => self.volume as i32,
            OperatorField::Attack => self.attack as i32,
            OperatorField::Decay => self.decay as i32,
            OperatorField::Sustain => self.sustain as i32,
            OperatorField::Release => self.release as i32,
        }
    }

    /// Sets `field` to `value`, clamped to the range of the field.
    pub fn set_field(&mut self, field: OperatorField, value: i32) {
        let value = field.clamp(value);
        match field {
            OperatorField::Frequency => self.frequency = value as u16,
            OperatorField::Waveform => self.waveform = Waveform::new(value),
            OperatorField::Volume => self.volume = value as u8,
            OperatorField::Attack => self.attack = value as u8,
            OperatorField::Decay => self.decay = value as u8,
            OperatorField::Sustain => self.sustain = value as u8,
            OperatorField::Release => self.release = value as u8,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Frequency = {} (0x{:04X}), Waveform = {} ({})
Volume = {}, A = {}, D = {}, S = {}, R = {}",
            self.frequency,
            self.frequency,
            self.waveform,
            self.waveform.name(),
            self.volume,
            self.attack,
            self.decay,
            self.sustain,
            self.release)
    }
}
