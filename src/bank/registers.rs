//! Encodes a patch into the 64-byte register image of the sound engine.

use bit::BitIndex;

use crate::Ranged;
use crate::bank::{tables, OPERATOR_COUNT};
use crate::bank::patch::Patch;

pub const REGISTER_COUNT: usize = 64;

pub type Registers = [u8; REGISTER_COUNT];

const FREQUENCY: usize = 0x00;  // MSB, LSB for each operator
const VOLUME: usize = 0x10;
const WAVEFORM: usize = 0x18;  // two operators per byte
const MOD_MODE: usize = 0x1C;
const FEEDBACK: usize = 0x1F;
const ENVELOPE: usize = 0x20;  // A, D, S, R for each operator

/// Scales a carrier volume by the MIDI channel volume.
pub fn scale_volume(volume: u8, midi_volume: u8) -> u8 {
    ((volume as u16 * midi_volume as u16) / 255) as u8
}

/// Makes the register image for `patch` played at `midi_volume`.
/// Operators that are not stored in the patch encode as zero.
pub fn encode(patch: &Patch, midi_volume: u8) -> Registers {
    let mut regs: Registers = [0; REGISTER_COUNT];

    regs[MOD_MODE] = patch.modmode.as_byte();
    regs[FEEDBACK] = patch.feedback.as_byte();

    for (i, op) in patch.operators.iter().take(OPERATOR_COUNT).enumerate() {
        regs[FREQUENCY + i * 2] = op.frequency_msb();
        regs[FREQUENCY + i * 2 + 1] = op.frequency_lsb();

        regs[VOLUME + i] = if tables::is_carrier(patch.modmode.value(), i) {
            scale_volume(op.volume, midi_volume)
        }
        else {
            op.volume
        };

        // Even operators go to the high nibble, odd ones to the low nibble.
        let nibble = if i % 2 == 0 { 4..8 } else { 0..4 };
        regs[WAVEFORM + i / 2].set_bit_range(nibble, op.waveform.as_byte());

        regs[ENVELOPE + i * 4] = op.attack;
        regs[ENVELOPE + i * 4 + 1] = op.decay;
        regs[ENVELOPE + i * 4 + 2] = op.sustain;
        regs[ENVELOPE + i * 4 + 3] = op.release;
    }

    regs
}
