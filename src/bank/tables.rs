//! Static lookup tables mapping parameter codes to display names.

use crate::bank::{OPERATOR_COUNT, PROGRAM_COUNT};

/// Names of the operator waveforms, indexed by waveform code.
pub static WAVEFORM_NAMES: [&str; 16] = [
    "Sine",
    "Abs. Sine",
    "Squished Sine",
    "Square",
    "Triangle",
    "Sawtooth",
    "Abs. Square",
    "Abs. Triangle",
    "Abs. Sawtooth",
    "Noise",
    "PCM1 -> Wave",
    "PCM2 -> Wave",
    "PCM3 -> Wave",
    "PCM4 -> Wave",
    "Abs. AC. Sine",
    "Alternating Sine",
];

/// Names of the modulation modes, indexed by mode code.
pub static MODULATION_MODE_NAMES: [&str; 13] = [
    "Additive",
    "4x2OP FM",
    "4x2 RingMod",
    "2x4OP FM",
    "8OP FM",
    "4OP FM x2",
    "2OP FM x4",
    "4OP FMxRM x2",
    "2x4 RingMod",
    "2OP FMxRM x4",
    "2OP DirectPhase",
    "4OP DirectPhase",
    "8OP DirectPhase",
];

/// General MIDI instrument names, indexed by program number.
pub static GM_INSTRUMENT_NAMES: [&str; PROGRAM_COUNT] = include!("instruments.in");

const Y: bool = true;
const N: bool = false;

/// For each modulation mode, the operators that are carriers.
/// A carrier's volume follows the MIDI channel volume,
/// a modulator's volume is a modulation depth and stays as is.
pub static VOLUME_SCALING_MAP: [[bool; OPERATOR_COUNT]; 13] = [
    [Y, Y, Y, Y, Y, Y, Y, Y],  //  0: Additive
    [Y, Y, Y, Y, N, N, N, N],  //  1: 4x2OP FM
    [Y, Y, Y, Y, N, N, N, N],  //  2: 4x2 RingMod
    [Y, Y, N, N, N, N, N, N],  //  3: 2x4OP FM
    [Y, N, N, N, N, N, N, N],  //  4: 8OP FM
    [Y, Y, N, N, Y, Y, N, N],  //  5: 4OP FM x2
    [Y, N, Y, N, Y, N, Y, N],  //  6: 2OP FM x4
    [Y, N, N, N, N, N, N, N],  //  7: 4OP FMxRM x2
    [Y, Y, N, N, N, N, N, N],  //  8: 2x4 RingMod
    [Y, N, N, N, N, N, N, N],  //  9: 2OP FMxRM x4
    [Y, Y, Y, Y, N, N, N, N],  // 10: 2OP DirectPhase
    [Y, Y, N, N, N, N, N, N],  // 11: 4OP DirectPhase
    [Y, N, N, N, N, N, N, N],  // 12: 8OP DirectPhase
];

fn lookup(table: &[&str], code: i32) -> String {
    usize::try_from(code)
        .ok()
        .and_then(|index| table.get(index))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Unknown ({})", code))
}

/// Gets the waveform name for `code`, or "Unknown (N)".
pub fn waveform_name(code: i32) -> String {
    lookup(&WAVEFORM_NAMES, code)
}

/// Gets the modulation mode name for `code`, or "Unknown (N)".
pub fn modulation_mode_name(code: i32) -> String {
    lookup(&MODULATION_MODE_NAMES, code)
}

/// Gets the General MIDI instrument name for `program`, or "Unknown (N)".
pub fn instrument_name(program: i32) -> String {
    lookup(&GM_INSTRUMENT_NAMES, program)
}

/// Tells if operator `index` is a carrier in modulation mode `mode`.
/// Unknown modes and operators are never scaled.
pub fn is_carrier(mode: i32, index: usize) -> bool {
    usize::try_from(mode)
        .ok()
        .and_then(|m| VOLUME_SCALING_MAP.get(m))
        .and_then(|row| row.get(index))
        .copied()
        .unwrap_or(false)
}
