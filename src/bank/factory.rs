//! The built-in patches that a new bank file starts from.

use std::sync::LazyLock;

use log::debug;

use crate::Ranged;
use crate::bank::{Feedback, KeyShift, ModMode, Program, Waveform, OPERATOR_COUNT};
use crate::bank::operator::Operator;
use crate::bank::patch::Patch;
use crate::bank::patchbank::PatchBank;

/// The patch played for a program that has no patch in the bank.
pub static DEFAULT_PATCH: LazyLock<Patch> = LazyLock::new(make_default_patch);

fn op(frequency: u16, attack: u8, decay: u8, sustain: u8, release: u8, volume: u8, waveform: i32) -> Operator {
    Operator {
        frequency,
        waveform: Waveform::new(waveform),
        volume,
        attack,
        decay,
        sustain,
        release,
    }
}

// Operators not listed are zero, so every patch has all eight.
fn preset(program: i32, modmode: i32, feedback: i32, key_shift: i32, operators: &[Operator]) -> Patch {
    let mut all = vec![Operator::new(); OPERATOR_COUNT];
    all[..operators.len()].copy_from_slice(operators);
    Patch {
        program: Program::new(program),
        modmode: ModMode::new(modmode),
        feedback: Feedback::new(feedback),
        key_shift: KeyShift::new(key_shift),
        operators: all,
    }
}

/// Makes the fallback patch: a plain tone with one modulated carrier.
pub fn make_default_patch() -> Patch {
    preset(0, 4, 0x80, 0, &[
        op(0, 0, 64, 1, 32, 255, 3),
        op(0x1000, 0, 0, 255, 255, 17, 6),
    ])
}

/// Makes the factory patches, in ascending program order.
pub fn make_factory_patches() -> Vec<Patch> {
    let zero = Operator::new();

    let guitar = |program, volume| preset(program, 4, 0x80, 0, &[
        op(0, 0, 128, 0, 1, 255, 0),
        op(0x1000, 0, 0, 255, 1, 8, 0),
        op(0x3000, 0, 64, 0, 1, volume, 1),
    ]);
    let slap_bass = |program| preset(program, 4, 0x80, 12, &[
        op(0, 0, 96, 0, 4, 255, 0),
        op(0x0800, 0, 64, 0, 4, 46, 0),
        op(0x9000, 0, 8, 128, 4, 3, 1),
    ]);
    let synth_bass = |program| preset(program, 4, 0x88, 0, &[
        op(0, 0, 64, 64, 2, 255, 0),
    ]);

    vec![
        // Pianos
        preset(0, 4, 0x83, 0, &[
            op(0, 0, 64, 0, 16, 255, 0),
            op(0x1000, 0, 10, 125, 16, 16, 2),
        ]),
        preset(1, 4, 0x86, 0, &[
            op(0, 0, 64, 0, 16, 255, 0),
            op(0x1000, 0, 10, 125, 16, 32, 2),
        ]),

        // Chromatic percussion
        preset(8, 4, 0x80, 0, &[
            op(0, 0, 64, 0, 32, 255, 0),
            op(0x5000, 0, 4, 64, 32, 8, 0),
        ]),
        preset(10, 1, 0x80, 0, &[
            op(0, 0, 64, 0, 0, 255, 0),
            op(0x4000, 0, 50, 0, 4, 128, 0),
            op(0x1000, 0, 2, 0, 4, 32, 0),
            zero,
            op(0x8000, 0, 32, 0, 0, 4, 0),
        ]),
        preset(11, 4, 0x80, 0, &[
            op(0, 0, 64, 0, 1, 255, 0),
            op(0x9000, 0, 64, 255, 1, 6, 0),
        ]),
        preset(12, 4, 0x80, 0, &[
            op(0, 0, 64, 0, 1, 255, 0),
            op(0x7000, 0, 64, 255, 1, 4, 0),
        ]),
        preset(13, 4, 0x80, 0, &[
            op(0, 0, 64, 0, 32, 255, 0),
            op(0x5000, 0, 4, 64, 32, 12, 0),
        ]),

        // Guitars
        guitar(24, 32),
        guitar(25, 48),

        // Basses
        slap_bass(36),
        slap_bass(37),
        synth_bass(38),
        synth_bass(39),

        preset(46, 4, 0x80, 0, &[
            op(0, 0, 64, 0, 32, 255, 0),
            op(0x1010, 0, 0, 255, 255, 16, 0),
            op(0x0FF3, 0, 0, 255, 255, 16, 0),
        ]),

        // Pipes and leads
        preset(79, 0, 0x80, 0, &[
            op(0, 0, 16, 192, 1, 255, 0),
            op(0x2000, 0, 0, 255, 1, 16, 0),
        ]),
        preset(80, 0, 0x80, 0, &[
            op(0, 0, 1, 144, 0, 255, 3),
        ]),
        preset(81, 0, 0x80, 0, &[
            op(0, 0, 1, 144, 0, 255, 5),
        ]),
        preset(87, 4, 0x88, 0, &[
            op(0, 0, 16, 128, 4, 255, 0),
        ]),

        // Synth effects
        preset(100, 4, 0x84, 0, &[
            op(0, 1, 64, 64, 4, 255, 0),
            op(0x0FF1, 1, 64, 64, 4, 16, 15),
            op(0x1012, 1, 64, 64, 4, 16, 15),
        ]),
    ]
}

impl PatchBank {
    /// Makes a bank holding the factory patches.
    pub fn factory() -> Self {
        let patches = make_factory_patches();
        debug!("Factory bank with {} patches", patches.len());
        // Built from distinct literal program numbers, so this cannot fail.
        PatchBank::from_patches(patches).unwrap_or_default()
    }

    /// Gets the patch to play for `program`: the bank's patch if it has
    /// one, otherwise the default patch. The default patch keeps its own
    /// program number.
    pub fn patch_for_program(&self, program: Program) -> &Patch {
        match self.find_program(program) {
            Some(index) => &self.patches()[index],
            None => &*DEFAULT_PATCH,
        }
    }
}
