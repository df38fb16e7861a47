// Do not link against libstd (i.e. anything defined in `std::`)
#![no_std]

extern crate alloc;

use miden::*;

use crate::bindings::miden::note_nook_account::note_nook_account;

/// Register Note Script
///
/// Consumed by the NoteNook account. Registers the note's sender under the
/// display name carried in the note inputs.
///
/// # Note Inputs
/// - `[0]`: name length in bytes
/// - `[1..=8]`: name bytes, four per input, little-endian
#[note_script]
fn run(_arg: Word) {
    let registrant = active_note::get_sender();
    let inputs = active_note::get_inputs();

    let header = Word::from([felt!(1), inputs[0], felt!(0), felt!(0)]);
    let low = Word::from([inputs[1], inputs[2], inputs[3], inputs[4]]);
    let high = Word::from([inputs[5], inputs[6], inputs[7], inputs[8]]);

    note_nook_account::register(header, low, high);

    assert_eq(note_nook_account::is_registered(registrant), felt!(1));
}
