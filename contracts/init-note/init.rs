// Do not link against libstd (i.e. anything defined in `std::`)
#![no_std]

use miden::*;

use crate::bindings::miden::note_nook_account::note_nook_account;

/// Init Note Script
///
/// Sent by the deployer to a freshly created NoteNook account. Consuming it is
/// the account's first transaction: the sender becomes the owner and the
/// account is committed on-chain.
///
/// # Note Inputs
/// None required - the owner is the note's sender.
#[note_script]
fn run(_arg: Word) {
    let deployer = active_note::get_sender();

    note_nook_account::init();

    let owner = note_nook_account::owner();
    assert_eq(owner[0], deployer.prefix);
    assert_eq(owner[1], deployer.suffix);
    assert_eq(note_nook_account::balance_of(deployer), felt!(0));
}
