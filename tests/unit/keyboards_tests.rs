//! Unit tests for inline keyboard construction.
//!
//! The callback data strings are the wire protocol between the buttons
//! and the dispatch layer, so their exact values are pinned here.

use inbox_valet::render::Keyboard;
use inbox_valet::telegram::keyboards::{
    self, ACTION_CANCEL, ACTION_DONE, ACTION_PROCESS, ACTION_SAVE, ACTION_STOP,
};
use teloxide::types::InlineKeyboardButtonKind;

/// Flatten a markup into `(label, callback data)` pairs.
fn callback_pairs(keyboard: Keyboard) -> Vec<(String, String)> {
    let markup = keyboards::markup_for(keyboard).expect("markup present");
    markup
        .inline_keyboard
        .into_iter()
        .flatten()
        .map(|button| match button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => (button.text, data),
            other => panic!("unexpected button kind: {other:?}"),
        })
        .collect()
}

// ─── Wire protocol constants ─────────────────────────────────────────

#[test]
fn callback_data_values_are_stable() {
    assert_eq!(ACTION_PROCESS, "process");
    assert_eq!(ACTION_DONE, "done");
    assert_eq!(ACTION_STOP, "stop");
    assert_eq!(ACTION_SAVE, "save_transcription");
    assert_eq!(ACTION_CANCEL, "cancel_transcription");
}

// ─── Markup per button set ───────────────────────────────────────────

#[test]
fn no_keyboard_yields_no_markup() {
    assert!(keyboards::markup_for(Keyboard::None).is_none());
}

#[test]
fn start_review_is_a_single_play_button() {
    let pairs = callback_pairs(Keyboard::StartReview);
    assert_eq!(
        pairs,
        vec![("\u{25b6}\u{fe0f}".to_owned(), ACTION_PROCESS.to_owned())]
    );
}

#[test]
fn review_actions_pair_confirm_with_stop() {
    let pairs = callback_pairs(Keyboard::ReviewActions);
    assert_eq!(
        pairs,
        vec![
            ("\u{2705}".to_owned(), ACTION_DONE.to_owned()),
            ("\u{23f9}\u{fe0f}".to_owned(), ACTION_STOP.to_owned()),
        ]
    );
}

#[test]
fn transcript_actions_pair_save_with_discard() {
    let pairs = callback_pairs(Keyboard::TranscriptActions);
    assert_eq!(
        pairs,
        vec![
            ("\u{2705}".to_owned(), ACTION_SAVE.to_owned()),
            ("\u{23f9}\u{fe0f}".to_owned(), ACTION_CANCEL.to_owned()),
        ]
    );
}

#[test]
fn action_buttons_share_one_row() {
    let markup = keyboards::markup_for(Keyboard::ReviewActions).expect("markup present");
    assert_eq!(markup.inline_keyboard.len(), 1);
    assert_eq!(markup.inline_keyboard[0].len(), 2);
}
