//! Control-message rendering.
//!
//! Pure, stateless builders mapping queue count and flow position to the
//! text and buttons of the single control message. Recomputed on every
//! transition, never cached, so the display always reflects the store.

use num2words::{Lang, Num2Words};

/// Abstract button set attached to a control view.
///
/// Transport-free: the Telegram layer maps each variant to a concrete
/// inline keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// No buttons (empty inbox, or busy indicator).
    None,
    /// Single button starting a review pass.
    StartReview,
    /// Confirm / stop buttons shown while reviewing one item.
    ReviewActions,
    /// Save / discard buttons shown for a pending transcript.
    TranscriptActions,
}

/// One fully-computed rendering of the control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    /// Markdown message text.
    pub text: String,
    /// Buttons to attach.
    pub keyboard: Keyboard,
}

// ── Text fragments ──────────────────────────────────────

/// Queue status line: keycap digits plus a French count sentence.
#[must_use]
pub fn status_text(count: u64) -> String {
    if count == 0 {
        return format!("{} Inbox zero!", keycap_digits(0));
    }
    let noun = if count == 1 { "élément" } else { "éléments" };
    format!(
        "{} Vous avez {} {noun} dans votre boîte de réception",
        keycap_digits(count),
        french_cardinal(count),
    )
}

/// Review pane: the item content in a fenced code block above the status.
#[must_use]
pub fn review_text(content: &str, count: u64) -> String {
    format!("```\n{content}```\n\n{}", status_text(count))
}

/// Transcript confirmation line shown with save / discard buttons.
#[must_use]
pub fn transcript_text(transcript: &str) -> String {
    format!("\u{1f3a4} {transcript}")
}

/// Busy indicator shown while a transcription call is outstanding.
#[must_use]
pub fn busy_text() -> String {
    "\u{1f3a4} Transcription du message...".to_owned()
}

/// Transcription failure notice merged with the current status.
#[must_use]
pub fn failure_text(count: u64) -> String {
    format!(
        "\u{274c} Échec de la transcription du message.\n\n{}",
        status_text(count)
    )
}

/// One keycap emoji per decimal digit of `n` (12 renders as two glyphs).
fn keycap_digits(n: u64) -> String {
    let mut out = String::new();
    for digit in n.to_string().chars() {
        out.push(digit);
        out.push('\u{fe0f}');
        out.push('\u{20e3}');
    }
    out
}

/// French cardinal words for `n`, falling back to plain digits if the
/// number cannot be spelled out.
fn french_cardinal(n: u64) -> String {
    let Ok(value) = i64::try_from(n) else {
        return n.to_string();
    };
    Num2Words::new(value)
        .lang(Lang::French)
        .to_words()
        .unwrap_or_else(|_| n.to_string())
}

// ── View composition ────────────────────────────────────

/// Idle view: status text, with a start button only when items remain.
#[must_use]
pub fn idle_view(count: u64) -> ControlView {
    ControlView {
        text: status_text(count),
        keyboard: idle_keyboard(count),
    }
}

/// Review view for the item currently on screen.
#[must_use]
pub fn review_view(content: &str, count: u64) -> ControlView {
    ControlView {
        text: review_text(content, count),
        keyboard: Keyboard::ReviewActions,
    }
}

/// Transcript confirmation view.
#[must_use]
pub fn transcript_view(transcript: &str) -> ControlView {
    ControlView {
        text: transcript_text(transcript),
        keyboard: Keyboard::TranscriptActions,
    }
}

/// Busy view while transcription is outstanding. No buttons.
#[must_use]
pub fn busy_view() -> ControlView {
    ControlView {
        text: busy_text(),
        keyboard: Keyboard::None,
    }
}

/// Failure view after a failed transcription; buttons match the idle view.
#[must_use]
pub fn failure_view(count: u64) -> ControlView {
    ControlView {
        text: failure_text(count),
        keyboard: idle_keyboard(count),
    }
}

fn idle_keyboard(count: u64) -> Keyboard {
    if count == 0 {
        Keyboard::None
    } else {
        Keyboard::StartReview
    }
}
