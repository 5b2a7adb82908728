//! Application identifier generation.

use onboard_state::Application;

const PREFIX: &str = "app";

/// Next free identifier: one above the highest `app-<digits>` in use,
/// zero-padded to three digits.
///
/// The numeric part is the segment between the first and second `-`.
/// Identifiers that do not have that shape are skipped. Not safe against
/// concurrent callers on its own; create paths hold the collection lock.
pub fn next_id(applications: &[Application]) -> String {
    let max = applications
        .iter()
        .filter_map(|app| numeric_suffix(&app.id))
        .max()
        .unwrap_or(0);
    format!("{PREFIX}-{:03}", max + 1)
}

fn numeric_suffix(id: &str) -> Option<u64> {
    let mut segments = id.split('-');
    if segments.next()? != PREFIX {
        return None;
    }
    let digits = segments.next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
