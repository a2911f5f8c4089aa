//! Text rendering of a [`GridSnapshot`].
//!
//! The layout is a dashed border, one `|`-framed line per row with cells
//! separated by single spaces, a closing border, and then one
//! `id: (x: X, y: Y)` line per agent:
//!
//! ```text
//! -----------
//! |A        |
//! |         |
//! |    B    |
//! -----------
//! alpha: (x: 0, y: 0)
//! bravo: (x: 2, y: 2)
//! ```
//!
//! Occupied cells are wrapped in an ANSI color escape and a reset. Colors
//! with no terminal mapping get no escape, but the reset is still written.

use gridfleet_types::Color;

use crate::grid::{CellMarker, GridSnapshot};

/// Escape that restores the terminal's default color.
pub const RESET: &str = "\x1b[0m";

/// Bright-color escape sequence for a named color.
pub const fn ansi_escape(color: &Color) -> Option<&'static str> {
    match color {
        Color::Red => Some("\x1b[91m"),
        Color::Green => Some("\x1b[92m"),
        Color::Yellow => Some("\x1b[93m"),
        Color::Blue => Some("\x1b[94m"),
        Color::Magenta => Some("\x1b[95m"),
        Color::Cyan => Some("\x1b[96m"),
        Color::White => Some("\x1b[97m"),
        Color::Unrecognized(_) => None,
    }
}

/// Render a snapshot as a bordered, colored text block.
pub fn render_text(snapshot: &GridSnapshot) -> String {
    let border_len = usize::try_from(snapshot.width)
        .unwrap_or(0)
        .saturating_mul(2)
        .saturating_add(1);
    let border = "-".repeat(border_len);

    let mut out = String::with_capacity(border_len.saturating_mul(
        usize::try_from(snapshot.height).unwrap_or(0).saturating_add(2),
    ));

    out.push_str(&border);
    out.push('\n');

    for row in snapshot.rows() {
        out.push('|');
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            push_cell(&mut out, cell.as_ref());
        }
        out.push_str("|\n");
    }

    out.push_str(&border);
    out.push('\n');

    let listing: Vec<String> = snapshot
        .roster
        .iter()
        .map(|entry| {
            format!(
                "{}: (x: {}, y: {})",
                entry.id, entry.position.x, entry.position.y
            )
        })
        .collect();
    out.push_str(&listing.join("\n"));

    out
}

fn push_cell(out: &mut String, cell: Option<&CellMarker>) {
    let Some(marker) = cell else {
        out.push(' ');
        return;
    };
    if let Some(escape) = marker.color.as_ref().and_then(ansi_escape) {
        out.push_str(escape);
    }
    out.push(marker.label);
    out.push_str(RESET);
}
