//! Terminal preview rendering.
//!
//! Draws a frame into a rectangle of terminal cells using upper-half-block
//! glyphs, so each cell carries two vertically stacked pixels (foreground =
//! top, background = bottom). Positioning is done with raw ANSI escape
//! codes; only layout math goes through ratatui's `Rect`.

use ratatui::layout::Rect;
use std::io::Write;

use crate::types::Frame;

/// Compute the preview rectangle, centered horizontally at the top of the
/// terminal and clamped to what fits (one row is reserved for status).
pub fn preview_area(width: u16, height: u16, term_cols: u16, term_rows: u16) -> Rect {
    let w = width.min(term_cols);
    let h = height.min(term_rows.saturating_sub(1));
    Rect {
        x: (term_cols - w) / 2,
        y: 0,
        width: w,
        height: h,
    }
}

/// Sample the frame at a normalized cell position (nearest neighbor).
///
/// `sy` is in half-cell rows: each terminal row covers two sample rows.
pub fn sample_rgb(frame: &Frame, sx: u32, sy: u32, grid_w: u32, grid_h: u32) -> (u8, u8, u8) {
    if grid_w == 0 || grid_h == 0 || !frame.has_area() {
        return (0, 0, 0);
    }
    let px = (sx * frame.width / grid_w).min(frame.width - 1);
    let py = (sy * frame.height / grid_h).min(frame.height - 1);
    let idx = (py as usize * frame.width as usize + px as usize) * frame.bytes_per_pixel();
    match frame.data.get(idx..idx + 3) {
        Some(p) => (p[0], p[1], p[2]),
        None => (0, 0, 0),
    }
}

/// Render a frame into `area` using half-block cells.
pub fn render_frame(
    stdout: &mut std::io::Stdout,
    frame: &Frame,
    area: Rect,
) -> std::io::Result<()> {
    if area.width == 0 || area.height == 0 || !frame.has_area() {
        return Ok(());
    }

    let grid_w = area.width as u32;
    let grid_h = area.height as u32 * 2; // two pixels per cell

    let mut output = String::new();
    output.push_str("\x1b7"); // Save cursor (DEC)
    output.push_str("\x1b[?25l"); // Hide cursor

    for row in 0..area.height {
        output.push_str(&format!("\x1b[{};{}H", area.y + row + 1, area.x + 1));
        for col in 0..area.width {
            let (tr, tg, tb) = sample_rgb(frame, col as u32, row as u32 * 2, grid_w, grid_h);
            let (br, bg, bb) = sample_rgb(frame, col as u32, row as u32 * 2 + 1, grid_w, grid_h);
            output.push_str(&format!(
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                tr, tg, tb, br, bg, bb
            ));
        }
        output.push_str("\x1b[0m");
    }

    output.push_str("\x1b[?25h"); // Show cursor
    output.push_str("\x1b8"); // Restore cursor (DEC)

    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Draw a centered single-line message inside `area` (used for the loading
/// indicator and for error text).
pub fn render_message(
    stdout: &mut std::io::Stdout,
    message: &str,
    area: Rect,
) -> std::io::Result<()> {
    if area.width == 0 || area.height == 0 {
        return Ok(());
    }
    let row = area.y + area.height / 2 + 1;
    let text: String = message.chars().take(area.width as usize).collect();
    let col = area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2 + 1;

    let mut output = String::new();
    output.push_str("\x1b7");
    output.push_str(&format!("\x1b[{};{}H\x1b[0m{}", row, col, text));
    output.push_str("\x1b8");

    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Render the status line below the preview: selector contents and key
/// hints, or the inline error text.
pub fn render_status(
    stdout: &mut std::io::Stdout,
    line: &str,
    row: u16,
    term_cols: u16,
) -> std::io::Result<()> {
    let text: String = line.chars().take(term_cols as usize).collect();
    let pad = " ".repeat(term_cols as usize - text.chars().count());

    let mut output = String::new();
    output.push_str("\x1b7");
    output.push_str(&format!("\x1b[{};1H\x1b[0m{}{}", row + 1, text, pad));
    output.push_str("\x1b8");

    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Blank an area by filling it with spaces (used on resize).
pub fn clear_area(stdout: &mut std::io::Stdout, area: Rect) -> std::io::Result<()> {
    let mut output = String::new();
    output.push_str("\x1b7");
    output.push_str("\x1b[0m");
    for row in 0..area.height {
        output.push_str(&format!("\x1b[{};{}H", area.y + row + 1, area.x + 1));
        for _ in 0..area.width {
            output.push(' ');
        }
    }
    output.push_str("\x1b8");

    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
