//! Character-cell preview of a layout, used by the demo binary.

use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::layout::{PanelRect, TargetRect};
use crate::window::{WindowId, WindowManager};

/// Map a pixel box in `target` onto the cells of `area`, cut to the area.
pub fn scale_to_cells(rect: &PanelRect, target: &TargetRect, area: Rect) -> Option<Rect> {
    if !target.is_measured() || area.width == 0 || area.height == 0 {
        return None;
    }
    let sx = f64::from(area.width) / target.width;
    let sy = f64::from(area.height) / target.height;
    let clamp_x = |v: f64| v.clamp(0.0, f64::from(area.width)) as u16;
    let clamp_y = |v: f64| v.clamp(0.0, f64::from(area.height)) as u16;

    let x0 = clamp_x((rect.x * sx).floor());
    let x1 = clamp_x((rect.right() * sx).ceil());
    let y0 = clamp_y((rect.y * sy).floor());
    let y1 = clamp_y((rect.bottom() * sy).ceil());
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(area.x + x0, area.y + y0, x1 - x0, y1 - y0))
}

/// Draw every panel of `manager` into `buffer`, bottom to top, as a framed
/// box titled with its id and slot. The topmost panel gets the focused
/// header. Returns the cell rectangle drawn for each panel.
pub fn render_layout<C, S>(
    manager: &WindowManager<C, S>,
    target: &TargetRect,
    area: Rect,
    buffer: &mut Buffer,
) -> Vec<(WindowId, Rect)> {
    let area = area.intersection(buffer.area);
    let top = manager.ids().last().cloned();
    let mut drawn = Vec::new();
    for entry in manager.entries() {
        let Some(rect) = manager.resolved_rect(entry.id().as_str(), Some(target)) else {
            continue;
        };
        let Some(cells) = scale_to_cells(&rect, target, area) else {
            continue;
        };
        let title = format!("{} [{}]", entry.id(), entry.slot());
        let focused = top.as_ref() == Some(entry.id());
        draw_panel(buffer, cells, &title, focused);
        drawn.push((entry.id().clone(), cells));
    }
    drawn
}

fn draw_panel(buffer: &mut Buffer, rect: Rect, title: &str, focused: bool) {
    let header_style = if focused {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);
    let body_style = Style::default().bg(Color::Reset);

    let left = rect.x;
    let top = rect.y;
    let right = rect.right().saturating_sub(1);
    let bottom = rect.bottom().saturating_sub(1);

    for y in top..=bottom {
        for x in left..=right {
            let Some(cell) = buffer.cell_mut((x, y)) else {
                continue;
            };
            let on_left = x == left;
            let on_right = x == right;
            let symbol = match (y == top, y == bottom) {
                (true, _) if on_left => "┌",
                (true, _) if on_right => "┐",
                (true, _) => "─",
                (_, true) if on_left => "└",
                (_, true) if on_right => "┘",
                (_, true) => "─",
                _ if on_left || on_right => "│",
                _ => " ",
            };
            cell.set_symbol(symbol);
            cell.set_style(if symbol == " " { body_style } else { border_style });
        }
    }

    // header row sits under the top border
    let header_y = top.saturating_add(1);
    if header_y >= bottom || right <= left + 1 {
        return;
    }
    for x in left + 1..right {
        if let Some(cell) = buffer.cell_mut((x, header_y)) {
            cell.set_symbol(" ");
            cell.set_style(header_style);
        }
    }
    let width = usize::from(right - left - 1);
    for (idx, ch) in title.chars().take(width).enumerate() {
        let x = left + 1 + idx as u16;
        if let Some(cell) = buffer.cell_mut((x, header_y)) {
            cell.set_symbol(&ch.to_string());
            cell.set_style(header_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DockSlot;
    use crate::window::{Owner, WindowOptions};

    fn symbol(buffer: &Buffer, x: u16, y: u16) -> &str {
        buffer.cell((x, y)).map(|cell| cell.symbol()).unwrap_or("")
    }

    #[test]
    fn scales_pixels_to_cells() {
        let target = TargetRect::new(0.0, 0.0, 1000.0, 500.0);
        let area = Rect::new(0, 0, 100, 50);
        let rect = PanelRect {
            x: 100.0,
            y: 50.0,
            width: 300.0,
            height: 100.0,
        };
        assert_eq!(
            scale_to_cells(&rect, &target, area),
            Some(Rect::new(10, 5, 30, 10))
        );
        let off_screen = PanelRect {
            x: -500.0,
            ..rect
        };
        assert_eq!(scale_to_cells(&off_screen, &target, area), None);
        assert_eq!(scale_to_cells(&rect, &TargetRect::default(), area), None);
    }

    #[test]
    fn draws_panels_in_z_order() {
        let mut wm: WindowManager<()> = WindowManager::new();
        wm.add(
            WindowOptions::new(()).id("left").slot(DockSlot::Static),
            Owner::Host,
        )
        .expect("add");
        wm.add(
            WindowOptions::new(()).id("right").slot(DockSlot::DynamicRight),
            Owner::Host,
        )
        .expect("add");
        let target = TargetRect::new(0.0, 0.0, 1280.0, 800.0);
        let area = Rect::new(0, 0, 128, 40);
        let mut buffer = Buffer::empty(area);
        let drawn = render_layout(&wm, &target, area, &mut buffer);

        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].0.as_str(), "left");
        assert_eq!(drawn[0].1.x, 0);
        assert_eq!(drawn[0].1.width, 32);
        assert_eq!(drawn[1].1.right(), 128);
        assert_eq!(symbol(&buffer, 0, 0), "┌");
        assert_eq!(symbol(&buffer, 127, 0), "┐");
        assert_eq!(symbol(&buffer, 1, 1), "l");
    }
}
