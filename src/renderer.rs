use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Block;

use crate::config::{CELL_WIDTH, GridSize, Theme};
use crate::game::GameState;
use crate::snake::Position;

const CELL_FILL: &str = "  ";

/// Terminal columns and rows needed to show the whole board with its border.
#[must_use]
pub fn required_surface(grid: GridSize) -> (u16, u16) {
    (
        grid.width.saturating_mul(CELL_WIDTH).saturating_add(2),
        grid.height.saturating_add(2),
    )
}

/// Board rectangle (border included) centered in `area`, clipped to it.
#[must_use]
pub fn board_area(area: Rect, grid: GridSize) -> Rect {
    let (required_width, required_height) = required_surface(grid);
    let width = required_width.min(area.width);
    let height = required_height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Renders the full game frame from immutable state.
///
/// Paint order is background, body, item: later layers win on overlap.
pub fn render(frame: &mut Frame<'_>, state: &GameState, theme: &Theme, paused: bool) {
    let board = board_area(frame.area(), state.bounds());

    let block = Block::bordered()
        .title(Line::from(" snake "))
        .title_bottom(Line::from(status_label(state, paused)).centered())
        .border_style(Style::new().fg(theme.border_fg));

    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_background(frame, inner, state.bounds(), theme);
    render_snake(frame, inner, state, theme);
    render_item(frame, inner, state, theme);
}

fn status_label(state: &GameState, paused: bool) -> &'static str {
    if !state.is_running() {
        " crashed · Enter restarts · q quits "
    } else if paused {
        " paused "
    } else {
        ""
    }
}

fn render_background(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let Some((column, row)) = logical_to_terminal(inner, bounds, Position { x, y }) else {
                continue;
            };

            let color = if (x + y) % 2 == 0 {
                theme.grid_even
            } else {
                theme.grid_odd
            };
            buffer.set_string(column, row, CELL_FILL, Style::new().bg(color));
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, state: &GameState, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for (index, segment) in state.snake.segments().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, state.bounds(), *segment) else {
            continue;
        };

        let style = if index == 0 {
            Style::new()
                .bg(theme.snake_head)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().bg(theme.snake_body)
        };
        buffer.set_string(x, y, CELL_FILL, style);
    }
}

fn render_item(frame: &mut Frame<'_>, inner: Rect, state: &GameState, theme: &Theme) {
    let Some(item) = state.item else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, state.bounds(), item.position) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, CELL_FILL, Style::new().bg(theme.item));
}

/// Maps a grid cell to the left terminal column and row of its on-screen cell.
fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::config::{GridSize, THEME_CLASSIC, Topology};
    use crate::game::{GameState, Rules};
    use crate::item::Item;
    use crate::snake::{Position, Snake};

    use super::{board_area, render, required_surface};

    const GRID: GridSize = GridSize {
        width: 8,
        height: 5,
    };

    fn state() -> GameState {
        let rules = Rules::new(GRID, Topology::Wrap, true).expect("test grid should be valid");
        let mut state = GameState::new_with_seed(rules, 1);
        state.snake = Snake::from_segments(vec![Position { x: 2, y: 1 }, Position { x: 1, y: 1 }]);
        state.item = Some(Item::new(Position { x: 5, y: 3 }));
        state
    }

    fn draw(state: &GameState, width: u16, height: u16) -> (Terminal<TestBackend>, Rect) {
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test terminal should build");
        terminal
            .draw(|frame| render(frame, state, &THEME_CLASSIC, false))
            .expect("draw should succeed");

        let board = board_area(Rect::new(0, 0, width, height), GRID);
        let inner = Rect::new(board.x + 1, board.y + 1, board.width - 2, board.height - 2);
        (terminal, inner)
    }

    #[test]
    fn required_surface_includes_border() {
        assert_eq!(required_surface(GRID), (18, 7));
    }

    #[test]
    fn body_head_item_and_background_use_theme_colors() {
        let state = state();
        let (terminal, inner) = draw(&state, 30, 12);
        let buffer = terminal.backend().buffer();

        let bg_at = |x: u16, y: u16| buffer[(inner.x + x * 2, inner.y + y)].bg;

        assert_eq!(bg_at(2, 1), THEME_CLASSIC.snake_head);
        assert_eq!(bg_at(1, 1), THEME_CLASSIC.snake_body);
        assert_eq!(bg_at(5, 3), THEME_CLASSIC.item);
        assert_eq!(bg_at(0, 0), THEME_CLASSIC.grid_even);
        assert_eq!(bg_at(1, 0), THEME_CLASSIC.grid_odd);
    }

    #[test]
    fn item_is_painted_over_body() {
        let mut state = state();
        state.item = Some(Item::new(Position { x: 1, y: 1 }));
        let (terminal, inner) = draw(&state, 30, 12);

        let cell = &terminal.backend().buffer()[(inner.x + 2, inner.y + 1)];
        assert_eq!(cell.bg, THEME_CLASSIC.item);
    }

    #[test]
    fn crashed_state_draws_no_snake() {
        let mut state = state();
        state.snake = Snake::empty();
        state.status = crate::game::GameStatus::Crashed;
        let (terminal, inner) = draw(&state, 30, 12);

        let cell = &terminal.backend().buffer()[(inner.x + 4, inner.y + 1)];
        assert_eq!(cell.bg, THEME_CLASSIC.grid_odd);
    }

    #[test]
    fn undersized_terminal_clips_without_panicking() {
        let state = state();
        let _ = draw(&state, 6, 3);
    }
}
