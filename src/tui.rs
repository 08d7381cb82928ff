use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;

use crate::board::Coord;
use crate::game::{self, AbstractEvent, Banner, ColorClass, Direction, Game, InputSource, Screen, SessionEnd, Target, UNDISCOVERED_GLYPH};

/// How often a blocked input read checks for an external interrupt.
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// Runs one session on the real terminal. The terminal is restored before
/// this returns, whatever the result, including a SIGINT sent from outside.
pub fn run_tui(game: &mut Game) -> io::Result<SessionEnd> {
    let interrupted = watch_interrupt()?;
    enable_raw_mode()?;
    let _guard = TermGuard;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut frontend = TerminalFrontend::new(terminal, interrupted, game.board().width(), game.board().height());
    let res = game::run(game, &mut frontend);

    frontend.terminal.show_cursor()?;
    res
}

/// Raw mode turns Ctrl-C into a key press, but a SIGINT from another process
/// still arrives as a signal. A watcher thread catches it and raises the flag
/// the input loop polls, so the session unwinds through `TermGuard`.
fn watch_interrupt() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let seen = Arc::clone(&flag);
    std::thread::Builder::new().name("sigint".into()).spawn(move || {
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => seen.store(true, Ordering::SeqCst),
                Err(e) => tracing::warn!(error = %e, "cannot listen for SIGINT"),
            }
        });
    })?;
    Ok(flag)
}

/// Grid sides are bounded by the board config; saturate rather than wrap.
fn grid_side(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Waits for the next terminal event, giving up with `None` once
/// `interrupted` is raised.
fn next_raw_event<P>(interrupted: &AtomicBool, mut poll: P) -> io::Result<Option<Event>>
where
    P: FnMut() -> io::Result<Option<Event>>,
{
    loop {
        if interrupted.load(Ordering::SeqCst) { return Ok(None); }
        if let Some(ev) = poll()? { return Ok(Some(ev)); }
    }
}

/// Everything the next frame needs, filled in by the controller.
struct View {
    width: usize,
    height: usize,
    cols: u16,
    rows: u16,
    cells: Vec<(char, ColorClass)>,
    cursor: Coord,
    banner: Option<(Banner, Option<Coord>)>,
    status: (usize, usize),
}

pub struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    interrupted: Arc<AtomicBool>,
    view: View,
    // Where the grid landed in the last frame, for mapping clicks.
    board_area: Rect,
}

impl TerminalFrontend {
    fn new(terminal: Terminal<CrosstermBackend<Stdout>>, interrupted: Arc<AtomicBool>, width: usize, height: usize) -> Self {
        let view = View {
            width,
            height,
            cols: grid_side(width),
            rows: grid_side(height),
            cells: vec![(UNDISCOVERED_GLYPH, ColorClass::Undiscovered); width * height],
            cursor: (0, 0),
            banner: None,
            status: (0, 0),
        };
        Self { terminal, interrupted, view, board_area: Rect::default() }
    }
}

impl Screen for TerminalFrontend {
    fn render_cell(&mut self, (row, col): Coord, glyph: char, color: ColorClass) {
        if row < self.view.height && col < self.view.width {
            self.view.cells[row * self.view.width + col] = (glyph, color);
        }
    }

    fn render_banner(&mut self, banner: Banner, at: Option<Coord>) {
        self.view.banner = Some((banner, at));
    }

    fn render_status(&mut self, flags_placed: usize, nb_bombs: usize) {
        self.view.status = (flags_placed, nb_bombs);
    }

    fn move_cursor(&mut self, coord: Coord) {
        self.view.cursor = coord;
    }

    fn read_cursor(&self) -> Coord {
        self.view.cursor
    }

    fn present(&mut self) -> io::Result<()> {
        let view = &self.view;
        let mut board_area = self.board_area;
        self.terminal.draw(|f| { board_area = ui(f, view); })?;
        self.board_area = board_area;
        Ok(())
    }
}

impl InputSource for TerminalFrontend {
    fn next_input_event(&mut self) -> io::Result<AbstractEvent> {
        let poll = || -> io::Result<Option<Event>> {
            if event::poll(INTERRUPT_POLL)? { event::read().map(Some) } else { Ok(None) }
        };
        match next_raw_event(&self.interrupted, poll)? {
            Some(ev) => Ok(decode_event(ev, self.board_area, self.view.cols, self.view.rows)),
            None => Ok(AbstractEvent::Interrupt),
        }
    }
}

fn decode_event(ev: Event, board: Rect, cols: u16, rows: u16) -> AbstractEvent {
    match ev {
        Event::Key(key) => decode_key(key),
        Event::Mouse(m) => {
            let MouseEventKind::Down(btn) = m.kind else { return AbstractEvent::Unknown };
            let Some(coord) = pos_to_cell(m.column, m.row, board, cols, rows) else { return AbstractEvent::Unknown };
            match btn {
                MouseButton::Left => AbstractEvent::Reveal(Target::At(coord)),
                MouseButton::Right => AbstractEvent::ToggleFlag(Target::At(coord)),
                MouseButton::Middle => AbstractEvent::Unknown,
            }
        }
        _ => AbstractEvent::Unknown,
    }
}

fn decode_key(key: KeyEvent) -> AbstractEvent {
    if key.kind != KeyEventKind::Press { return AbstractEvent::Unknown; }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AbstractEvent::Interrupt,
            _ => AbstractEvent::Unknown,
        };
    }
    match key.code {
        KeyCode::Esc => AbstractEvent::Quit,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('q') => AbstractEvent::MoveCursor(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => AbstractEvent::MoveCursor(Direction::Right),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('z') => AbstractEvent::MoveCursor(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => AbstractEvent::MoveCursor(Direction::Down),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('g') => AbstractEvent::Reveal(Target::Cursor),
        KeyCode::Char('f') => AbstractEvent::ToggleFlag(Target::Cursor),
        _ => AbstractEvent::Unknown,
    }
}

fn ui(f: &mut ratatui::Frame, view: &View) -> Rect {
    let (flags, bombs) = view.status;
    let border = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Title::from(" Minesweeper ").alignment(Alignment::Center))
        .title(
            Title::from(format!(" Flags: {}/{} ", flags, bombs))
                .position(Position::Bottom)
                .alignment(Alignment::Center),
        );
    let inner = border.inner(f.size());
    f.render_widget(border, f.size());

    let area = centered_grid_area(inner, view.cols, view.rows);
    draw_board(f, view, area);
    if let Some((banner, _)) = view.banner {
        draw_banner(f, banner, area);
    }
    area
}

fn centered_grid_area(parent: Rect, cols: u16, rows: u16) -> Rect {
    let x = parent.x.saturating_add((parent.width.saturating_sub(cols)) / 2);
    let y = parent.y.saturating_add((parent.height.saturating_sub(rows)) / 2);
    Rect { x, y, width: cols.min(parent.width), height: rows.min(parent.height) }
}

fn draw_board(f: &mut ratatui::Frame, view: &View, area: Rect) {
    let detonated = view.banner.and_then(|(_, at)| at);
    let mut lines: Vec<Line> = Vec::with_capacity(view.height);
    for row in 0..view.height {
        let mut spans: Vec<Span> = Vec::with_capacity(view.width);
        for col in 0..view.width {
            let (mut ch, class) = view.cells[row * view.width + col];
            let mut style = cell_style(class);
            if detonated == Some((row, col)) {
                style = style.bg(Color::Red).fg(Color::White);
            }
            if view.cursor == (row, col) && view.banner.is_none() {
                style = style.add_modifier(Modifier::REVERSED);
                if ch == ' ' { ch = UNDISCOVERED_GLYPH; }
            }
            spans.push(Span::styled(ch.to_string(), style));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_banner(f: &mut ratatui::Frame, banner: Banner, board: Rect) {
    let hint = " any key ";
    let width = (banner.text().len().max(hint.len()) as u16 + 4).min(f.size().width);
    let height = 3u16.min(f.size().height);
    let x = board.x.saturating_add(board.width.saturating_sub(width) / 2);
    let y = board.y.saturating_add(board.height.saturating_sub(height) / 2);
    let area = Rect { x, y, width, height }.intersection(f.size());

    let style = cell_style(banner.color_class());
    let para = Paragraph::new(banner.text())
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(Title::from(hint).position(Position::Bottom).alignment(Alignment::Center)),
        );
    f.render_widget(Clear, area);
    f.render_widget(para, area);
}

fn cell_style(class: ColorClass) -> Style {
    match class {
        ColorClass::Count(n) => number_style(n),
        ColorClass::Flag => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ColorClass::Undiscovered => Style::default().fg(Color::DarkGray),
        ColorClass::Mine => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ColorClass::WinBanner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ColorClass::LossBanner => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn number_style(n: u8) -> Style {
    match n {
        0 => Style::default().fg(Color::Gray),
        1 => Style::default().fg(Color::Blue),
        2 => Style::default().fg(Color::Cyan),
        3 => Style::default().fg(Color::Green),
        4 => Style::default().fg(Color::Magenta),
        5 => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    }
}

/// Maps a terminal position to `(row, col)` on the grid drawn at `board`.
fn pos_to_cell(mx: u16, my: u16, board: Rect, cols: u16, rows: u16) -> Option<Coord> {
    if mx < board.x || my < board.y { return None; }
    let col = mx - board.x;
    let row = my - board.y;
    if col < cols.min(board.width) && row < rows.min(board.height) {
        Some((row as usize, col as usize))
    } else {
        None
    }
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
