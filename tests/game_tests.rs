use std::collections::{BTreeMap, VecDeque};
use std::io;

use termsweeper::game::{self, AbstractEvent, Banner, ColorClass, Direction, Game, InputSource, Outcome, Screen, SessionEnd, Target, FLAG_GLYPH, MINE_GLYPH, UNDISCOVERED_GLYPH};
use termsweeper::{CellVisibility, Coord, MineMap};

use AbstractEvent::*;

#[derive(Default)]
struct FakeScreen {
    cells: BTreeMap<Coord, (char, ColorClass)>,
    draws: usize,
    banner: Option<(Banner, Option<Coord>)>,
    status: (usize, usize),
    cursor: Coord,
    presented: usize,
    input: VecDeque<AbstractEvent>,
}

impl FakeScreen {
    fn with_input(events: &[AbstractEvent]) -> Self {
        Self { input: events.iter().copied().collect(), ..Default::default() }
    }

    fn glyph(&self, coord: Coord) -> char {
        self.cells[&coord].0
    }
}

impl Screen for FakeScreen {
    fn render_cell(&mut self, coord: Coord, glyph: char, color: ColorClass) {
        self.cells.insert(coord, (glyph, color));
        self.draws += 1;
    }
    fn render_banner(&mut self, banner: Banner, at: Option<Coord>) {
        self.banner = Some((banner, at));
    }
    fn render_status(&mut self, flags_placed: usize, nb_bombs: usize) {
        self.status = (flags_placed, nb_bombs);
    }
    fn move_cursor(&mut self, coord: Coord) {
        self.cursor = coord;
    }
    fn read_cursor(&self) -> Coord {
        self.cursor
    }
    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }
}

impl InputSource for FakeScreen {
    fn next_input_event(&mut self) -> io::Result<AbstractEvent> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input exhausted"))
    }
}

fn ring_game() -> Game {
    Game::from_mines(MineMap::from_mines(3, 3, &[(1, 1)]).unwrap())
}

fn started(game: &Game) -> FakeScreen {
    let mut screen = FakeScreen::default();
    game.start(&mut screen);
    screen
}

#[test]
fn start_draws_covered_board_and_centers_cursor() {
    let game = Game::from_mines(MineMap::from_mines(5, 4, &[(0, 0)]).unwrap());
    let screen = started(&game);
    assert_eq!(screen.cells.len(), 20);
    assert!(screen.cells.values().all(|&c| c == (UNDISCOVERED_GLYPH, ColorClass::Undiscovered)));
    assert_eq!(screen.cursor, (2, 2));
    assert_eq!(screen.status, (0, 1));
}

#[test]
fn cursor_moves_are_clamped() {
    let mut game = ring_game();
    let mut screen = started(&game);
    assert_eq!(screen.cursor, (1, 1));
    for _ in 0..5 { game.handle(MoveCursor(Direction::Up), &mut screen); }
    assert_eq!(screen.cursor, (0, 1));
    for _ in 0..5 { game.handle(MoveCursor(Direction::Left), &mut screen); }
    assert_eq!(screen.cursor, (0, 0));
    for _ in 0..5 { game.handle(MoveCursor(Direction::Down), &mut screen); }
    for _ in 0..5 { game.handle(MoveCursor(Direction::Right), &mut screen); }
    assert_eq!(screen.cursor, (2, 2));
    assert_eq!(game.outcome(), Outcome::InProgress);
}

#[test]
fn reveal_renders_each_new_cell() {
    let mut game = Game::from_mines(MineMap::from_mines(5, 1, &[(0, 2)]).unwrap());
    let mut screen = started(&game);
    screen.draws = 0;
    game.handle(Reveal(Target::At((0, 0))), &mut screen);
    assert_eq!(screen.draws, 2);
    assert_eq!(screen.cells[&(0, 0)], (' ', ColorClass::Count(0)));
    assert_eq!(screen.cells[&(0, 1)], ('1', ColorClass::Count(1)));
    assert_eq!(screen.cursor, (0, 0));
    assert_eq!(game.outcome(), Outcome::InProgress);
}

#[test]
fn revealing_a_mine_loses_and_shows_mines() {
    let mut game = ring_game();
    let mut screen = started(&game);
    let outcome = game.handle(Reveal(Target::Cursor), &mut screen);
    assert_eq!(outcome, Outcome::Lost((1, 1)));
    assert_eq!(screen.cells[&(1, 1)], (MINE_GLYPH, ColorClass::Mine));
    assert_eq!(screen.banner, Some((Banner::Lost, Some((1, 1)))));
    assert_eq!(game.board().visibility((1, 1)), CellVisibility::Undiscovered);
}

#[test]
fn flagging_every_mine_wins() {
    let mut game = ring_game();
    let mut screen = started(&game);
    game.handle(ToggleFlag(Target::At((0, 0))), &mut screen);
    assert_eq!(screen.glyph((0, 0)), FLAG_GLYPH);
    assert_eq!(screen.status, (1, 1));
    assert_eq!(game.handle(ToggleFlag(Target::At((1, 1))), &mut screen), Outcome::InProgress);
    assert_eq!(game.handle(ToggleFlag(Target::At((0, 0))), &mut screen), Outcome::Won);
    assert_eq!(screen.glyph((0, 0)), UNDISCOVERED_GLYPH);
    assert_eq!(screen.banner, Some((Banner::Won, None)));
}

#[test]
fn discovered_cells_ignore_flag_and_reveal() {
    let mut game = Game::from_mines(MineMap::from_mines(3, 1, &[(0, 2)]).unwrap());
    let mut screen = started(&game);
    game.handle(Reveal(Target::At((0, 0))), &mut screen);
    let draws = screen.draws;
    game.handle(ToggleFlag(Target::At((0, 0))), &mut screen);
    game.handle(Reveal(Target::At((0, 1))), &mut screen);
    assert_eq!(screen.draws, draws);
    assert_eq!(game.board().flags_placed(), 0);
}

#[test]
fn flagged_cells_cannot_be_revealed() {
    let mut game = ring_game();
    let mut screen = started(&game);
    game.handle(ToggleFlag(Target::Cursor), &mut screen);
    assert_eq!(game.handle(Reveal(Target::Cursor), &mut screen), Outcome::InProgress);
    assert_eq!(game.board().visibility((1, 1)), CellVisibility::Flagged);
}

#[test]
fn out_of_range_targets_are_ignored() {
    let mut game = ring_game();
    let mut screen = started(&game);
    screen.draws = 0;
    game.handle(Reveal(Target::At((3, 0))), &mut screen);
    game.handle(ToggleFlag(Target::At((0, 9))), &mut screen);
    game.handle(Unknown, &mut screen);
    assert_eq!(screen.draws, 0);
    assert_eq!(screen.cursor, (1, 1));
}

#[test]
fn finished_session_ignores_input() {
    let mut game = ring_game();
    let mut screen = started(&game);
    game.handle(Reveal(Target::Cursor), &mut screen);
    let draws = screen.draws;
    assert_eq!(game.handle(Reveal(Target::At((0, 0))), &mut screen), Outcome::Lost((1, 1)));
    assert_eq!(game.handle(ToggleFlag(Target::At((0, 0))), &mut screen), Outcome::Lost((1, 1)));
    assert_eq!(screen.draws, draws);
}

#[test]
fn run_waits_on_final_screen() {
    let mut game = ring_game();
    let mut frontend = FakeScreen::with_input(&[MoveCursor(Direction::Left), Reveal(Target::Cursor), MoveCursor(Direction::Right), Reveal(Target::Cursor), Unknown, Unknown, MoveCursor(Direction::Up)]);
    let end = game::run(&mut game, &mut frontend).unwrap();
    assert_eq!(end, SessionEnd::Finished(Outcome::Lost((1, 1))));
    assert!(frontend.input.is_empty());
    assert_eq!(frontend.presented, 5);
}

#[test]
fn run_stops_on_interrupt_and_quit() {
    let mut game = ring_game();
    let mut frontend = FakeScreen::with_input(&[MoveCursor(Direction::Left), Interrupt, Reveal(Target::Cursor)]);
    assert_eq!(game::run(&mut game, &mut frontend).unwrap(), SessionEnd::Interrupted);
    assert_eq!(frontend.input.len(), 1);

    let mut game = ring_game();
    let mut frontend = FakeScreen::with_input(&[Quit]);
    assert_eq!(game::run(&mut game, &mut frontend).unwrap(), SessionEnd::Quit);
    assert_eq!(game.outcome(), Outcome::InProgress);
}

#[test]
fn run_propagates_input_errors() {
    let mut game = ring_game();
    let mut frontend = FakeScreen::with_input(&[MoveCursor(Direction::Down)]);
    let err = game::run(&mut game, &mut frontend).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn won_session_through_run() {
    let mut game = ring_game();
    let mut frontend = FakeScreen::with_input(&[ToggleFlag(Target::Cursor), Reveal(Target::At((0, 0)))]);
    assert_eq!(game::run(&mut game, &mut frontend).unwrap(), SessionEnd::Finished(Outcome::Won));
}
