#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::Board;
    use crate::builder::{BuilderInvalidReason, LevelBuilder};
    use crate::cell::Cell;
    use crate::color::Color;
    use crate::config::Config;
    use crate::game::{Game, GameState, LevelStatus};
    use crate::location::Location;
    use crate::session::{Mode, Outcome, Selection, Session};
    use crate::shape::SquareStep;
    use crate::shape::SquareStep::{Down, Left, Right, Up};
    use crate::store::LevelStore;

    fn play(encoding: &str) -> Session {
        Session::seeded(Board::from_encoding_with(encoding, &mut StdRng::seed_from_u64(0)), 0)
    }

    fn walk(session: &mut Session, start: Location, steps: &[SquareStep]) -> Outcome {
        let mut outcome = session.select(start);
        for step in steps {
            outcome = session.step(*step);
        }
        outcome
    }

    fn assert_consistent(board: &Board) {
        for path in board.paths() {
            assert!(path.is_contiguous(), "{:?} is broken", path);
            for location in path.cells() {
                assert_eq!(board.occupant_at(*location), Some(path.color()));
            }
        }

        let drawn: usize = board.paths().map(|path| path.len()).sum();
        assert_eq!(board.cells().filter(|(_, cell)| cell.is_occupied()).count(), drawn);
    }

    #[test]
    fn fill_covers_every_coordinate() {
        let board = Board::from_encoding(&format!("R0G{}GR", "0".repeat(20)));

        assert_eq!(board.length(), 5);
        let locations = board.cells().map(|(location, _)| location).collect_vec();
        assert_eq!(locations.len(), 25);
        assert_eq!(locations.iter().unique().count(), 25);
        assert!(locations.iter().all(|location| board.contains(*location)));

        assert_eq!(board.anchor_at(Location(0, 0)), Some(Color::R));
        assert_eq!(board.anchor_at(Location(4, 4)), Some(Color::R));
        assert_eq!(board.anchor_at(Location(3, 4)), Some(Color::G));
        assert_eq!(format!("{}", board), "R.G..
.....
.....
.....
...GR
");
    }

    #[test]
    fn short_encoding_is_padded() {
        let board = Board::from_encoding(&format!("R{}R", "0".repeat(22)));

        assert_eq!(board.length(), 5);
        assert_eq!(board.anchor_at(Location(3, 4)), Some(Color::R));
        assert!(board.cell(Location(4, 4)).is_some_and(Cell::is_bare));
        assert_eq!(format!("{}", board), "R....
.....
.....
.....
...R.
");
        assert_eq!(board.export_encoding(), format!("R{}R0", "0".repeat(22)));
    }

    #[test]
    fn export_then_reload_keeps_anchors() {
        let encoding = "A00000B00000000000B00000A";
        let board = Board::from_encoding_with(encoding, &mut StdRng::seed_from_u64(1));
        assert_eq!(board.export_encoding(), encoding);
        assert_ne!(board.codes().color_of('A'), Some(Color::B));

        // foreign codes keep their colors only under the same seed
        let reloaded = Board::from_encoding_with(&board.export_encoding(), &mut StdRng::seed_from_u64(1));
        for (location, cell) in board.cells() {
            assert_eq!(reloaded.anchor_at(location), cell.anchor());
        }

        // otherwise only the codes survive
        let reseeded = Board::from_encoding_with(&board.export_encoding(), &mut StdRng::seed_from_u64(2));
        assert_eq!(reseeded.codes().color_of('B'), Some(Color::B));
        assert!(reseeded.codes().color_of('A').is_some());
        assert_eq!(format!("{}", reseeded), format!("{}", board));
        assert_eq!(format!("{}", board), "A....
.B...
.....
...B.
....A
");
    }

    #[test]
    fn native_export_then_reload_keeps_colors() {
        let encoding = "R000G0B00Y000000Y00B0G00R";
        let board = Board::from_encoding_with(encoding, &mut StdRng::seed_from_u64(3));
        let reloaded = Board::from_encoding_with(&board.export_encoding(), &mut StdRng::seed_from_u64(4));

        assert_eq!(board.export_encoding(), encoding);
        assert_eq!(reloaded.length(), board.length());
        for (location, cell) in board.cells() {
            assert_eq!(reloaded.anchor_at(location), cell.anchor(), "at {:?}", location);
        }
        assert_eq!(reloaded.anchors_of(Color::Y), board.anchors_of(Color::Y));
    }

    #[test]
    fn two_by_two_loop_finishes() {
        let mut session = play("RR00");
        let outcome = walk(&mut session, Location(0, 0), &[Down, Right, Up]);

        assert_eq!(outcome, Outcome::Completed { encoding: "RR00".to_owned(), authored: false });
        assert!(session.is_finished());
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(format!("{}", session.board()), "RR
rr
");
        assert!(session.board().is_connected(Color::R));
        assert_eq!(session.select(Location(0, 0)), Outcome::Finished);
    }

    #[test]
    fn border_flow_closes_before_finishing() {
        let mut session = play(&format!("R{}R", "0".repeat(23)));
        let outcome = walk(&mut session, Location(0, 0), &[Right, Right, Right, Right, Down, Down, Down, Down]);

        assert_eq!(outcome, Outcome::Playing);
        assert_eq!(session.selection(), Selection::Idle);
        assert!(session.board().is_connected(Color::R));
        assert_eq!(session.board().connected_flows(), 1);
        assert!(session.board().is_started());
        assert!(!session.board().is_finished());
        assert_eq!(format!("{}", session.board()), "Rrrrr
....r
....r
....r
....R
");
        assert_consistent(session.board());
    }

    #[test]
    fn lone_endpoint_is_not_a_flow() {
        let mut session = play("R000");
        session.select(Location(0, 0));

        let path = session.board().path(Color::R).unwrap();
        assert_eq!(path.len(), 1);
        assert!(!path.is_drawn());
        assert!(!session.board().is_finished());
    }

    #[test]
    fn non_adjacent_extend_is_ignored() {
        let mut session = play(&format!("R{}R", "0".repeat(23)));
        session.select(Location(0, 0));

        assert_eq!(session.extend(Location(2, 0)), Outcome::Playing);
        assert_eq!(session.extend(Location(1, 1)), Outcome::Playing);
        assert_eq!(session.selection(), Selection::Selecting(Location(0, 0)));
        assert_eq!(session.board().path(Color::R).unwrap().cells(), &[Location(0, 0)]);
    }

    #[test]
    fn dragging_back_truncates() {
        let mut session = play(&format!("R{}R", "0".repeat(23)));
        walk(&mut session, Location(0, 0), &[Right, Right, Right]);
        session.extend(Location(2, 0));

        assert_eq!(session.selection(), Selection::Selecting(Location(2, 0)));
        assert_eq!(
            session.board().path(Color::R).unwrap().cells(),
            &[Location(0, 0), Location(1, 0), Location(2, 0)],
        );
        assert!(session.board().cell(Location(3, 0)).is_some_and(Cell::is_bare));
        assert_eq!(format!("{}", session.board()), "Rrr..
.....
.....
.....
....R
");

        session.select(Location(1, 0));
        assert_eq!(session.board().path(Color::R).unwrap().len(), 2);
        assert_consistent(session.board());
    }

    #[test]
    fn crossing_cuts_the_other_flow() {
        let mut session = play("00G00R000R000000000000G00");
        walk(&mut session, Location(0, 1), &[Right, Right]);
        walk(&mut session, Location(2, 0), &[Down]);

        assert_eq!(session.selection(), Selection::Selecting(Location(2, 1)));
        assert_eq!(session.board().path(Color::R).unwrap().len(), 2);
        assert_eq!(format!("{}", session.board()), "..G..
Rrg.R
.....
.....
..G..
");
        assert_consistent(session.board());
    }

    #[test]
    fn foreign_anchor_is_rejected() {
        let mut session = play("00G00R000R000000000000G00");
        walk(&mut session, Location(2, 0), &[Down, Right, Right]);

        assert_eq!(session.selection(), Selection::Selecting(Location(3, 1)));
        assert_eq!(format!("{}", session.board()), "..G..
R.ggR
.....
.....
..G..
");
        assert_consistent(session.board());
    }

    #[test]
    fn stepping_needs_a_selection() {
        let mut session = play(&format!("R{}R", "0".repeat(23)));
        assert_eq!(session.step(Right), Outcome::Playing);
        assert!(!session.board().is_started());

        session.select(Location(0, 0));
        session.step(Up);
        session.step(Left);
        assert_eq!(session.selection(), Selection::Selecting(Location(0, 0)));
        assert_eq!(session.board().path(Color::R).unwrap().len(), 1);
    }

    #[test]
    fn playing_cannot_resize_or_author() {
        let mut session = play(&format!("R{}R", "0".repeat(23)));
        assert_eq!(session.mode(), Mode::Play);
        assert!(!session.grow());
        assert!(!session.shrink());

        session.select(Location(2, 2));
        assert_eq!(session.selection(), Selection::Idle);
        assert!(session.board().cell(Location(2, 2)).is_some_and(Cell::is_bare));
    }

    #[test]
    fn authoring_opens_and_deletes_anchors() {
        let mut session = Session::seeded(Board::new(5), 7);
        assert_eq!(session.mode(), Mode::Author);

        session.select(Location(1, 1));
        let color = session.board().anchor_at(Location(1, 1)).unwrap();
        assert_eq!(session.selection(), Selection::Selecting(Location(1, 1)));
        assert_eq!(session.board().path(color).unwrap().len(), 1);
        assert_eq!(session.board().codes().code_of(color), Some(color.code()));

        session.select(Location(1, 1));
        assert_eq!(session.selection(), Selection::Idle);
        assert!(session.board().cell(Location(1, 1)).is_some_and(Cell::is_bare));
        assert!(session.board().path(color).is_none());
        assert!(!session.board().codes().is_used(color));
    }

    #[test]
    fn authoring_pins_at_most_two_anchors() {
        let mut session = Session::seeded(Board::new(5), 7);
        walk(&mut session, Location(0, 0), &[Right, Right]);
        let color = session.board().anchor_at(Location(0, 0)).unwrap();

        // clicking the head pins the second anchor
        session.select(Location(2, 0));
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.board().count_anchors(color), 2);
        assert_eq!(session.board().path(color).unwrap().len(), 3);

        // a third is refused and the click truncates instead
        session.select(Location(1, 0));
        assert_eq!(session.board().count_anchors(color), 2);
        assert_eq!(session.board().anchor_at(Location(1, 0)), None);
        assert_eq!(session.selection(), Selection::Selecting(Location(1, 0)));
        assert_eq!(session.board().path(color).unwrap().cells(), &[Location(0, 0), Location(1, 0)]);
        assert_consistent(session.board());
    }

    #[test]
    fn authoring_drag_within_held_cell_keeps_it() {
        let mut session = Session::seeded(Board::new(5), 0);
        session.select(Location(1, 1));
        let color = session.board().anchor_at(Location(1, 1)).unwrap();

        session.extend(Location(1, 1));
        session.extend(Location(1, 1));
        assert_eq!(session.selection(), Selection::Selecting(Location(1, 1)));
        assert_eq!(session.board().anchor_at(Location(1, 1)), Some(color));
        assert_eq!(session.board().path(color).unwrap().len(), 1);

        session.extend(Location(2, 1));
        assert_eq!(session.board().path(color).unwrap().cells(), &[Location(1, 1), Location(2, 1)]);
    }

    #[test]
    fn authoring_stray_drag_reselects() {
        let mut session = Session::seeded(Board::new(5), 11);
        session.select(Location(0, 0));
        session.extend(Location(3, 3));

        assert_eq!(session.selection(), Selection::Selecting(Location(3, 3)));
        assert_eq!(session.board().paths().count(), 2);
    }

    #[test]
    fn finished_design_becomes_a_level() {
        let mut session = Session::seeded(Board::new(2), 3);
        let outcome = walk(&mut session, Location(0, 0), &[Right, Down, Left]);

        let color = session.board().anchor_at(Location(0, 0)).unwrap();
        let code = color.code();
        let encoding = format!("{code}0{code}0");
        assert_eq!(outcome, Outcome::Completed { encoding: encoding.clone(), authored: true });
        assert_eq!(session.board().anchor_at(Location(0, 1)), Some(color));
        assert_eq!(session.board().encoding(), encoding);
        assert!(!session.board().is_in_creation());
        assert_eq!(
            format!("{}", session.board()),
            format!("{}{}\n{}{}\n", code, code.to_ascii_lowercase(), code, code.to_ascii_lowercase()),
        );

        let reloaded = Board::from_encoding(&encoding);
        assert_eq!(reloaded.anchors_of(color), session.board().anchors_of(color));
    }

    #[test]
    fn inner_pins_are_dropped_on_finish() {
        let mut session = Session::seeded(Board::new(3), 9);
        walk(&mut session, Location(0, 0), &[Right, Right, Down]);
        let color = session.board().anchor_at(Location(0, 0)).unwrap();

        // pins the second anchor partway along the flow
        session.select(Location(1, 0));
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.board().count_anchors(color), 2);

        let outcome = walk(&mut session, Location(2, 1), &[Down, Left, Left, Up, Right]);
        let code = color.code();
        assert_eq!(outcome, Outcome::Completed { encoding: format!("{code}000{code}0000"), authored: true });
        assert_eq!(session.board().count_anchors(color), 2);
        assert_eq!(session.board().anchor_at(Location(1, 0)), None);
        assert_eq!(session.board().anchor_at(Location(1, 1)), Some(color));
        assert!(session.board().is_connected(color));
    }

    #[test]
    fn small_designs_can_grow() {
        let mut session = Session::seeded(Board::new(3), 0);
        assert!(session.grow());
        assert_eq!(session.board().length(), 4);
        assert!(!session.shrink());
        assert!(session.grow());
        assert!(!session.shrink());
        assert!(session.grow());
        assert!(session.shrink());
        assert_eq!(session.board().length(), crate::board::MIN_LENGTH);
    }

    #[test]
    fn design_length_is_capped() {
        assert_eq!(Board::new(100_000).length(), crate::board::MAX_LENGTH);
        assert_eq!(Board::new(0).length(), 1);
    }

    #[test]
    fn shrinking_drops_the_outer_edge() {
        let mut session = Session::seeded(Board::new(5), 5);
        assert!(session.grow());
        assert_eq!(session.board().length(), 6);

        session.select(Location(5, 5));
        session.extend(Location(4, 5));
        assert_eq!(session.board().paths().count(), 1);

        assert!(session.shrink());
        assert_eq!(session.board().length(), 5);
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.board().paths().count(), 0);
        assert_eq!(format!("{}", session.board()), ".....\n".repeat(5));
        assert!(session.board().codes().is_empty());

        assert!(!session.shrink());
    }

    #[test]
    fn shrinking_keeps_inner_flows() {
        let mut session = Session::seeded(Board::new(6), 5);
        walk(&mut session, Location(0, 0), &[Right, Right]);
        let color = session.board().anchor_at(Location(0, 0)).unwrap();

        assert!(session.shrink());
        assert_eq!(session.selection(), Selection::Selecting(Location(2, 0)));
        assert_eq!(session.board().path(color).unwrap().len(), 3);
    }

    #[test]
    fn growing_stops_at_the_limit() {
        let mut board = Board::new(crate::board::MAX_LENGTH);
        assert!(!board.grow_one());
        assert!(board.shrink_one());
        assert_eq!(board.length(), crate::board::MAX_LENGTH - 1);
    }

    #[test]
    fn remove_anchors() {
        let board = LevelBuilder::with_length(NonZero::new(5).unwrap())
            .add_anchors(Color::R, (Location(0, 0), Location(1, 4)))
            .pop_anchors()
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), ".....
.....
.....
.....
.....
");
    }

    #[test]
    fn builder_rejects_bad_anchors() {
        let mut builder = LevelBuilder::default();
        builder.add_anchors(Color::R, (Location(0, 0), Location(5, 0)));
        assert_eq!(builder.build().err(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));

        let mut builder = LevelBuilder::default();
        builder
            .add_anchors(Color::R, (Location(0, 0), Location(4, 0)))
            .add_anchors(Color::R, (Location(0, 1), Location(4, 1)))
            .add_anchors(Color::G, (Location(0, 2), Location(4, 2)));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::ColorInUse]));
    }

    #[test]
    fn play_most_basic() {
        // flow free classic pack level 1
        let builder = LevelBuilder::with_length(NonZero::new(5).unwrap())
            .add_anchors(Color::R, (Location(0, 0), Location(1, 4)))
            .add_anchors(Color::B, (Location(2, 0), Location(1, 3)))
            .add_anchors(Color::G, (Location(2, 1), Location(2, 4)))
            .add_anchors(Color::Y, (Location(4, 0), Location(3, 3)))
            .add_anchors(Color::O, (Location(4, 1), Location(3, 4)))
            .clone();
        let board = builder.build().unwrap();

        assert_eq!(format!("{}", board), "R.B.Y
..G.O
.....
.B.Y.
.RGO.
");

        let mut session = Session::seeded(board, 0);
        walk(&mut session, Location(0, 0), &[Down, Down, Down, Down, Right]);
        walk(&mut session, Location(2, 0), &[Left, Down, Down, Down]);
        walk(&mut session, Location(2, 1), &[Down, Down, Down]);
        walk(&mut session, Location(4, 0), &[Left, Down, Down, Down]);
        let outcome = walk(&mut session, Location(4, 1), &[Down, Down, Down, Left]);

        assert_eq!(outcome, Outcome::Completed { encoding: builder.encoding(), authored: false });
        assert_eq!(session.board().connected_flows(), 5);
        assert_eq!(format!("{}", session.board()), "RbByY
rbGyO
rbgyo
rBgYo
rRGOo
");
        assert_consistent(session.board());
    }

    fn game_in(dir: &tempfile::TempDir, levels: Vec<Board>) -> Game {
        let config = Config {
            authoring_length: 2,
            seed: Some(0),
            ..Config::default()
        };
        let rng = config.rng();
        Game::with_levels(config, LevelStore::at(dir.path().join("levels.txt")), levels, rng)
    }

    #[test]
    fn game_replays_finished_levels() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game_in(&dir, vec![Board::from_encoding("RR00")]);

        assert!(!game.enter_level(2));
        assert!(game.enter_level(0));
        assert_eq!(game.state(), GameState::Level);
        assert_eq!(game.mode(), Some(Mode::Play));
        assert!(!game.enter_level(0));

        game.select(Location(0, 0));
        game.step(Down);
        game.step(Right);
        let outcome = game.step(Up);
        assert!(matches!(outcome, Outcome::Completed { authored: false, .. }));
        assert_eq!(game.state(), GameState::LevelFinished);
        assert!(!dir.path().join("levels.txt").exists());

        game.leave_level();
        assert_eq!(game.state(), GameState::MainMenu);
        assert_eq!(game.level_status(0), Some(LevelStatus::Finished));

        assert!(game.enter_level(0));
        assert_eq!(game.level_status(0), Some(LevelStatus::Fresh));
        game.select(Location(0, 0));
        game.step(Down);
        assert_eq!(game.level_status(0), Some(LevelStatus::Started));
    }

    #[test]
    fn game_saves_new_designs() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game_in(&dir, vec![Board::from_encoding("RR00")]);

        assert!(game.enter_level(1));
        assert_eq!(game.level_count(), 2);
        assert_eq!(game.mode(), Some(Mode::Author));

        game.select(Location(0, 0));
        game.extend(Location(1, 0));
        game.extend(Location(1, 1));
        let outcome = game.extend(Location(0, 1));
        assert!(matches!(outcome, Outcome::Completed { authored: true, .. }));

        let saved = LevelStore::at(dir.path().join("levels.txt")).read().unwrap();
        let design = game.level(1).unwrap().encoding().to_owned();
        assert_eq!(design.len(), 4);
        assert_eq!(saved, vec!["RR00".to_owned(), design]);

        game.leave_level();
        assert_eq!(game.active_level(), None);
        assert!(!game.level(1).unwrap().is_in_creation());
    }

    #[test]
    fn game_skips_abandoned_designs() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game_in(&dir, vec![Board::from_encoding("RR00")]);

        assert!(game.enter_level(1));
        game.leave_level();
        assert_eq!(game.level_count(), 2);

        assert!(game.enter_level(2));
        game.select(Location(0, 0));
        game.extend(Location(1, 0));
        game.extend(Location(1, 1));
        game.extend(Location(0, 1));

        let saved = LevelStore::at(dir.path().join("levels.txt")).read().unwrap();
        let design = game.level(2).unwrap().encoding().to_owned();
        assert_eq!(saved, vec!["RR00".to_owned(), design]);
    }

    #[test]
    fn game_pages_levels() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game_in(&dir, vec![Board::default(); 45]);

        assert_eq!(game.page_levels(), 0..20);
        assert_eq!(game.max_page(), 2);
        game.set_page(7);
        assert_eq!(game.page(), 2);
        assert_eq!(game.page_levels(), 40..46);

        let mut game = game_in(&dir, vec![Board::default(); 40]);
        game.set_page(2);
        assert_eq!(game.page_levels(), 40..41);
    }

    #[test]
    fn game_without_level_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            level_paths: vec![dir.path().join("levels.txt")],
            seed: Some(0),
            ..Config::default()
        };

        let mut game = Game::new(config);
        assert_eq!(game.level_count(), 0);
        assert_eq!(game.max_page(), 0);
        assert!(game.enter_level(0));
        assert_eq!(game.mode(), Some(Mode::Author));
        assert_eq!(game.session().unwrap().board().length(), crate::board::MIN_LENGTH);
    }
}
