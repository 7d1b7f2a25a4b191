use std::io::{self, BufRead, Write};

use freeflow::config::Config;
use freeflow::game::{Game, GameState, LevelStatus};
use freeflow::session::{Mode, Outcome};
use freeflow::shape::SquareStep;
use freeflow::Location;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
menu:  <n> enter level n, p <n> show page n, q quit
level: s <col> <row> select, e <col> <row> drag, w/a/s/d or up/down/left/right step,
       + grow, - shrink (designs only), x back to menu";

fn menu(game: &Game) -> String {
    let mut out = format!("page {}/{}\n", game.page(), game.max_page());
    for index in game.page_levels() {
        let mark = match game.level_status(index) {
            Some(LevelStatus::Finished) => "*",
            Some(LevelStatus::Started) => "~",
            Some(LevelStatus::Fresh) => " ",
            None => "+",
        };
        let length = game.level(index).map_or(game.config().authoring_length, |board| board.length());
        out.push_str(&format!("{:>3}{} {}x{}\n", index, mark, length, length));
    }
    out
}

fn level(game: &Game) -> String {
    let Some(session) = game.session() else {
        return String::new();
    };

    let mode = match session.mode() {
        Mode::Play => "play",
        Mode::Author => "design",
    };
    let held = session.selection()
        .location()
        .map_or_else(|| "nothing".to_owned(), |location| format!("({}, {})", location.col(), location.row()));
    format!("{}\n{}, {} flows joined, holding {}\n", session.board(), mode, session.board().connected_flows(), held)
}

fn coords<'a>(mut words: impl Iterator<Item = &'a str>) -> Option<Location> {
    let col = words.next()?.parse().ok()?;
    let row = words.next()?.parse().ok()?;
    Some(Location(col, row))
}

fn direction(word: &str) -> Option<SquareStep> {
    match word {
        "w" | "up" => Some(SquareStep::Up),
        "s" | "down" => Some(SquareStep::Down),
        "a" | "left" => Some(SquareStep::Left),
        "d" | "right" => Some(SquareStep::Right),
        _ => None,
    }
}

/// Apply one line of input. Returns false once the player quits.
fn command(game: &mut Game, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return true;
    };

    match game.state() {
        GameState::MainMenu => match head {
            "q" | "quit" => return false,
            "p" => {
                if let Some(page) = words.next().and_then(|word| word.parse().ok()) {
                    game.set_page(page);
                }
            }
            _ => {
                if let Ok(index) = head.parse() {
                    if !game.enter_level(index) {
                        println!("no level {}", index);
                    }
                }
            }
        },
        GameState::Level => {
            let outcome = match (head, coords(words)) {
                ("x", _) => {
                    game.leave_level();
                    return true;
                }
                ("s", Some(location)) => game.select(location),
                ("e", Some(location)) => game.extend(location),
                ("+", _) => {
                    game.grow();
                    Outcome::Playing
                }
                ("-", _) => {
                    game.shrink();
                    Outcome::Playing
                }
                _ => match direction(head) {
                    Some(step) => game.step(step),
                    None => {
                        println!("{}", HELP);
                        Outcome::Playing
                    }
                },
            };

            if let Outcome::Completed { encoding, authored } = outcome {
                println!("level complete{}", if authored { ", design saved" } else { "" });
                println!("{}", encoding);
            }
        }
        // any input acknowledges a solved level
        GameState::LevelFinished => game.leave_level(),
    }

    true
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut game = Game::new(Config::from_env());
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let screen = match game.state() {
            GameState::MainMenu => menu(&game),
            _ => level(&game),
        };
        print!("{}> ", screen);
        if io::stdout().flush().is_err() {
            break;
        }

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        if !command(&mut game, &line) {
            break;
        }
    }
}
