//! ASCII frames drawn from world queries.

use labyrinth_core::{Cell, Position};
use labyrinth_world::{query, World};

/// Draws the grid with each player shown as the last digit of its id.
///
/// When players share a cell the lowest id is drawn.
pub(crate) fn render(world: &World) -> String {
    let size = query::grid_size(world);
    let players = query::player_view(world).into_vec();
    let origin = query::grid(world).origin_marker();
    let goal = query::goal(world);

    let width = usize::try_from(size.width()).unwrap_or(0);
    let height = usize::try_from(size.height()).unwrap_or(0);
    let mut frame = String::with_capacity((width + 1) * height);

    for y in 0..i32::try_from(size.height()).unwrap_or(i32::MAX) {
        for x in 0..i32::try_from(size.width()).unwrap_or(i32::MAX) {
            let here = Position::new(x, y);
            let occupant = players.iter().find(|snapshot| snapshot.position == here);
            let symbol = match occupant {
                Some(snapshot) => char::from_digit(snapshot.id.get() % 10, 10).unwrap_or('?'),
                None if Some(here) == goal => 'E',
                None if Some(here) == origin => 'O',
                None => match query::cell_at(world, here) {
                    Cell::Wall => '#',
                    Cell::Empty => ' ',
                },
            };
            frame.push(symbol);
        }
        frame.push('\n');
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::{Command, Direction, PlayerId};
    use labyrinth_world::{self as world, Config, PatternSource, FALLBACK_PATTERN};
    use std::time::Duration;

    #[test]
    fn draws_players_over_the_grid() {
        let mut world = World::new(Config::new(PatternSource::text(FALLBACK_PATTERN)));
        let frame = render(&world);
        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "#0       #");
        assert_eq!(lines[9], "#       E#");

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetDirection {
                player: PlayerId::new(0),
                direction: Direction::Right,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        assert_eq!(render(&world).lines().nth(1), Some("#O0      #"));
    }

    #[test]
    fn origin_is_drawn_only_when_marked() {
        let mut world = World::new(Config::new(PatternSource::text("  E\n")));
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::MovePlayer {
                player: PlayerId::new(0),
                to: Position::new(1, 0),
            },
            &mut events,
        );
        assert_eq!(render(&world), " 0E\n");
    }

    #[test]
    fn shared_cells_show_lowest_id() {
        let mut world = World::new(Config::new(PatternSource::text("O#\n")));
        let mut events = Vec::new();
        world::apply(&mut world, Command::AddPlayer, &mut events);
        assert_eq!(render(&world), "0#\n");
    }
}
