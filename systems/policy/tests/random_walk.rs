use labyrinth_core::{Cell, Direction, Neighborhood, Position};
use labyrinth_system_policy::{Manual, MovePolicy, RandomWalk};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

const CURRENT: Position = Position::new(4, 4);

fn corridor(open: &[Direction]) -> Neighborhood {
    Neighborhood::around(CURRENT, |position| {
        let open_here = open
            .iter()
            .any(|direction| CURRENT.offset(*direction) == position);
        if open_here {
            Cell::Empty
        } else {
            Cell::Wall
        }
    })
}

#[test]
fn single_opening_is_chosen_every_time() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0001);
    for direction in Direction::ALL {
        let neighbors = corridor(&[direction]);
        for _ in 0..1_000 {
            assert_eq!(
                RandomWalk.next_move(CURRENT, &neighbors, &mut rng),
                Some(direction)
            );
        }
    }
}

#[test]
fn enclosed_player_stays_put() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0002);
    let mut policy = MovePolicy::random_walk();
    for _ in 0..100 {
        assert_eq!(
            policy.next_move(CURRENT, &Neighborhood::enclosed(), &mut rng),
            None
        );
    }
}

#[test]
fn never_selects_a_walled_direction() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0003);
    let neighbors = corridor(&[Direction::Down, Direction::Right]);
    for _ in 0..1_000 {
        let chosen = RandomWalk
            .next_move(CURRENT, &neighbors, &mut rng)
            .expect("two openings available");
        assert!(matches!(chosen, Direction::Down | Direction::Right));
    }
}

/// Chi-square critical values at p = 0.001 for 1, 2 and 3 degrees of freedom.
const CHI_SQUARE_CRITICAL: [f64; 3] = [10.828, 13.816, 16.266];

fn assert_uniform(open: &[Direction], seed: u64) {
    const TRIALS: usize = 10_000;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let neighbors = corridor(open);
    let mut counts = [0usize; 4];

    for _ in 0..TRIALS {
        let chosen = RandomWalk
            .next_move(CURRENT, &neighbors, &mut rng)
            .expect("openings available");
        let index = Direction::ALL
            .iter()
            .position(|direction| *direction == chosen)
            .expect("known direction");
        counts[index] += 1;
    }

    let expected = TRIALS as f64 / open.len() as f64;
    let mut chi_square = 0.0;
    for (direction, count) in Direction::ALL.iter().zip(counts) {
        if open.contains(direction) {
            let deviation = count as f64 - expected;
            chi_square += deviation * deviation / expected;
        } else {
            assert_eq!(count, 0, "{direction:?} is walled off");
        }
    }

    let critical = CHI_SQUARE_CRITICAL[open.len() - 2];
    assert!(
        chi_square < critical,
        "distribution {counts:?} deviates from uniform (chi-square {chi_square:.3})"
    );
}

#[test]
fn two_openings_are_equally_likely() {
    assert_uniform(&[Direction::Up, Direction::Left], 0x0dd_ba11);
}

#[test]
fn three_openings_are_equally_likely() {
    assert_uniform(&[Direction::Up, Direction::Down, Direction::Right], 0xcafe);
}

#[test]
fn four_openings_are_equally_likely() {
    assert_uniform(&Direction::ALL, 0xbeef);
}

#[test]
fn manual_hands_out_each_direction_once() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut policy = MovePolicy::Manual(Manual::new());
    let neighbors = corridor(&Direction::ALL);

    assert_eq!(policy.next_move(CURRENT, &neighbors, &mut rng), None);

    policy
        .as_manual_mut()
        .expect("manual policy")
        .queue(Direction::Up);
    assert_eq!(
        policy.next_move(CURRENT, &neighbors, &mut rng),
        Some(Direction::Up)
    );
    assert_eq!(policy.next_move(CURRENT, &neighbors, &mut rng), None);
}
