//! Every direction is a bijection on the torus, so each cell appears in
//! exactly four neighbour lists (counting repeats on narrow grids).

use wator_core::Position;
use wator_space::{Direction, Torus};

fn incidence(torus: &Torus) -> Vec<usize> {
    let mut hits = vec![0usize; torus.cell_count()];
    for i in 0..torus.cell_count() {
        for n in torus.neighbours(torus.position(i)) {
            hits[torus.index(n)] += 1;
        }
    }
    hits
}

#[test]
fn every_cell_has_in_degree_four() {
    for (w, h) in [(1, 1), (1, 5), (2, 2), (2, 7), (3, 3), (10, 4), (17, 13)] {
        let torus = Torus::new(w, h).unwrap();
        assert!(
            incidence(&torus).iter().all(|&n| n == 4),
            "{w}x{h} torus is not 4-regular"
        );
    }
}

#[test]
fn each_direction_is_a_permutation() {
    let torus = Torus::new(6, 5).unwrap();
    for dir in Direction::ALL {
        let mut seen = vec![false; torus.cell_count()];
        for i in 0..torus.cell_count() {
            let idx = torus.index(torus.step(torus.position(i), dir));
            assert!(!seen[idx], "{dir:?} maps two cells onto {idx}");
            seen[idx] = true;
        }
    }
}

#[test]
fn neighbours_are_listed_north_east_south_west() {
    let torus = Torus::new(4, 4).unwrap();
    let pos = Position::new(0, 0);
    let expected: Vec<Position> = Direction::ALL
        .iter()
        .map(|&d| torus.step(pos, d))
        .collect();
    assert_eq!(torus.neighbours(pos).to_vec(), expected);
    assert_eq!(
        expected,
        vec![
            Position::new(0, 3),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(3, 0),
        ]
    );
}
