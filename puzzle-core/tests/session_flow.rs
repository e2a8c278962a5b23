use map_puzzle_core::drag::DragState;
use map_puzzle_core::{DropOutcome, Point, Puzzle, PuzzleConfig, PuzzleEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CELL: f64 = 0.25;

/// A 9x9 grid of square provinces around the default projection center.
fn grid_geojson(n: usize) -> String {
    let mut features = Vec::new();
    for row in 0..n {
        for col in 0..n {
            let lon = 35.0 + (col as f64 - n as f64 / 2.0) * CELL;
            let lat = 39.0 + (row as f64 - n as f64 / 2.0) * CELL;
            features.push(format!(
                r#"{{"type":"Feature","properties":{{"ilad":"P{row}-{col}"}},
                "geometry":{{"type":"Polygon","coordinates":[[[{a},{b}],[{c},{b}],[{c},{d}],[{a},{d}],[{a},{b}]]]}}}}"#,
                a = lon,
                b = lat,
                c = lon + CELL,
                d = lat + CELL,
            ));
        }
    }
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

fn new_puzzle() -> Puzzle {
    let mut rng = StdRng::seed_from_u64(2024);
    Puzzle::from_geojson(&grid_geojson(9), PuzzleConfig::default(), &mut rng, 0.0).unwrap()
}

#[test]
fn eighty_one_regions_start_on_the_frame_perimeter() {
    let pz = new_puzzle();
    assert_eq!(pz.pieces().len(), 81);
    assert_eq!(pz.session().total_pieces(), 81);
    assert_eq!(pz.pieces()[0].position(), Point::new(10.0, 90.0));
    let step = 3920.0 / 81.0;
    assert!((pz.pieces()[1].position().x - (10.0 + step)).abs() < 1e-9);

    let mut names: Vec<_> = pz.pieces().iter().map(|p| p.name().to_string()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 81);
}

#[test]
fn hover_does_not_start_the_clock() {
    let mut pz = new_puzzle();
    pz.tick(5_000.0);
    let p = pz.pieces()[4].position();
    pz.pointer_move(p, 5_000.0);
    assert!(pz.pieces()[4].is_hovered());
    assert_eq!(pz.session().started_at(), None);
}

#[test]
fn solving_every_piece_completes_exactly_once() {
    let mut pz = new_puzzle();
    pz.tick(5_000.0);
    pz.drain_events();

    let mut now = 10_000.0;
    let mut completions = 0;
    let mut last_correct = 0;
    for id in 0..81 {
        let from = pz.piece(id).unwrap().position();
        let target = pz.piece(id).unwrap().target();
        assert!(pz.pointer_down(from, now), "piece {id} not grabbable");
        // wander around the board first; the piece must stay inside the frame
        for pointer in [
            Point::new(-400.0, -400.0),
            Point::new(2_000.0, 1_500.0),
            Point::new(target.x + 3.0, target.y - 4.0),
        ] {
            now += 16.0;
            pz.pointer_move(pointer, now);
            let pos = pz.piece(id).unwrap().position();
            let e = pz.piece(id).unwrap().extent();
            assert!(pos.x - e.left >= 10.0 - 1e-9 && pos.x + e.right <= 1190.0 + 1e-9);
            assert!(pos.y - e.top >= 10.0 - 1e-9 && pos.y + e.bottom <= 790.0 + 1e-9);
        }
        now += 16.0;
        match pz.pointer_up(now) {
            Some(DropOutcome::Snapped { completion, .. }) => {
                if completion.is_some() {
                    completions += 1;
                }
            }
            other => panic!("piece {id} did not snap: {other:?}"),
        }
        let correct = pz.session().correct_count();
        assert_eq!(correct, last_correct + 1);
        last_correct = correct;
        assert_eq!(pz.piece(id).unwrap().position(), target);
        assert_eq!(pz.drag_state(), DragState::Idle);
    }

    assert_eq!(completions, 1);
    assert!(pz.session().is_complete());
    assert_eq!(pz.background_labels().count(), 0);

    let events = pz.drain_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, PuzzleEvent::TimerStarted))
            .count(),
        1
    );
    assert!(matches!(events.last(), Some(PuzzleEvent::Completed { .. })));

    // everything is frozen now
    let p = pz.piece(0).unwrap().position();
    assert!(!pz.pointer_down(p, now + 100.0));
    assert!(pz.pieces().iter().all(|p| p.is_fixed()));
}
