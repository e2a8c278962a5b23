//! Confetti schedule played after completion. The engine only decides when
//! and with what parameters; drawing particles is the host's job.

use rand::Rng;
use serde::Serialize;

use crate::models::Point;

/// Origin is in normalized viewport units (0..1 on each axis).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Burst {
    pub particle_count: u32,
    pub origin: Point,
    pub start_velocity: f64,
    pub spread: f64,
    pub ticks: u32,
    pub z_index: i32,
}

const BURST_MS: f64 = 3_000.0;
const AMBIENT_MS: f64 = 12_000.0;
const AMBIENT_EVERY_MS: f64 = 1_000.0;
const BURST_PARTICLES: f64 = 50.0;

#[derive(Clone, Debug)]
pub struct Celebration {
    started_ms: f64,
    next_ambient_ms: f64,
}

impl Celebration {
    pub fn begin(now: f64) -> Self {
        Celebration {
            started_ms: now,
            next_ambient_ms: now + BURST_MS,
        }
    }

    pub fn is_over(&self, now: f64) -> bool {
        now - self.started_ms >= BURST_MS + AMBIENT_MS
    }

    /// Called on every pulse of the host's interval. `None` means the show is
    /// over and the interval should be cleared.
    pub fn pulse<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> Option<Vec<Burst>> {
        if self.is_over(now) {
            return None;
        }
        let t = now - self.started_ms;
        if t < BURST_MS {
            let count = (BURST_PARTICLES * (BURST_MS - t) / BURST_MS).round().max(1.0) as u32;
            let y = rng.gen_range(-0.2..0.4);
            let burst = |x: f64| Burst {
                particle_count: count,
                origin: Point::new(x, y),
                start_velocity: 30.0,
                spread: 360.0,
                ticks: 60,
                z_index: 0,
            };
            return Some(vec![
                burst(rng.gen_range(0.1..0.3)),
                burst(rng.gen_range(0.7..0.9)),
            ]);
        }
        if now < self.next_ambient_ms {
            return Some(Vec::new());
        }
        self.next_ambient_ms = now + AMBIENT_EVERY_MS;
        Some(vec![Burst {
            particle_count: 8,
            origin: Point::new(rng.gen_range(0.0..1.0), 0.0),
            start_velocity: 15.0,
            spread: 90.0,
            ticks: 200,
            z_index: 0,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn intense_then_ambient_then_over() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = Celebration::begin(1_000.0);

        let first = c.pulse(1_000.0, &mut rng).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].particle_count, 50);
        assert!(first[0].origin.x < 0.5 && first[1].origin.x > 0.5);

        let late = c.pulse(3_900.0, &mut rng).unwrap();
        assert!(late[0].particle_count < 50);

        let ambient = c.pulse(4_000.0, &mut rng).unwrap();
        assert_eq!(ambient.len(), 1);
        assert_eq!(ambient[0].ticks, 200);
        assert!(c.pulse(4_250.0, &mut rng).unwrap().is_empty());
        assert_eq!(c.pulse(5_000.0, &mut rng).unwrap().len(), 1);

        assert!(c.pulse(16_000.0, &mut rng).is_none());
    }

    #[test]
    fn serializes_for_the_confetti_call() {
        let b = Burst {
            particle_count: 3,
            origin: Point::new(0.5, 0.25),
            start_velocity: 30.0,
            spread: 360.0,
            ticks: 60,
            z_index: 0,
        };
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(
            json,
            r#"{"particleCount":3,"origin":{"x":0.5,"y":0.25},"startVelocity":30.0,"spread":360.0,"ticks":60,"zIndex":0}"#
        );
    }
}
