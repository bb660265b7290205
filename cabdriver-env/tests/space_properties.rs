use cabdriver_env::{Action, ActionSpace, Clock, EnvConfig, State, StateEncoder, StateSpace};
use std::collections::HashSet;

#[test]
fn action_spaces_scale_with_city_size() {
    for m in 2..=8_usize {
        let space = ActionSpace::new(m);
        assert_eq!(space.len(), m * (m - 1) + 1);
        assert_eq!(space.get(0), Some(Action::Refuse));
        assert_eq!(space.iter().filter(|a| a.is_refusal()).count(), 1);

        let unique: HashSet<_> = space.iter().copied().collect();
        assert_eq!(unique.len(), space.len());
        for (index, action) in space.iter().enumerate() {
            assert_eq!(space.index_of(*action), Some(index));
            if let Action::Ride { pickup, drop } = *action {
                assert_ne!(pickup, drop);
            }
        }
    }
}

#[test]
fn ride_actions_are_ordered_by_pickup_then_drop() {
    let space = ActionSpace::new(4);
    let rides: Vec<_> = space.iter().skip(1).map(|a| a.as_pair()).collect();
    let mut sorted = rides.clone();
    sorted.sort_unstable();
    assert_eq!(rides, sorted);
}

#[test]
fn state_spaces_cover_every_combination_once() {
    for (m, t, d) in [(2, 1, 1), (5, 24, 7), (3, 12, 2)] {
        let space = StateSpace::new(m, t, d);
        assert_eq!(space.len(), m * t * d);
        let unique: HashSet<State> = space.iter().copied().collect();
        assert_eq!(unique.len(), space.len());
        assert!(space.iter().all(|s| usize::from(s.location) < m
            && usize::from(s.hour) < t
            && usize::from(s.day) < d));
    }
}

#[test]
fn clock_wraps_hours_into_days_and_weeks() {
    let clock = Clock::new(24, 7).unwrap();
    for hour in 0..24 {
        for day in 0..7 {
            assert_eq!(clock.advance(hour, day, 0), (hour, day));
        }
    }
    assert_eq!(clock.advance(23, 6, 1), (0, 0));
    assert_eq!(clock.advance(10, 2, 25), (11, 3));
    assert_eq!(clock.advance(10, 2, 24 * 7), (10, 2));
}

#[test]
fn encoder_dimension_follows_configuration() {
    let cfg = EnvConfig::default();
    let encoder = StateEncoder::new(cfg.locations, cfg.hours_per_day, cfg.days_per_week);
    assert_eq!(encoder.dimension(), cfg.feature_len());
    let space = StateSpace::new(cfg.locations, cfg.hours_per_day, cfg.days_per_week);
    let encodings: HashSet<Vec<u8>> = space
        .iter()
        .map(|state| encoder.encode(*state).unwrap())
        .collect();
    assert_eq!(encodings.len(), space.len());
}
