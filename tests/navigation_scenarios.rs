//! End-to-end navigation scenarios.
//!
//! Synthetic rides over a touring route, exercising the full pipeline:
//! route analysis, tracking, off-route detection, announcement gating and
//! replay files.
//!
//! Run with: `cargo test --test navigation_scenarios`

use approx::assert_relative_eq;
use marga::announce::Announcement;
use marga::geo::destination;
use marga::{
    AnnouncementKind, Coordinate, DeviationMetric, MargaConfig, NamedPoint, NavState,
    NavigationSession, PositionFix, ReplayLog, RideSimulator, Route, RoutePoint, Tier, TurnKind,
};

// ============================================================================
// Fixtures
// ============================================================================

const SPEED_MPS: f64 = 15.0;

/// Five legs, four turns: right, left, right, slight left. 3.2km in total.
fn touring_route() -> Route {
    let start = Coordinate::new(61.1000, 8.2000);
    let legs = [
        (0.0, 800.0, "Fv51"),
        (90.0, 600.0, "Fv51"),
        (30.0, 700.0, "Rv55"),
        (120.0, 600.0, "Rv55"),
        (100.0, 500.0, "Sognefjellsvegen"),
    ];

    let mut points = vec![RoutePoint {
        lat: start.lat,
        lon: start.lon,
        street: Some(legs[0].2.to_string()),
    }];
    let mut last = start;
    for (i, (bearing, length, _)) in legs.iter().enumerate() {
        last = destination(&last, *bearing, *length);
        points.push(RoutePoint {
            lat: last.lat,
            lon: last.lon,
            street: legs.get(i + 1).map(|l| l.2.to_string()),
        });
    }

    Route {
        name: "Sognefjellet".to_string(),
        start: NamedPoint {
            name: "Lom".to_string(),
            coordinate: start,
        },
        end: NamedPoint {
            name: "Turtagrø".to_string(),
            coordinate: last,
        },
        points,
    }
}

/// Sparse route: measure deviation against segments.
fn segment_config() -> MargaConfig {
    let mut config = MargaConfig::default();
    config.tracker.deviation_metric = DeviationMetric::NearestSegment;
    config
}

fn ride(route: &Route) -> Vec<PositionFix> {
    let coordinates: Vec<_> = route.points.iter().map(RoutePoint::coordinate).collect();
    RideSimulator::new(&coordinates, SPEED_MPS, 1.0).collect()
}

fn ride_with_offset(route: &Route, offset_m: f64) -> Vec<PositionFix> {
    let coordinates: Vec<_> = route.points.iter().map(RoutePoint::coordinate).collect();
    RideSimulator::new(&coordinates, SPEED_MPS, 1.0)
        .with_offset(offset_m)
        .collect()
}

fn new_session(config: &MargaConfig) -> NavigationSession<Vec<Announcement>> {
    NavigationSession::new(config, Vec::new())
}

fn count(announcements: &[Announcement], kind: AnnouncementKind) -> usize {
    announcements.iter().filter(|a| a.kind == kind).count()
}

// ============================================================================
// Route analysis
// ============================================================================

#[test]
fn test_touring_route_instructions() {
    let route = touring_route();
    let instructions = marga::analyze(&route.polyline().unwrap());

    let kinds: Vec<_> = instructions.iter().map(|i| i.turn_kind).collect();
    assert_eq!(
        kinds,
        vec![
            TurnKind::Straight,
            TurnKind::Right,
            TurnKind::Left,
            TurnKind::Right,
            TurnKind::SlightLeft,
            TurnKind::Arrive,
        ]
    );

    assert_eq!(instructions[1].street_name.as_deref(), Some("Fv51"));
    assert_eq!(instructions[2].street_name.as_deref(), Some("Rv55"));
    assert_eq!(
        instructions[4].street_name.as_deref(),
        Some("Sognefjellsvegen")
    );

    for pair in instructions.windows(2) {
        assert!(pair[1].cumulative_distance_m >= pair[0].cumulative_distance_m);
    }
    assert_relative_eq!(
        instructions[5].cumulative_distance_m,
        3200.0,
        epsilon = 0.5
    );
}

// ============================================================================
// Full rides
// ============================================================================

#[test]
fn test_ride_along_route_arrives() {
    let route = touring_route();
    let mut session = new_session(&segment_config());
    session.start_route(&route).unwrap();

    for fix in ride(&route) {
        let update = session.update(&fix);
        assert_ne!(update.snapshot.state, NavState::OffRoute);
    }

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, NavState::Arrived);
    assert_eq!(snapshot.current_index, Some(5));
    assert_relative_eq!(snapshot.progress_fraction, 1.0);
    assert_relative_eq!(snapshot.seconds_remaining, 0.0);

    let spoken = session.into_sink();
    // Every turn gets its "now" announcement
    assert_eq!(
        count(&spoken, AnnouncementKind::Instruction(Tier::Immediate)),
        4
    );
    assert_eq!(count(&spoken, AnnouncementKind::OffRoute), 0);
    assert_eq!(spoken.last().map(|a| a.kind), Some(AnnouncementKind::Arrival));
    assert!(spoken.iter().any(|a| a.text == "Turn right now onto Fv51"));
    assert!(
        spoken
            .iter()
            .any(|a| a.text == "Keep left now onto Sognefjellsvegen")
    );
}

#[test]
fn test_progress_is_monotonic() {
    let route = touring_route();
    let mut session = new_session(&segment_config());
    session.start_route(&route).unwrap();

    let mut last_progress = 0.0;
    let mut last_index = 0;
    for fix in ride(&route) {
        let snapshot = session.update(&fix).snapshot;
        assert!(snapshot.progress_fraction >= last_progress);
        assert!((0.0..=1.0).contains(&snapshot.progress_fraction));

        let index = snapshot.current_index.unwrap();
        assert!(index >= last_index);
        assert!(index - last_index <= 1);

        last_progress = snapshot.progress_fraction;
        last_index = index;
    }
}

#[test]
fn test_detour_goes_off_route_and_recovers() {
    let route = touring_route();
    let on_route = ride(&route);
    let detour = ride_with_offset(&route, 150.0);

    let mut session = new_session(&segment_config());
    session.start_route(&route).unwrap();

    let mut index_before_detour = None;
    for (i, fix) in on_route.iter().enumerate() {
        // 300m to 585m along the first leg ridden 150m to the side
        let fix = if (20..40).contains(&i) { &detour[i] } else { fix };
        let update = session.update(fix);

        match i {
            19 => index_before_detour = update.snapshot.current_index,
            20 => assert!(update.entered(NavState::OffRoute)),
            21..=39 => {
                assert_eq!(update.snapshot.state, NavState::OffRoute);
                assert_eq!(update.snapshot.current_index, index_before_detour);
            }
            40 => assert!(update.entered(NavState::Navigating)),
            _ => {}
        }
    }

    assert_eq!(session.state(), NavState::Arrived);
    assert_eq!(count(session.sink(), AnnouncementKind::OffRoute), 1);
    assert_eq!(
        session
            .sink()
            .iter()
            .find(|a| a.kind == AnnouncementKind::OffRoute)
            .map(|a| a.text.as_str()),
        Some("You are off route")
    );
}

#[test]
fn test_wider_threshold_from_config() {
    let config = MargaConfig::from_toml_str(
        r#"
        [tracker]
        off_route_threshold_m = 200.0
        deviation_metric = "nearest_segment"
        "#,
    )
    .unwrap();

    let route = touring_route();
    let mut session = new_session(&config);
    session.start_route(&route).unwrap();

    for fix in ride_with_offset(&route, 150.0) {
        let update = session.update(&fix);
        assert_eq!(update.snapshot.state, NavState::Navigating);
    }
}

#[test]
fn test_out_of_order_fixes_are_ignored() {
    let route = touring_route();
    let mut fixes = ride(&route);
    fixes.swap(10, 11);
    fixes.swap(100, 101);

    let mut session = new_session(&segment_config());
    session.start_route(&route).unwrap();

    for fix in &fixes {
        session.update(fix);
    }
    assert_eq!(session.state(), NavState::Arrived);
}

#[test]
fn test_muted_ride_is_silent() {
    let mut config = segment_config();
    config.announcer.enabled = false;

    let route = touring_route();
    let mut session = new_session(&config);
    session.start_route(&route).unwrap();

    for fix in ride(&route) {
        session.update(&fix);
    }

    assert_eq!(session.state(), NavState::Arrived);
    assert!(session.sink().is_empty());
}

#[test]
fn test_announcements_are_throttled() {
    let route = touring_route();
    let mut session = new_session(&segment_config());
    session.start_route(&route).unwrap();

    let mut spoken_at = Vec::new();
    for fix in ride(&route) {
        let before = session.sink().len();
        session.update(&fix);
        if session.sink().len() > before {
            spoken_at.push(fix.timestamp_us);
        }
    }

    for pair in spoken_at.windows(2) {
        assert!(pair[1] - pair[0] >= 3_000_000);
    }
}

// ============================================================================
// Replay files
// ============================================================================

#[test]
fn test_replay_file_matches_live_ride() {
    let route = touring_route();
    let fixes = ride(&route);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sognefjellet.json");
    ReplayLog::new(route.clone(), &fixes).save(&path).unwrap();

    let replay = ReplayLog::load(&path).unwrap();
    assert_eq!(replay.fixes.len(), fixes.len());

    let mut live = new_session(&segment_config());
    live.start_route(&route).unwrap();
    for fix in &fixes {
        live.update(fix);
    }

    let mut replayed = new_session(&segment_config());
    replayed.start_route(&replay.route).unwrap();
    for fix in replay.fixes() {
        replayed.update(&fix);
    }

    let texts = |s: &[Announcement]| s.iter().map(|a| a.text.clone()).collect::<Vec<_>>();
    assert_eq!(texts(live.sink()), texts(replayed.sink()));
    assert_eq!(replayed.state(), NavState::Arrived);
}

#[test]
fn test_invalid_route_in_replay() {
    let json = r#"{
        "route": {
            "name": "broken",
            "start": { "name": "a", "lat": 61.0, "lon": 8.0 },
            "end": { "name": "b", "lat": 61.0, "lon": 8.0 },
            "points": [ { "lat": 61.0, "lon": 8.0 } ]
        },
        "fixes": []
    }"#;
    let replay = ReplayLog::from_json_str(json).unwrap();

    let mut session = new_session(&MargaConfig::default());
    let result = session.start_route(&replay.route);

    assert!(matches!(
        result,
        Err(marga::MargaError::InvalidRoute { points: 1 })
    ));
    assert_eq!(session.state(), NavState::Idle);
}
