//! End-to-end session tests: lockstep determinism and record replay.

use std::time::{Duration, Instant};

use warfront_protocol::{
    GameSettings, GameStartInfo, Intent, PlayerId, PlayerInfo, PlayerType, ServerMessage,
};
use warfront_server::{GameSession, SchedulerState, ServerConfig};

fn test_config() -> ServerConfig {
    ServerConfig {
        turn_interval: Duration::from_millis(10),
        poll_interval: Duration::from_millis(1),
        hash_store_period: 1,
        replay_speed_percent: 100,
        map_size: 40,
    }
}

fn start_info(game_id: &str, bot_count: u32, humans: Vec<PlayerInfo>) -> GameStartInfo {
    GameStartInfo {
        game_id: game_id.to_string(),
        settings: GameSettings {
            bot_count,
            spawn_phase_turns: 5,
            ..GameSettings::default()
        },
        players: humans,
        lobby_created_at: 1_700_000_000_000,
    }
}

/// Advances simulated wall-clock time one turn interval per step so
/// every step fires exactly one turn.
fn drive(session: &mut GameSession, from: Instant, turns: usize) -> Vec<ServerMessage> {
    let interval = test_config().turn_interval;
    let mut now = from;
    let mut collected = Vec::new();
    for _ in 0..turns {
        now += interval;
        collected.extend(session.step(now));
        if session.state() == SchedulerState::Ended {
            break;
        }
    }
    collected
}

fn humans() -> Vec<PlayerInfo> {
    vec![
        PlayerInfo::new(PlayerId(1), "Alice", PlayerType::Human, Some("c1".into())),
        PlayerInfo::new(PlayerId(2), "Bob", PlayerType::Human, Some("c2".into())),
    ]
}

#[test]
fn identical_sessions_stay_in_lockstep() {
    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut session = GameSession::new(test_config(), start_info("det-1", 8, humans()));
        let t0 = Instant::now();
        session.start(t0).unwrap();
        let a = session.game().map().tile(5, 5);
        let b = session.game().map().tile(30, 30);
        session
            .submit_intent(Intent::Spawn {
                player: PlayerId(1),
                tile: a,
            })
            .unwrap();
        session
            .submit_intent(Intent::Spawn {
                player: PlayerId(2),
                tile: b,
            })
            .unwrap();
        drive(&mut session, t0, 120);
        runs.push(session);
    }
    let first = &runs[0];
    let second = &runs[1];
    assert_eq!(first.game().state_hash(), second.game().state_hash());
    assert_eq!(
        first.game().tick_number(),
        second.game().tick_number(),
        "both sessions executed the same number of turns"
    );
}

#[test]
fn a_recorded_game_replays_to_the_same_state() {
    let mut live = GameSession::new(test_config(), start_info("rep-1", 6, Vec::new()));
    let t0 = Instant::now();
    live.start(t0).unwrap();
    drive(&mut live, t0, 60);
    live.scheduler_mut().end_game();
    let final_hash = live.game().state_hash();
    let turn_count = live.game().tick_number();
    let record = live.into_record();
    assert_eq!(record.turns.len() as u64, turn_count);

    let mut replay = GameSession::new_replay(test_config(), record);
    let t1 = Instant::now();
    replay.start(t1).unwrap();
    let messages = drive(&mut replay, t1, 100);

    assert_eq!(replay.state(), SchedulerState::Ended);
    assert_eq!(replay.game().state_hash(), final_hash);
    assert!(
        !messages
            .iter()
            .any(|m| matches!(m, ServerMessage::Desync { .. })),
        "a faithful replay never desyncs"
    );
}

#[test]
fn a_tampered_record_reports_desync_but_keeps_replaying() {
    let mut live = GameSession::new(test_config(), start_info("rep-2", 6, Vec::new()));
    let t0 = Instant::now();
    live.start(t0).unwrap();
    drive(&mut live, t0, 40);
    live.scheduler_mut().end_game();
    let mut record = live.into_record();
    let total = record.turns.len();
    assert!(total > 10);
    record.turns[10].hash = Some(0xDEAD_BEEF);

    let mut replay = GameSession::new_replay(test_config(), record);
    let t1 = Instant::now();
    replay.start(t1).unwrap();
    let messages = drive(&mut replay, t1, 100);

    assert!(messages.iter().any(|m| matches!(
        m,
        ServerMessage::Desync { turn: 10, .. }
    )));
    assert_eq!(replay.state(), SchedulerState::Ended);
    assert_eq!(
        replay.game().tick_number(),
        total as u64,
        "a desync is informational, the replay runs to the end"
    );
}

#[test]
fn the_winner_lands_in_the_record() {
    // A lone seated human with no opposition wins as soon as the spawn
    // phase closes.
    let solo = vec![PlayerInfo::new(
        PlayerId(7),
        "Lone",
        PlayerType::Human,
        Some("c7".into()),
    )];
    let mut session = GameSession::new(test_config(), start_info("win-1", 0, solo));
    let t0 = Instant::now();
    session.start(t0).unwrap();
    let tile = session.game().map().tile(10, 10);
    session
        .submit_intent(Intent::Spawn {
            player: PlayerId(7),
            tile,
        })
        .unwrap();
    drive(&mut session, t0, 20);
    assert_eq!(session.state(), SchedulerState::Ended);
    let record = session.into_record();
    assert_eq!(
        record.winner,
        Some(warfront_protocol::Winner::Player { id: PlayerId(7) })
    );
    let stats = record
        .all_players_stats
        .get(&PlayerId(7))
        .expect("winner has stats");
    assert!(stats.alive_at_end);
    assert!(stats.tiles_owned_max >= 1);
}
