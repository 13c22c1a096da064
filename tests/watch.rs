//! Loop-level tests driving the bot against a scripted chat surface.

use rosterbot::{Bot, Config, Error, ScriptedSurface, Tick, ZWSP};

const SAMPLE: &str = "terça-feira 23/09\n\nIda 11:15\n1. Isabella\n\nVolta 17:30\n1. Jaqueline\n2. Antonio";

/// A config whose gate is always open, so ticks are deterministic.
fn rehearsal_config() -> Config {
    Config::parse(
        r#"
name: "Rehearsal"
group: "Bot Test"
roster:
  insert_name: "Helio"
schedule:
  start: "00:00"
  end_hour: 24
check_date: false
"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_posts_once_group_opens() {
    let surface = ScriptedSurface::new(SAMPLE).closed_for(2);
    let mut bot = Bot::new(rehearsal_config(), surface);

    let (first, _) = bot.tick().await.unwrap();
    assert_eq!(first, Tick::Closed);
    let (second, _) = bot.tick().await.unwrap();
    assert_eq!(second, Tick::Closed);
    let (third, _) = bot.tick().await.unwrap();
    assert_eq!(third, Tick::Posted);

    let surface = bot.surface();
    assert_eq!(surface.inserted.len(), 1);
    assert_eq!(surface.submitted, 1);

    let reply = &surface.inserted[0];
    assert!(reply.contains(&format!("2.{}Helio", ZWSP)));
    assert!(reply.contains(&format!("3.{}Helio", ZWSP)));
    assert!(reply.contains("Ida 11:15"));
    assert!(reply.contains("Volta 17:30"));
}

#[tokio::test]
async fn test_second_tick_stands_by_after_posting() {
    let surface = ScriptedSurface::new(SAMPLE);
    let mut bot = Bot::new(rehearsal_config(), surface);

    let (first, _) = bot.tick().await.unwrap();
    assert_eq!(first, Tick::Posted);
    assert!(bot.state().sent_today());

    let (second, _) = bot.tick().await.unwrap();
    assert_eq!(second, Tick::Standby);
    assert_eq!(bot.surface().submitted, 1);
}

#[tokio::test]
async fn test_marks_day_done_when_name_already_listed() {
    let listed = "Ida 11:15\n1. HELIO\n\nVolta 17:30\n1. Jaqueline";
    let surface = ScriptedSurface::new(listed);
    let mut bot = Bot::new(rehearsal_config(), surface);

    let (outcome, _) = bot.tick().await.unwrap();
    assert_eq!(outcome, Tick::AlreadyListed);
    assert!(bot.state().sent_today());
    assert!(bot.surface().inserted.is_empty());
    assert_eq!(bot.surface().submitted, 0);
}

#[tokio::test]
async fn test_send_disabled_inserts_without_submitting() {
    let mut config = rehearsal_config();
    config.send = false;
    let mut bot = Bot::new(config, ScriptedSurface::new(SAMPLE));

    let (outcome, _) = bot.tick().await.unwrap();
    assert_eq!(outcome, Tick::Posted);
    assert_eq!(bot.surface().inserted.len(), 1);
    assert_eq!(bot.surface().submitted, 0);
}

#[tokio::test]
async fn test_no_roster_message_retries() {
    let mut bot = Bot::new(rehearsal_config(), ScriptedSurface::empty());
    let (outcome, _) = bot.tick().await.unwrap();
    assert_eq!(outcome, Tick::NoRoster);
    assert!(!bot.state().sent_today());
}

#[tokio::test]
async fn test_stale_roster_is_skipped() {
    let mut config = rehearsal_config();
    config.check_date = true;
    // An impossible date and no weekday names, so it can never look
    // current whenever the test runs.
    let stale = "lista 31/02\n\nIda 11:15\n1. Isabella\n\nVolta 17:30\n1. Jaqueline";
    let mut bot = Bot::new(config, ScriptedSurface::new(stale));

    let (outcome, _) = bot.tick().await.unwrap();
    assert_eq!(outcome, Tick::Stale);
    assert!(bot.surface().inserted.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_surfaces_then_recovers() {
    let surface = ScriptedSurface::new(SAMPLE).failing_fetches(1);
    let mut bot = Bot::new(rehearsal_config(), surface);

    match bot.tick().await {
        Err(Error::Surface(_)) => {}
        other => panic!("expected a surface error, got {:?}", other.map(|(t, _)| t)),
    }

    // The loop reopens the session and carries on; the next pass works.
    let (outcome, _) = bot.tick().await.unwrap();
    assert_eq!(outcome, Tick::Posted);
}

#[tokio::test]
async fn test_unparsable_text_skips_cycle() {
    // Markers present so the fetch layer would hand it over, but nothing
    // usable inside.
    let mut bot = Bot::new(rehearsal_config(), ScriptedSurface::new("Ida Volta"));
    let (outcome, _) = bot.tick().await.unwrap();
    assert_eq!(outcome, Tick::Unusable);
    assert!(!bot.state().sent_today());
}
