use chrono::{Duration, Utc};
use srs_engine::{
    Clock, Engine, EngineConfig, FixedClock, ItemContent, Outcome, SessionState, SnapshotStore,
};

fn init_logger() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {message}", record.level(), record.target()))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()
}

fn study(engine: &Engine<FixedClock>) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = engine.load();
    let mut session = engine.start_session(&state);
    if session.state() == SessionState::NothingDue {
        println!("{}: nothing to study", engine.clock().now().date_naive());
        return Ok(());
    }

    let mut forgot_once = false;
    while let Some(id) = session.current().cloned() {
        let item = state.items.get(&id).ok_or("queued item vanished")?;
        let preview = engine.next_states(item);
        println!(
            "{} ({}) -> forgot {}d, hard {}d, good {}d, easy {}d",
            item.content.term,
            item.content.meaning,
            preview.forgot.interval_days,
            preview.hard.interval_days,
            preview.good.interval_days,
            preview.easy.interval_days,
        );
        // forget the very first card once to show the re-queue
        let outcome = if forgot_once { Outcome::Good } else { Outcome::Forgot };
        forgot_once = true;
        session.rate(outcome)?;
        let progress = session.progress();
        println!("  rated {outcome} ({}/{})", progress.answered, progress.total);
    }

    let summary = engine.complete_session(&mut state, session.finish()?)?;
    let level = engine.level_progress(&state);
    println!(
        "{} reviews over {} items, +{} xp, streak {} days, level {} ({:.0}% to next)",
        summary.reviews,
        summary.items,
        summary.experience_gained,
        summary.streak_days,
        level.level,
        level.fraction() * 100.0
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger()?;
    let dir = tempfile::tempdir()?;
    let engine = Engine::with_clock(EngineConfig::default(), FixedClock::new(Utc::now()))
        .with_store(SnapshotStore::new(dir.path().join("state.json")));

    let mut state = engine.load();
    engine.add_item(
        &mut state,
        ItemContent {
            term: "食飯".into(),
            transcription: "sik6 faan6".into(),
            meaning: "吃饭".into(),
            tags: vec!["日常".into()],
            ..Default::default()
        },
    )?;

    for _ in 0..3 {
        study(&engine)?;
        engine.clock().advance(Duration::days(1));
    }

    let state = engine.load();
    engine.export_csv(&state, std::io::stdout())?;
    Ok(())
}
