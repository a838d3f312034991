use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use pullwatch_core::context::DirectoryIndex;
use pullwatch_core::session::{Attempt, AttemptOutcome};
use pullwatch_core::{HitType, RaidSession, Reader, SessionParser, apply_hit_type_overrides, resolve};
use tracing::warn;

use crate::context::CliContext;

pub fn exit() {
    println!("bye");
}

/// Resolve a log path, joining with the configured directory if relative.
async fn resolve_log_path(ctx: &CliContext, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        ctx.config.read().await.log_directory_path().join(path)
    }
}

fn outcome_label(outcome: AttemptOutcome) -> &'static str {
    match outcome {
        AttemptOutcome::Victory => "victory",
        AttemptOutcome::Wipe => "wipe",
        AttemptOutcome::InProgress => "in progress",
    }
}

fn format_duration(secs: f32) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn attempt_summary(attempt: &Attempt) -> String {
    format!(
        "  #{} {:<11} {}  {} hits, {} debuffs, {} deaths",
        attempt.number,
        outcome_label(attempt.outcome),
        format_duration(attempt.duration_secs),
        attempt.ability_hits.len(),
        attempt.debuffs.len(),
        attempt.deaths.len(),
    )
}

fn print_session_summary(session: &RaidSession) {
    println!(
        "{} lines parsed, {} dropped",
        session.lines_processed, session.lines_dropped
    );
    for fight in &session.fights {
        let boss = resolve(fight.boss_name);
        let boss = if boss.is_empty() { "unknown boss" } else { boss };
        println!(
            "Fight {}: {} - {} ({} attempts, {} wipes, {} victories)",
            fight.id,
            resolve(fight.zone_name),
            boss,
            fight.attempts.len(),
            fight.total_wipes(),
            fight.total_victories(),
        );
        for attempt in &fight.attempts {
            println!("{}", attempt_summary(attempt));
        }
    }
}

pub async fn parse_file(path: &str, ctx: &CliContext) -> Result<bool, String> {
    let path = resolve_log_path(ctx, path).await;
    let timer = std::time::Instant::now();

    let (mut session, _end_pos) = Reader::new(path).parse_file().map_err(|e| format!("{e}\n"))?;

    let overrides = ctx.config.read().await.hit_type_overrides.clone();
    let applied = apply_hit_type_overrides(&mut session, &overrides);
    if applied > 0 {
        println!("applied hit-type overrides to {applied} hits");
    }

    println!("parsed in {} ms", timer.elapsed().as_millis());
    print_session_summary(&session);
    ctx.set_session(session).await;
    Ok(false)
}

/// Tail the newest log in the watched directory, announcing each attempt
/// as it completes. Runs until `stop`.
pub async fn follow(ctx: &CliContext) -> Result<bool, String> {
    let dir = ctx.config.read().await.log_directory_path();
    let index = DirectoryIndex::scan(&dir).map_err(|e| format!("cannot scan {dir:?}: {e}\n"))?;
    let Some(newest) = index.newest() else {
        return Err("no log files in the configured directory\n".to_string());
    };
    let path = newest.path.clone();
    println!("following {}", path.display());

    let handle = tokio::spawn(async move {
        let reader = Reader::new(path);
        let mut parser = SessionParser::new();
        let mut completed = 0usize;
        let result = reader
            .tail_into(0, &mut parser, |p| {
                let session = p.session();
                let now = session.completed_attempts().count();
                if now > completed {
                    completed = now;
                    if let Some(attempt) = session.completed_attempts().last() {
                        let boss = session
                            .current_fight()
                            .map(|f| resolve(f.boss_name))
                            .unwrap_or_default();
                        println!(
                            "attempt {} vs {} ended: {} ({})",
                            attempt.number,
                            if boss.is_empty() { "?" } else { boss },
                            outcome_label(attempt.outcome),
                            format_duration(attempt.duration_secs),
                        );
                    }
                }
            })
            .await;
        if let Err(e) = result {
            warn!("follow stopped: {e}");
        }
    });

    let mut tasks = ctx.tasks.lock().await;
    if let Some(old) = tasks.follower.take() {
        old.abort();
    }
    tasks.follower = Some(handle);
    Ok(false)
}

pub async fn stop(ctx: &CliContext) -> Result<bool, String> {
    let mut tasks = ctx.tasks.lock().await;
    match tasks.follower.take() {
        Some(handle) => {
            handle.abort();
            println!("stopped following");
        }
        None => println!("nothing to stop"),
    }
    Ok(false)
}

pub async fn export(out: &str, ctx: &CliContext) -> Result<bool, String> {
    let Some(session) = ctx.session().await else {
        return Err("no session loaded; run parse-file first\n".to_string());
    };
    let file = File::create(out).map_err(|e| format!("cannot create {out}: {e}\n"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), session.as_ref())
        .map_err(|e| format!("{e}\n"))?;
    println!("wrote {out}");
    Ok(false)
}

pub async fn list_files(ctx: &CliContext) -> Result<bool, String> {
    let dir = ctx.config.read().await.log_directory_path();
    let index = DirectoryIndex::scan(&dir).map_err(|e| format!("cannot scan {dir:?}: {e}\n"))?;
    if index.is_empty() {
        println!("no log files in {}", dir.display());
        return Ok(false);
    }
    for file in &index.files {
        let name = file.path.file_name().and_then(|n| n.to_str()).unwrap_or("?");
        let date = pullwatch_core::context::parse_log_filename(name)
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!("{:>10} bytes  {date:<10}  {name}", file.size);
    }
    *ctx.file_index.write().await = Some(index);
    Ok(false)
}

pub async fn set_directory(path: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut config = ctx.config.write().await;
    config.log_directory = path.to_string();
    config.save().map_err(|e| format!("{e}\n"))?;
    println!("log directory set to {path}");
    Ok(false)
}

pub async fn show_stats(ctx: &CliContext) -> Result<bool, String> {
    let Some(session) = ctx.session().await else {
        return Err("no session loaded; run parse-file first\n".to_string());
    };
    let stats = session.cross_attempt_stats();
    println!(
        "{} fights, {} completed attempts ({} wipes, {} victories)",
        stats.total_fights, stats.total_attempts, stats.total_wipes, stats.total_victories
    );

    if !stats.deaths_by_player.is_empty() {
        println!("deaths:");
        for (player, count) in &stats.deaths_by_player {
            println!("  {player}: {count}");
        }
    }

    let mut hits: Vec<_> = stats.hits_by_ability.iter().collect();
    hits.sort_by(|a, b| b.1.cmp(a.1));
    if !hits.is_empty() {
        println!("most frequent abilities:");
        for (ability, count) in hits.iter().take(10) {
            println!("  {ability}: {count}");
        }
    }
    Ok(false)
}

pub async fn set_hit_type(ability: &str, hit_type: &str, ctx: &CliContext) -> Result<bool, String> {
    let parsed: HitType = hit_type
        .parse()
        .map_err(|()| format!("unknown hit type '{hit_type}' (physical/magical/special)\n"))?;

    let overrides = {
        let mut config = ctx.config.write().await;
        config
            .hit_type_overrides
            .insert(ability.to_ascii_uppercase(), parsed);
        config.save().map_err(|e| format!("{e}\n"))?;
        config.hit_type_overrides.clone()
    };

    // Re-apply to the loaded session; the updated model is swapped in
    // whole so readers never observe a half-applied state.
    if let Some(session) = ctx.session().await {
        let mut updated = (*session).clone();
        let applied = apply_hit_type_overrides(&mut updated, &overrides);
        ctx.set_session(updated).await;
        println!("override saved, {applied} hits reclassified");
    } else {
        println!("override saved");
    }
    Ok(false)
}

pub async fn show_overrides(ctx: &CliContext) -> Result<bool, String> {
    let config = ctx.config.read().await;
    if config.hit_type_overrides.is_empty() {
        println!("no hit-type overrides");
        return Ok(false);
    }
    for (ability, hit_type) in &config.hit_type_overrides {
        println!("  {ability} -> {hit_type}");
    }
    Ok(false)
}

pub async fn show_settings(ctx: &CliContext) -> Result<bool, String> {
    let config = ctx.config.read().await;
    println!("log directory: {}", config.log_directory);
    println!("overrides: {}", config.hit_type_overrides.len());
    Ok(false)
}
