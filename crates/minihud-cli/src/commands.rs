use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use minihud_core::{CommandOutcome, HudCommand, HudRegistry, HudSettings, HudView, NullRenderer, SyncEffect};
use minihud_store::{ChunkReport, FileEntryStore, StoreResult};
use minihud_types::{BadgeSide, ConfigOptions};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.settings {
        Some(path) => HudSettings::load(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => HudSettings::default(),
    };
    let session = Session {
        file: cli.file,
        settings,
        format: cli.format,
    };

    match cli.command {
        Command::Register(args) => cmd_register(&session, args),
        Command::Show(args) => cmd_show(&session, &args.object),
        Command::Inspect(args) => cmd_inspect(&session, &args.object),
        Command::Set(args) => session.apply(&args.object, vec![HudCommand::Set { bar: args.bar, value: args.value }]),
        Command::Inc(args) => session.apply(&args.object, vec![HudCommand::Increment { bar: args.bar }]),
        Command::Dec(args) => session.apply(&args.object, vec![HudCommand::Decrement { bar: args.bar }]),
        Command::SetMax(args) => session.apply(&args.object, vec![HudCommand::SetMax { bar: args.bar, max: args.max }]),
        Command::Color(args) => session.apply(
            &args.object,
            vec![HudCommand::SetColor { bar: args.bar, color: args.color, empty_color: args.empty }],
        ),
        Command::Badge(args) => cmd_badge(&session, args),
        Command::Apply(args) => cmd_apply(&session, args),
        Command::Purge(args) => cmd_purge(&session, &args.object),
        Command::List => cmd_list(&session),
    }
}

struct Session {
    file: PathBuf,
    settings: HudSettings,
    format: OutputFormat,
}

impl Session {
    /// Registry holding the HUD of `object`, loaded from the saved-data file.
    fn registry(&self, object: &str, options: &ConfigOptions) -> anyhow::Result<HudRegistry<FileEntryStore>> {
        let entries = FileEntryStore::open(&self.file, object)
            .with_context(|| format!("opening {}", self.file.display()))?;
        let mut registry = HudRegistry::new(self.settings.clone());
        registry.register(object, options, Arc::new(entries), Box::new(NullRenderer));
        Ok(registry)
    }

    /// Like [`Session::registry`], but refuses objects that were never registered.
    fn existing(&self, object: &str) -> anyhow::Result<HudRegistry<FileEntryStore>> {
        let registry = self.registry(object, &ConfigOptions::default())?;
        let persisted = match registry.get(object) {
            Some(hud) => hud.config_record().read_meta()?.is_some(),
            None => false,
        };
        if !persisted {
            bail!("no HUD saved for object {object}; run `minihud register {object}` first");
        }
        Ok(registry)
    }

    fn apply(&self, object: &str, commands: Vec<HudCommand>) -> anyhow::Result<()> {
        let mut registry = self.existing(object)?;
        let mut outcomes = Vec::with_capacity(commands.len());
        for command in &commands {
            outcomes.push(registry.dispatch(object, command)?);
        }
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
            OutputFormat::Text => {
                for outcome in &outcomes {
                    print_outcome(object, outcome);
                }
            }
        }
        Ok(())
    }
}

fn effect_label(effect: &SyncEffect) -> String {
    match effect {
        SyncEffect::ConfigSaved => "config saved".into(),
        SyncEffect::StoreSaved => "store saved".into(),
        SyncEffect::SaveFailed(record) => format!("{record} save failed"),
        SyncEffect::Repainted => "repainted".into(),
    }
}

fn print_outcome(object: &str, outcome: &CommandOutcome) {
    if outcome.accepted {
        let effects: Vec<String> = outcome.effects.iter().map(effect_label).collect();
        println!(
            "{} {} on {} {}",
            "✓".green().bold(),
            outcome.command.bold(),
            object.cyan(),
            format!("({})", effects.join(", ")).dimmed()
        );
    } else {
        println!("{} {} rejected; nothing changed", "✗".yellow().bold(), outcome.command.bold());
    }
    for effect in &outcome.effects {
        if let SyncEffect::SaveFailed(record) = effect {
            println!("  {} {} record was not saved", "!".red().bold(), record);
        }
    }
}

fn cmd_register(session: &Session, args: RegisterArgs) -> anyhow::Result<()> {
    let options: ConfigOptions = if let Some(text) = &args.options {
        serde_json::from_str(text).context("invalid --options JSON")?
    } else if let Some(path) = &args.options_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid options in {}", path.display()))?
    } else {
        ConfigOptions::default()
    };

    let mut registry = session.registry(&args.object, &options)?;
    let Some(hud) = registry.get_mut(&args.object) else {
        bail!("HUD for {} was not registered", args.object);
    };
    let existed = hud.config_record().read_meta()?.is_some();
    if !hud.commit() {
        bail!("could not save HUD records for {}", args.object);
    }

    match session.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "object": args.object,
                "kept_existing": existed,
                "bars": hud.config().bars.len(),
            }))?
        ),
        OutputFormat::Text => {
            println!("{} Registered HUD on {}", "✓".green().bold(), args.object.cyan().bold());
            if existed {
                println!("  {}", "saved config kept; options ignored".yellow());
            }
            for bar in &hud.config().bars {
                println!("  {} max {} ({})", bar.name.bold(), bar.max, bar.kind);
            }
        }
    }
    Ok(())
}

fn gauge(progress: f64) -> String {
    const WIDTH: usize = 10;
    let filled = ((progress.clamp(0.0, 1.0)) * WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

fn print_view(object: &str, view: &HudView) {
    println!("HUD {} ({} bars)", object.cyan().bold(), view.bars.len());
    for bar in &view.bars {
        println!(
            "  {:<12} [{}] {:>4} / {:<4} {} {}",
            bar.name.bold(),
            gauge(bar.progress),
            bar.value,
            bar.max,
            bar.kind,
            bar.color.dimmed()
        );
    }
    for (side, badge) in [("left", &view.left_badge), ("right", &view.right_badge)] {
        if let Some(badge) = badge {
            let url = badge.url.as_deref().unwrap_or("(blank)");
            println!("  {side} badge: {url} {}", badge.color.dimmed());
        }
    }
    if let Some(pointer) = &view.pointer {
        println!(
            "  pointer: {} {} {}",
            pointer.kind,
            pointer.alignment,
            pointer.color.dimmed()
        );
    }
}

fn cmd_show(session: &Session, object: &str) -> anyhow::Result<()> {
    let registry = session.existing(object)?;
    let Some(hud) = registry.get(object) else {
        bail!("HUD for {object} was not registered");
    };
    let view = hud.view();
    match session.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print_view(object, &view),
    }
    Ok(())
}

fn report_json(key: &str, report: &Option<ChunkReport>) -> serde_json::Value {
    match report {
        None => json!({ "key": key, "present": false }),
        Some(report) => json!({
            "key": key,
            "present": true,
            "meta": report.meta,
            "chunk_lengths": report.chunk_lengths,
            "payload_len": report.payload_len(),
            "complete": report.is_complete(),
            "stray_chunks": report.stray_chunks,
        }),
    }
}

fn print_report(key: &str, report: &Option<ChunkReport>) {
    let Some(report) = report else {
        println!("  {} {}", key.bold(), "absent".dimmed());
        return;
    };
    let status = if report.is_complete() {
        "complete".green()
    } else {
        "incomplete".red()
    };
    println!(
        "  {} {} chunks x {} chars, {} chars total, {}",
        key.bold(),
        report.meta.chunks,
        report.meta.size,
        report.payload_len(),
        status
    );
    if let Some(version) = &report.meta.version {
        println!("    version {version}");
    }
    for (index, len) in report.chunk_lengths.iter().enumerate() {
        if len.is_none() {
            println!("    {} chunk {index} missing", "!".red().bold());
        }
    }
    if report.stray_chunks > 0 {
        println!("    {} {} stray chunk entries", "!".yellow().bold(), report.stray_chunks);
    }
}

fn cmd_inspect(session: &Session, object: &str) -> anyhow::Result<()> {
    let registry = session.registry(object, &ConfigOptions::default())?;
    let Some(hud) = registry.get(object) else {
        bail!("HUD for {object} was not registered");
    };
    let reports: [(&str, StoreResult<Option<ChunkReport>>); 2] = [
        (hud.config_record().key(), hud.config_record().inspect()),
        (hud.store_record().key(), hud.store_record().inspect()),
    ];

    match session.format {
        OutputFormat::Json => {
            let mut records = Vec::new();
            for (key, report) in reports {
                records.push(report_json(key, &report?));
            }
            println!("{}", serde_json::to_string_pretty(&json!({ "object": object, "records": records }))?);
        }
        OutputFormat::Text => {
            println!("Records for {}", object.cyan().bold());
            for (key, report) in reports {
                print_report(key, &report?);
            }
        }
    }
    Ok(())
}

fn cmd_badge(session: &Session, args: BadgeArgs) -> anyhow::Result<()> {
    let side = match args.side {
        Side::Left => BadgeSide::Left,
        Side::Right => BadgeSide::Right,
    };
    let mut commands = Vec::new();
    if args.off {
        commands.push(HudCommand::SetBadge { side, url: None });
    } else if let Some(url) = args.url {
        commands.push(HudCommand::SetBadge { side, url: Some(url) });
    }
    if let Some(color) = args.color {
        commands.push(HudCommand::SetBadgeColor { side, color });
    }
    if commands.is_empty() {
        bail!("nothing to change: pass a url, --off or --color");
    }
    session.apply(&args.object, commands)
}

fn cmd_apply(session: &Session, args: ApplyArgs) -> anyhow::Result<()> {
    let commands = args
        .commands
        .iter()
        .map(|raw| serde_json::from_str(raw).with_context(|| format!("invalid command: {raw}")))
        .collect::<anyhow::Result<Vec<HudCommand>>>()?;
    check_committed(&commands)?;
    session.apply(&args.object, commands)
}

/// Fails if an editor edit is not followed by a `commit` in the same batch.
fn check_committed(commands: &[HudCommand]) -> anyhow::Result<()> {
    let Some(last_edit) = commands.iter().rposition(HudCommand::is_deferred) else {
        return Ok(());
    };
    if !commands[last_edit..].contains(&HudCommand::Commit) {
        bail!(
            "`{}` is an editor edit and would be discarded; end the batch with '{{\"op\":\"commit\"}}'",
            commands[last_edit].name()
        );
    }
    Ok(())
}

fn cmd_purge(session: &Session, object: &str) -> anyhow::Result<()> {
    let mut registry = session.registry(object, &ConfigOptions::default())?;
    let removed = registry.purge(object)?;
    match session.format {
        OutputFormat::Json => println!("{}", json!({ "object": object, "removed": removed })),
        OutputFormat::Text => println!("{} Removed {} entries for {}", "✓".green(), removed, object.cyan()),
    }
    Ok(())
}

fn cmd_list(session: &Session) -> anyhow::Result<()> {
    let ids = FileEntryStore::object_ids(&session.file)
        .with_context(|| format!("reading {}", session.file.display()))?;
    match session.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
        OutputFormat::Text if ids.is_empty() => println!("No saved HUDs."),
        OutputFormat::Text => {
            for id in ids {
                println!("{}", id.cyan());
            }
        }
    }
    Ok(())
}
