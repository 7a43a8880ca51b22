//! A show-control session: save looks, crossfade between them, export and
//! re-import through a file, and restore everything from disk.

use presetter::prelude::*;
use presetter::{Recall, TsvFile};
use std::cell::RefCell;
use std::rc::Rc;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("no temp dir: {e}");
            return;
        }
    };
    let state_path = dir.path().join("presets.json");
    let file_path = dir.path().join("looks").join("sunset.tsv");

    let (live, target) = MemoryContainer::new()
        .with(MemoryParameter::new("Brightness", ParStyle::Float, 0.0).with_bounds(0.0, 1.0))
        .with(MemoryParameter::new("Color", ParStyle::Rgb, vec![1.0, 1.0, 1.0]))
        .with(MemoryParameter::new("Blend", ParStyle::Menu, "over"))
        .with(MemoryParameter::new("Strobe", ParStyle::Toggle, false))
        .into_shared();

    // The parameter table the show is built around
    let table = Rc::new(RefCell::new(Table::with_header()));
    let set_table = |rows: &[(&str, &str)]| {
        let mut t = Table::with_header();
        for (name, value) in rows {
            t.push_row([*name, *value]);
        }
        *table.borrow_mut() = t;
    };

    let settings = PresetterSettings {
        lerp: true,
        lerp_time: 1.5,
        lerp_method: "ease_in_out_sine".into(),
        ..Default::default()
    };

    let clock = ManualClock::new(0.0);
    let ui = MemoryUi::new();
    let mut presetter = Presetter::new(PresetStore::open(JsonFileState::new(&state_path)))
        .with_settings(settings)
        .with_target(target.clone())
        .with_table(table.clone())
        .with_ui(ui.clone())
        .with_clock(clock.clone())
        .with_file(TsvFile::new(&file_path));

    println!("\n🎬 Building looks\n");
    set_table(&[
        ("Brightness", "0.2"),
        ("Color", "[0.1, 0.1, 0.4]"),
        ("Blend", "'add'"),
        ("Strobe", "False"),
    ]);
    presetter.save_preset(Some("night")).ok();

    set_table(&[
        ("Brightness", "0.9"),
        ("Color", "[1.0, 0.6, 0.2]"),
        ("Blend", "'screen'"),
        ("Strobe", "True"),
    ]);
    presetter.save_preset(Some("sunset")).ok();
    presetter.on_file_save().ok();
    println!("   presets: {:?}", presetter.store().preset_names());

    println!("\n🌗 Crossfade to 'night'\n");
    if let Ok(Some(Recall::Lerp(plan))) = presetter.on_preset_menu("night") {
        println!(
            "   {} interpolated, {} applied at the end",
            plan.numeric, plan.deferred
        );
    }
    while presetter.is_lerping() {
        clock.advance(0.25);
        presetter.update();
        let live = live.borrow();
        println!(
            "   {:>4.2}s  Brightness={}  Color={}  Blend={}",
            clock.now(),
            show(live.get("Brightness")),
            show(live.get("Color")),
            show(live.get("Blend")),
        );
    }
    for _ in 0..5 {
        presetter.update();
    }
    println!("   status: {}  menu: {:?}", ui.status(), ui.menu());

    println!("\n🎲 Randomize\n");
    if let Ok(result) = presetter.on_randomize() {
        println!(
            "   {} randomized, {} skipped",
            result.success_count(),
            result.error_count()
        );
    }
    println!("   Brightness={}", show(live.borrow().get("Brightness")));
    println!("   status: {}", ui.status());

    println!("\n📂 Import the exported file\n");
    presetter.settings_mut().lerp = false;
    presetter.on_file_load().ok();
    for _ in 0..5 {
        presetter.update();
    }
    println!("   presets: {:?}", presetter.store().preset_names());
    println!("   active: {:?}", presetter.store().current_preset_name());

    println!("\n💾 Restore from {}\n", state_path.display());
    drop(presetter);
    let restored = Presetter::new(PresetStore::open(JsonFileState::new(&state_path)))
        .with_target(target);
    println!("   presets: {:?}", restored.store().preset_names());
    println!("   status: {}", restored.status_text());
}

fn show(value: Option<ParValue>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
