//! Minimal example showing the essential features

use presetter::prelude::*;

fn main() {
    println!("🎛  Presetter - Essential Features\n");

    let (live, target) = MemoryContainer::new()
        .with(MemoryParameter::new("Tx", ParStyle::Float, 0.0))
        .with(MemoryParameter::new("Count", ParStyle::Int, 0_i64))
        .with(MemoryParameter::new("Color", ParStyle::Rgb, vec![0.0, 0.0, 0.0]))
        .with(MemoryParameter::new("Mode", ParStyle::Menu, "add"))
        .into_shared();

    let mut table = Table::with_header();
    table.push_row(["Tx", "10.0"]);
    table.push_row(["Count", "8"]);
    table.push_row(["Color", "[1.0, 0.5, 0.0]"]);
    table.push_row(["Mode", "multiply"]);

    let clock = ManualClock::new(0.0);
    let ui = MemoryUi::new();
    let mut presetter = Presetter::new(PresetStore::in_memory())
        .with_target(target)
        .with_table(table)
        .with_ui(ui.clone())
        .with_clock(clock.clone());

    // 1. Save
    println!("1️⃣  Save\n");
    let name = match presetter.save_preset(None) {
        Ok(name) => name,
        Err(e) => {
            eprintln!("   save failed: {e}");
            return;
        }
    };
    println!("   Saved '{}', status: {}\n", name, ui.status());

    // 2. Lerp recall
    println!("2️⃣  Lerp Over 2 Seconds\n");
    presetter.settings_mut().lerp_method = "ease_in_out_cubic".into();
    if let Err(e) = presetter.load_preset_with_lerp(&name, 2.0) {
        eprintln!("   lerp failed: {e}");
        return;
    }
    for step in 0..=4 {
        clock.set(f64::from(step) * 0.5);
        presetter.update();
        let live = live.borrow();
        println!(
            "   t={:.1}s  Tx={}  Count={}  Color={}  Mode={}",
            clock.now(),
            show(live.get("Tx")),
            show(live.get("Count")),
            show(live.get("Color")),
            show(live.get("Mode")),
        );
    }

    // 3. Settle
    println!("\n3️⃣  Status After Settle\n");
    presetter.mark_changed();
    println!("   Edited:  {}", ui.status());
    presetter.load_preset(&name).ok();
    presetter.update();
    presetter.update();
    println!("   Settled: {}", ui.status());
}

fn show(value: Option<ParValue>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
