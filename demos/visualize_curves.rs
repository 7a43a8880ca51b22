//! Visualization example - ASCII art plots of easing curves

use presetter::Easing;

const WIDTH: usize = 60;
const HEIGHT: usize = 20;

// Vertical range, wide enough for back and elastic overshoot
const LOW: f64 = -0.25;
const HIGH: f64 = 1.25;

fn main() {
    println!("\n🎨 Easing Curves\n");

    // Pass curve keys on the command line, or get a representative set
    let args: Vec<String> = std::env::args().skip(1).collect();
    let curves: Vec<Easing> = if args.is_empty() {
        vec![
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseInOutCubic,
            Easing::EaseOutBack,
            Easing::EaseOutElastic,
            Easing::EaseOutBounce,
        ]
    } else {
        args.iter().map(|key| Easing::from_name_or_linear(key)).collect()
    };

    for easing in curves {
        plot_curve(easing);
    }

    println!("Available keys:");
    for easing in Easing::all() {
        println!("  {:<22} {}", easing.name(), easing.label());
    }
    println!("\n💡 Run: cargo run --example visualize_curves -- ease_in_expo");
}

fn row_for(value: f64) -> usize {
    let normalized = ((value - LOW) / (HIGH - LOW)).clamp(0.0, 1.0);
    HEIGHT - 2 - (normalized * (HEIGHT - 2) as f64).round() as usize
}

fn plot_curve(easing: Easing) {
    println!("{easing}");

    let mut grid = vec![vec![' '; WIDTH]; HEIGHT];

    // Draw axes
    for row in grid.iter_mut() {
        row[0] = '│';
    }
    for x in 0..WIDTH {
        grid[HEIGHT - 1][x] = '─';
    }
    grid[HEIGHT - 1][0] = '└';

    // Guides for 0 and 1
    for y in [row_for(0.0), row_for(1.0)] {
        for x in 1..WIDTH {
            grid[y][x] = '┈';
        }
    }

    let samples = WIDTH - 3;
    let mut prev_y = row_for(0.0);

    for i in 0..=samples {
        let t = i as f64 / samples as f64;
        let x = i + 2;
        let y = row_for(easing.apply(t));

        if x < WIDTH {
            // Connect with previous point
            for draw_y in y.min(prev_y)..=y.max(prev_y) {
                grid[draw_y][x] = '│';
            }
            grid[y][x] = '●';
            prev_y = y;
        }
    }

    for row in grid {
        println!("  {}", row.into_iter().collect::<String>());
    }

    print!("  ");
    for i in [0, 25, 50, 75, 100] {
        let t = f64::from(i) / 100.0;
        print!("{}%={:.2}  ", i, easing.apply(t));
    }
    println!("\n");
}
