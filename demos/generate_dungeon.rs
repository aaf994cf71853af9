//! Example: Generate a dungeon step by step
//!
//! Prints the grid after every generation stage for both connectivity
//! strategies. Set `RUST_LOG=debug` to see per-step timings.

use rust_maze_dungeon::*;

fn print_dungeon(dungeon: &Dungeon) {
    for (stage, grid) in dungeon.stages().iter() {
        println!(
            "-- {} ({} open cells, {} components)",
            stage,
            grid.open_cell_count(),
            grid.component_count()
        );
        println!("{}", grid);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);

    println!("Maze Dungeon Example");
    println!("====================\n");

    let config = DungeonConfigBuilder::new()
        .seed(seed)
        .size(DungeonSize::Small)
        .windingness(20)?
        .extra_connections(20)
        .build()?;

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Size: {} ({}x{})", config.size.name(), config.width(), config.height());
    println!("  Windingness: {}", config.windingness);
    println!("  Extra connections: 1 in {}", config.extra_connections);
    println!();

    let dungeon = Dungeon::generate(config)?;
    print_dungeon(&dungeon);

    let summary = dungeon.summary();
    println!("Rooms: {}", dungeon.rooms().len());
    println!("Maze regions: {}", summary.maze_regions);
    println!(
        "Connectors: {} (+{} extra)",
        summary.carved_connectors.len(),
        summary.extra_connectors.len()
    );
    println!("Dead ends removed: {}", summary.dead_ends_removed);

    #[cfg(feature = "spatial-index")]
    if let Some(room) = dungeon.nearest_room(geometry::Point::new(0.0, 0.0)) {
        println!("Room nearest the top-left corner: {:?}", dungeon.rooms()[room]);
    }

    println!("\nDelaunay Corridor Example");
    println!("=========================\n");

    let config = DungeonConfigBuilder::new()
        .seed(seed)
        .size(DungeonSize::Small)
        .strategy(ConnectorStrategy::Delaunay)
        .room_policy(RoomPolicy::scattered())?
        .build()?;

    let dungeon = Dungeon::generate(config)?;
    print_dungeon(&dungeon);
    println!("Room links: {:?}", dungeon.summary().room_links);

    println!("\nTile codes (first rows):");
    for row in dungeon.tiles().rows().iter().take(5) {
        let line: Vec<String> = row.iter().map(|code| format!("{:2}", code)).collect();
        println!("{}", line.join(" "));
    }

    Ok(())
}
