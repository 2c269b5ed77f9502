// Demonstration: build a grid from inline resource data, activate policies,
// and step the simulation while printing snapshots.
//
// Run from the repo root:
//   cargo run --example sim_demo -- --ticks 12
//
// With checkpoint files (.json / .bin) in a directory:
//   cargo run --example sim_demo -- --models path/to/checkpoints --ticks 12

use std::sync::Arc;

use gridrover::policy::{
    Action, ConstantPolicy, DirectoryProvider, PolicyProvider, RandomPolicy, StaticProvider,
};
use gridrover::{layout, SimConfig, Simulation};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let ticks: usize = arg_value(&args, "--ticks")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let model_dir = arg_value(&args, "--models");

    let data = r#"{
        "Archive": {"x_coordinate": 0.12, "y_coordinate": 0.34},
        "Beacon": {"x_coordinate": 0.55, "y_coordinate": 0.21},
        "Cache": {"x_coordinate": 0.55, "y_coordinate": 0.21},
        "Depot": {"x_coordinate": 0.80, "y_coordinate": 0.67}
    }"#;
    let points = match layout::parse_resource_points(data) {
        Ok(points) => points,
        Err(err) => {
            eprintln!("resource data error: {err}");
            std::process::exit(1);
        }
    };

    let config = SimConfig {
        scale: 20,
        padding: 4,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(points, &config);

    let grid = sim.grid();
    println!(
        "grid {}x{}, {} resources",
        grid.grid_size_x,
        grid.grid_size_y,
        grid.resources.len()
    );
    for (cell, name) in &grid.resource_map {
        println!("  [{cell}] {name}");
    }

    // Either resolve trained checkpoints from disk or fall back to the
    // baseline policies.
    let (provider, names): (Box<dyn PolicyProvider>, Vec<String>) = match model_dir {
        Some(dir) => {
            let provider =
                DirectoryProvider::new(dir, sim.layout().state_size(), config.hidden_dim);
            let names = provider.list();
            println!("checkpoints under {dir}: {names:?}");
            (Box::new(provider), names)
        }
        None => {
            let mut provider = StaticProvider::new();
            provider.insert("up", Arc::new(ConstantPolicy::new(Action::Up)));
            provider.insert("right", Arc::new(ConstantPolicy::new(Action::Right)));
            provider.insert("random", Arc::new(RandomPolicy));
            let names = vec!["up".into(), "right".into(), "random".into()];
            (Box::new(provider), names)
        }
    };

    let snap = sim.activate(&names, provider.as_ref());
    println!("active models: {:?}", snap.active_models);

    for tick in 1..=ticks {
        let snap = sim.step();
        println!("-- tick {tick}");
        for (name, agent) in &snap.agents {
            println!(
                "  {name:>8}: pos {} reward {} path {}",
                agent.position,
                agent.reward,
                agent.path.len()
            );
        }
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
