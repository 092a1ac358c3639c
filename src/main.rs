//! qnet - Queueing-Network Performance Analyzer
//!
//! Evaluates a network description and prints the steady-state and
//! path-integrated characteristics.
//!
//! # Usage
//!
//! ```bash
//! qnet network.qn --start-node 0 --target-node 4 --density
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qnet_core::{config, NetworkModel, Result};

/// Queueing-network performance analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network description file
    #[arg(value_name = "NETWORK_FILE")]
    network_file: PathBuf,

    /// Node where evaluated paths begin
    #[arg(short, long)]
    start_node: usize,

    /// Node where evaluated paths end
    #[arg(short, long)]
    target_node: usize,

    /// Print transit-time density samples for the shortest and longest path
    #[arg(long)]
    density: bool,

    /// Upper bound of the density time grid
    #[arg(long, default_value_t = 0.003)]
    density_end: f64,

    /// Step of the density time grid
    #[arg(long, default_value_t = 0.00001)]
    density_step: f64,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut rng = rand::thread_rng();
    let spec = config::load(&args.network_file, args.start_node, args.target_node, &mut rng)?;
    let model = NetworkModel::evaluate(spec)?;

    print_parameters(&model);
    print_stationary(&model);
    print_paths(&model);
    print_integrated(&model);

    if args.density {
        print_density(&model, args.density_end, args.density_step)?;
    }

    Ok(())
}

fn print_parameters(model: &NetworkModel) {
    println!("network '{}'", model.spec.name);
    println!("  nodes: {}, classes: {}", model.spec.nodes(), model.spec.classes());
    println!("  lambda0:  {}", model.lambda0);
    for class in 0..model.spec.classes() {
        println!("  class {class}:");
        println!("    e:          {}", model.e[class]);
        println!("    lambda_bar: {}", model.lambda_bar[class]);
        println!("    ro_bar:     {}", model.ro_bar[class]);
    }
    println!("  ro_total: {}", model.ro_total);
}

fn print_stationary(model: &NetworkModel) {
    println!("stationary characteristics");
    println!("  Ws: {}", model.ws);
    for class in 0..model.spec.classes() {
        println!("  class {class}:");
        println!("    Us: {}", model.us[class]);
        println!("    Ls: {}", model.ls[class]);
        println!("    Ns: {}", model.ns[class]);
    }
}

fn print_paths(model: &NetworkModel) {
    println!(
        "paths {} -> {}: {} found",
        model.spec.start_node,
        model.spec.target_node,
        model.paths.len()
    );
    for (path, probability) in model.paths.iter().zip(&model.transition_probabilities) {
        let rendered: Vec<String> = path.iter().map(usize::to_string).collect();
        println!("  {}  p = {probability:.6}", rendered.join(" -> "));
    }
}

fn print_integrated(model: &NetworkModel) {
    println!("integrated characteristics");
    println!("  Wi: {:.6}", model.wi);
    for class in 0..model.spec.classes() {
        println!(
            "  class {class}: Ui = {:.6}, Li = {:.6}, Ni = {:.6}",
            model.ui[class], model.li[class], model.ni[class]
        );
    }
}

fn print_density(model: &NetworkModel, end: f64, step: f64) -> Result<()> {
    let Some(shortest) = model.paths.first() else {
        println!("no paths, no density to sample");
        return Ok(());
    };
    let longest = model.paths.last().expect("paths is non-empty");

    let grid: Vec<f64> = std::iter::successors(Some(0.0), |t| Some(t + step))
        .take_while(|&t| t <= end)
        .collect();

    print_density_samples(model, shortest, &grid)?;
    if longest.len() != shortest.len() {
        print_density_samples(model, longest, &grid)?;
    }
    Ok(())
}

fn print_density_samples(model: &NetworkModel, path: &[usize], grid: &[f64]) -> Result<()> {
    let samples = model.transit_time_density(path, 0, grid)?;
    let rendered: Vec<String> = path.iter().map(usize::to_string).collect();
    println!("transit-time density, path {}", rendered.join(" -> "));
    for (t, f) in grid.iter().zip(&samples) {
        println!("  {t:.6}\t{f:.6}");
    }
    Ok(())
}
