use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use matatu_lib::{
    load_network, plan_route, plan_tour, BatchDispatcher, CapacityModel, CongestionAdvisor,
    Heuristic, Network, NodeId, Position, RerouteRequest, RouteAlgorithm, RouteRequest,
    DEFAULT_WORKERS,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Transport network routing queries")]
struct Cli {
    /// Path to the network dataset (JSON).
    #[arg(long)]
    network: PathBuf,

    /// Emit machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a point-to-point route.
    Route {
        /// Starting node id.
        #[arg(long)]
        from: NodeId,
        /// Destination node id.
        #[arg(long)]
        to: NodeId,
        /// Routing algorithm: dijkstra or a-star.
        #[arg(long, default_value = "a-star")]
        algorithm: RouteAlgorithm,
        /// Guide A* with a travel-time heuristic assuming this maximum speed.
        #[arg(long)]
        max_speed_kmh: Option<f64>,
    },
    /// Sequence multiple stops with the greedy nearest-neighbour heuristic.
    Tour {
        /// Stop ids; the first one is the starting point.
        #[arg(required = true)]
        stops: Vec<NodeId>,
    },
    /// Run independent path queries concurrently.
    Batch {
        /// Query as "start,goal"; repeat for each pair.
        #[arg(long = "pair", value_parser = parse_pair, required = true)]
        pairs: Vec<(NodeId, NodeId)>,
        /// Worker pool size.
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Suggest alternative routes around a congested edge.
    Reroute {
        /// One endpoint of the congested edge.
        #[arg(long)]
        from: NodeId,
        /// The other endpoint of the congested edge.
        #[arg(long)]
        to: NodeId,
        /// Vehicles per hour to redirect.
        #[arg(long)]
        vehicles: u32,
        /// Split the redirected vehicles evenly across the alternatives
        /// instead of assuming a fixed per-route capacity.
        #[arg(long)]
        shared_capacity: bool,
    },
    /// Snap a coordinate to the closest network node.
    Nearest {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let (network, names) = load_network(&cli.network)
        .with_context(|| format!("failed to load network from {}", cli.network.display()))?;

    match cli.command {
        Command::Route {
            from,
            to,
            algorithm,
            max_speed_kmh,
        } => handle_route(&network, &names, cli.json, from, to, algorithm, max_speed_kmh),
        Command::Tour { stops } => handle_tour(&network, &names, cli.json, &stops),
        Command::Batch { pairs, workers } => handle_batch(&network, cli.json, &pairs, workers),
        Command::Reroute {
            from,
            to,
            vehicles,
            shared_capacity,
        } => handle_reroute(&network, cli.json, from, to, vehicles, shared_capacity),
        Command::Nearest { lat, lon } => handle_nearest(&network, &names, cli.json, lat, lon),
    }
}

fn handle_route(
    network: &Network,
    names: &HashMap<NodeId, String>,
    json: bool,
    from: NodeId,
    to: NodeId,
    algorithm: RouteAlgorithm,
    max_speed_kmh: Option<f64>,
) -> Result<()> {
    let heuristic = match max_speed_kmh {
        Some(max_speed_kmh) => Heuristic::TravelTime { max_speed_kmh },
        None => Heuristic::Zero,
    };
    let request = RouteRequest {
        start: from,
        goal: to,
        algorithm,
        heuristic,
    };
    let plan = plan_route(network, &request);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.is_unreachable() {
        println!("No route between {} and {}", label(names, from), label(names, to));
        return Ok(());
    }

    println!("Route ({}), total travel time {}:", plan.algorithm, plan.cost);
    for node in &plan.nodes {
        println!("- {}", label(names, *node));
    }
    Ok(())
}

fn handle_tour(
    network: &Network,
    names: &HashMap<NodeId, String>,
    json: bool,
    stops: &[NodeId],
) -> Result<()> {
    let plan = plan_tour(network, stops).context("tour planning failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Tour, total travel time {}:", plan.total_cost);
    for stop in &plan.order {
        println!("- {}", label(names, *stop));
    }
    Ok(())
}

fn handle_batch(
    network: &Network,
    json: bool,
    pairs: &[(NodeId, NodeId)],
    workers: usize,
) -> Result<()> {
    let dispatcher = BatchDispatcher::new(workers).context("failed to build worker pool")?;
    let routes = dispatcher
        .run(network, pairs)
        .context("batch dispatch failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }

    for (route, (start, goal)) in routes.iter().zip(pairs) {
        if route.is_unreachable() {
            println!("{start} -> {goal}: unreachable");
        } else {
            println!(
                "{start} -> {goal}: cost {} over {} hops via {:?}",
                route.cost,
                route.hop_count(),
                route.nodes
            );
        }
    }
    Ok(())
}

fn handle_reroute(
    network: &Network,
    json: bool,
    from: NodeId,
    to: NodeId,
    vehicles: u32,
    shared_capacity: bool,
) -> Result<()> {
    let mut advisor = CongestionAdvisor::new(network);
    if shared_capacity {
        advisor = advisor.with_capacity_model(CapacityModel::Shared);
    }
    let alternatives = advisor
        .alternatives(&RerouteRequest {
            edge: (from, to),
            vehicles,
        })
        .context("reroute computation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&alternatives)?);
        return Ok(());
    }

    if alternatives.is_empty() {
        println!("No alternatives around edge {from} -> {to}");
        return Ok(());
    }

    for (index, alternative) in alternatives.iter().enumerate() {
        println!(
            "{}. cost {}, capacity {} veh/h, via {:?}",
            index + 1,
            alternative.route.cost,
            alternative.capacity,
            alternative.route.nodes
        );
    }
    Ok(())
}

fn handle_nearest(
    network: &Network,
    names: &HashMap<NodeId, String>,
    json: bool,
    lat: f64,
    lon: f64,
) -> Result<()> {
    let nearest = network.nearest_node(Position::new(lat, lon));

    if json {
        println!("{}", serde_json::to_string_pretty(&nearest)?);
        return Ok(());
    }

    match nearest {
        Some(id) => println!("Nearest node: {}", label(names, id)),
        None => println!("Network has no positioned nodes"),
    }
    Ok(())
}

fn label(names: &HashMap<NodeId, String>, id: NodeId) -> String {
    match names.get(&id) {
        Some(name) => format!("{name} ({id})"),
        None => id.to_string(),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn parse_pair(value: &str) -> Result<(NodeId, NodeId), String> {
    let (start, goal) = value
        .split_once(',')
        .ok_or_else(|| format!("expected 'start,goal', got '{value}'"))?;
    let start = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid node id '{start}'"))?;
    let goal = goal
        .trim()
        .parse()
        .map_err(|_| format!("invalid node id '{goal}'"))?;
    Ok((start, goal))
}
