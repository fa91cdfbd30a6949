use clap::Parser;
use itertools::Itertools;
use minimal_multigraph_extension::{
    approx,
    heuristic::HeuristicType,
    parser::load_input_file,
    total_edge_count, Edge, Multigraph,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Which approximation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Seed,
    Assignment,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seed" => Ok(Method::Seed),
            "assignment" | "hungarian" => Ok(Method::Assignment),
            _ => Err(format!("unknown method: {}. Use 'seed' or 'assignment'", s)),
        }
    }
}

/// Approximation solver for the minimal multigraph extension problem
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input file containing the two graph descriptions
    #[arg(short, long)]
    input: PathBuf,

    /// Number of vertex-distinct embeddings of the pattern required
    #[arg(short = 'n', long)]
    copies: usize,

    /// Approximation to use: 'seed' or 'assignment'
    #[arg(short, long, default_value = "assignment")]
    method: Method,

    /// Similarity heuristic for the assignment method: degree, directed,
    /// directed_ignore, histogram, structure or greedy
    #[arg(long, default_value = "degree")]
    heuristic: HeuristicType,
}

fn print_matrix(graph: &Multigraph) {
    for row in graph.adjacency() {
        println!("  [{}]", row.iter().format(", "));
    }
}

fn print_edges(edges: &[Edge]) {
    if edges.is_empty() {
        println!("  (no edges needed - the target already hosts the requested copies)");
        return;
    }
    for edge in edges {
        println!(
            "  ({} -> {}): add {} edge(s)",
            edge.source, edge.destination, edge.count
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    println!("Approximation solver for minimal multigraph extension");
    println!("=====================================================");
    println!();

    if args.copies == 0 {
        eprintln!("Error: the number of copies must be at least 1");
        return ExitCode::FAILURE;
    }

    let (pattern, target) = match load_input_file(&args.input) {
        Ok(graphs) => graphs,
        Err(e) => {
            eprintln!("Error loading input file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if target.combinations_count(pattern.vertex_count()) < args.copies as u64 {
        eprintln!(
            "Error: the target graph cannot host {} vertex-distinct copies of the pattern",
            args.copies
        );
        return ExitCode::FAILURE;
    }

    println!(
        "Pattern graph: {} vertices, {} edges",
        pattern.vertex_count(),
        pattern.edge_count()
    );
    print_matrix(&pattern);
    println!();
    println!(
        "Target graph: {} vertices, {} edges",
        target.vertex_count(),
        target.edge_count()
    );
    print_matrix(&target);
    println!();
    println!("Required copies: {}", args.copies);
    match args.method {
        Method::Seed => println!("Method: greedy seed growth"),
        Method::Assignment => println!("Method: assignment ({} heuristic)", args.heuristic),
    }
    println!();

    let start = std::time::Instant::now();
    let result = match args.method {
        Method::Seed => approx::run_greedy_seed(args.copies, &pattern, &target),
        Method::Assignment => {
            approx::run_assignment(args.copies, &pattern, &target, args.heuristic)
        }
    };
    let elapsed = start.elapsed();

    println!("=====================================================");
    println!("APPROXIMATE EXTENSION FOUND");
    println!("=====================================================");
    println!("Total edges to add: {}", total_edge_count(&result));
    println!("Computation time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    println!();
    println!("Edges to add:");
    print_edges(&result);

    ExitCode::SUCCESS
}
