use clap::Parser;
use itertools::Itertools;
use minimal_multigraph_extension::{
    exact, parser::load_input_file, total_edge_count, Edge, Multigraph,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exact solver for the minimal multigraph extension problem
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input file containing the two graph descriptions
    #[arg(short, long)]
    input: PathBuf,

    /// Number of vertex-distinct embeddings of the pattern required
    #[arg(short = 'n', long)]
    copies: usize,
}

fn print_matrix(graph: &Multigraph) {
    for row in graph.adjacency() {
        println!("  [{}]", row.iter().format(", "));
    }
}

fn print_extension(target: &Multigraph, edges: &[Edge]) {
    let n = target.vertex_count();
    let mut additions = vec![vec![0u8; n]; n];
    for edge in edges {
        additions[edge.source][edge.destination] = edge.count;
    }

    println!("Edges to add:");
    for edge in edges {
        println!(
            "  ({} -> {}): add {} edge(s)",
            edge.source, edge.destination, edge.count
        );
    }
    println!();
    println!("Adjacency matrix of additions:");
    for row in additions {
        println!("  [{}]", row.iter().format(", "));
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    println!("Exact solver for minimal multigraph extension");
    println!("=============================================");
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

    // the search itself does not validate feasibility, so reject here
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
    println!();

    println!("Running exact search...");
    let start = std::time::Instant::now();
    let result = exact::run(args.copies, &pattern, &target);
    let elapsed = start.elapsed();

    println!();
    println!("=============================================");
    println!("OPTIMAL EXTENSION FOUND");
    println!("=============================================");
    println!("Total edges to add: {}", total_edge_count(&result));
    println!("Computation time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    println!();

    if result.is_empty() {
        println!("No extension needed.");
    } else {
        print_extension(&target, &result);
    }

    ExitCode::SUCCESS
}
