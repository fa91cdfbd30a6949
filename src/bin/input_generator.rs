use clap::Parser;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Generate random instances for the minimal multigraph extension solvers.
///
/// Output format matches what the solvers expect: a vertex count line
/// followed by that many adjacency rows, for the pattern and then the
/// target. A randomly chosen injective embedding of the pattern is planted
/// into the target: a fraction of its edges is already satisfied, another
/// fraction is forced into deficit, so instances are neither trivial nor
/// hopeless. Edge multiplicities respect the solvers' 8-bit cap.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate random minimal multigraph extension instances"
)]
struct Args {
    /// Number of pattern vertices
    #[arg(long)]
    pattern_size: usize,

    /// Number of target vertices, must be at least the pattern size
    #[arg(long)]
    target_size: usize,

    /// Edge probability in the pattern (self-loops excluded)
    #[arg(long, default_value_t = 0.35)]
    pattern_density: f64,

    /// Edge probability in the target base graph (self-loops excluded)
    #[arg(long, default_value_t = 0.20)]
    target_density: f64,

    /// Probability that a generated edge becomes a multiedge
    #[arg(long, default_value_t = 0.15)]
    multiedge_prob: f64,

    /// Maximum multiplicity of a multiedge, sampled uniformly in [2, max]
    #[arg(long, default_value_t = 4)]
    max_multiedge: u8,

    /// Fraction of planted pattern edges already satisfied in the target
    #[arg(long, default_value_t = 0.40)]
    embed_fraction: f64,

    /// Random seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path
    #[arg(long)]
    output: PathBuf,
}

/// Random multiplicity for one generated edge, >= 1.
fn random_multiplicity(rng: &mut StdRng, multiedge_prob: f64, max_multiedge: u8) -> u8 {
    if max_multiedge < 2 || rng.gen::<f64>() >= multiedge_prob {
        1
    } else {
        rng.gen_range(2..=max_multiedge)
    }
}

/// Random directed multigraph adjacency table without self-loops.
fn generate_graph(
    n: usize,
    density: f64,
    multiedge_prob: f64,
    max_multiedge: u8,
    rng: &mut StdRng,
) -> Vec<Vec<u8>> {
    let mut adj = vec![vec![0u8; n]; n];
    for (i, row) in adj.iter_mut().enumerate() {
        for (j, slot) in row.iter_mut().enumerate() {
            if i != j && rng.gen::<f64>() < density {
                *slot = random_multiplicity(rng, multiedge_prob, max_multiedge);
            }
        }
    }
    adj
}

/// Injective mapping of the pattern's vertices into distinct target
/// vertices, via a partial Fisher-Yates shuffle.
fn random_embedding(pattern_size: usize, target_size: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..target_size).collect();
    for i in (1..target_size).rev() {
        let j = rng.gen_range(0..=i);
        pool.swap(i, j);
    }
    pool.truncate(pattern_size);
    pool
}

/// Plant the embedding: satisfy a fraction of the pattern's edges under the
/// mapping and force the rest below their required multiplicity.
fn plant_embedding(
    pattern: &[Vec<u8>],
    target: &mut [Vec<u8>],
    mapping: &[usize],
    embed_fraction: f64,
    rng: &mut StdRng,
) {
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (i, row) in pattern.iter().enumerate() {
        for (j, &weight) in row.iter().enumerate() {
            if weight > 0 {
                edges.push((i, j));
            }
        }
    }
    for i in (1..edges.len()).rev() {
        let j = rng.gen_range(0..=i);
        edges.swap(i, j);
    }

    let satisfied = ((edges.len() as f64) * embed_fraction).round() as usize;
    for (rank, &(i, j)) in edges.iter().enumerate() {
        let required = pattern[i][j];
        let slot = &mut target[mapping[i]][mapping[j]];
        if rank < satisfied {
            *slot = (*slot).max(required);
        } else if *slot >= required {
            // force a deficit on the remaining planted edges
            *slot = rng.gen_range(0..required);
        }
    }
}

fn write_instance(
    path: &PathBuf,
    pattern: &[Vec<u8>],
    target: &[Vec<u8>],
) -> io::Result<()> {
    let mut writer = File::create(path)?;
    writeln!(writer, "{}", pattern.len())?;
    for row in pattern {
        writeln!(writer, "{}", row.iter().format(" "))?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", target.len())?;
    for row in target {
        writeln!(writer, "{}", row.iter().format(" "))?;
    }
    writer.flush()
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if args.pattern_size == 0 || args.target_size < args.pattern_size {
        eprintln!("Error: need 0 < pattern_size <= target_size");
        std::process::exit(1);
    }
    for (name, value) in [
        ("pattern_density", args.pattern_density),
        ("target_density", args.target_density),
        ("multiedge_prob", args.multiedge_prob),
        ("embed_fraction", args.embed_fraction),
    ] {
        if !(0.0..=1.0).contains(&value) {
            eprintln!("Error: {} must be in [0, 1]", name);
            std::process::exit(1);
        }
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let pattern = generate_graph(
        args.pattern_size,
        args.pattern_density,
        args.multiedge_prob,
        args.max_multiedge,
        &mut rng,
    );
    let mut target = generate_graph(
        args.target_size,
        args.target_density,
        args.multiedge_prob,
        args.max_multiedge,
        &mut rng,
    );

    let mapping = random_embedding(args.pattern_size, args.target_size, &mut rng);
    plant_embedding(
        &pattern,
        &mut target,
        &mapping,
        args.embed_fraction,
        &mut rng,
    );

    write_instance(&args.output, &pattern, &target)?;

    let pattern_edges: usize = pattern.iter().flatten().map(|&w| w as usize).sum();
    let target_edges: usize = target.iter().flatten().map(|&w| w as usize).sum();
    println!("Generated instance:");
    println!("  pattern: {} vertices, {} edges", args.pattern_size, pattern_edges);
    println!("  target:  {} vertices, {} edges", args.target_size, target_edges);
    println!("  planted mapping: {:?}", mapping);
    println!("  seed: {}", seed);
    println!("  written to {:?}", args.output);

    Ok(())
}
