//! Airdrop Merkle CLI - build airdrop trees and check claims
//!
//! This tool provides commands for:
//! - Building a tree from an airdrop list and writing per-address proofs
//! - Extracting a single inclusion proof from a saved tree
//! - Verifying a claim against a published root
//! - Inspecting a saved tree
//! - Writing a sample airdrop list
//!
//! # Hash Primitives
//!
//! - `rescue`: Rescue-Prime over Goldilocks (default)
//! - `sha256`: SHA-256
//! - `keccak256`: Keccak-256

mod config;
mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use airdrop_merkle_primitives::{Address, Hash256, HashKind, Record, Uint256};
use airdrop_merkle_tree::{
    proof_bundles, read_proof, read_tree, verify, write_proof, write_tree, MerkleTree,
};

use crate::config::BuildConfig;

/// Hash primitive for CLI
#[derive(Debug, Clone, Copy, ValueEnum)]
enum HashType {
    /// Rescue-Prime over the Goldilocks field
    Rescue,
    /// SHA-256
    Sha256,
    /// Keccak-256
    Keccak256,
}

impl From<HashType> for HashKind {
    fn from(value: HashType) -> Self {
        match value {
            HashType::Rescue => HashKind::Rescue,
            HashType::Sha256 => HashKind::Sha256,
            HashType::Keccak256 => HashKind::Keccak256,
        }
    }
}

/// Airdrop Merkle - commitments and inclusion proofs for token airdrops
#[derive(Parser)]
#[command(name = "airdrop-merkle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build airdrop Merkle trees and verify claims", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a tree from an airdrop list and write proofs for every address
    Build {
        /// Airdrop list: JSON array of [address, amount, data]
        #[arg(short, long)]
        input: PathBuf,

        /// Hash primitive (overrides the config file)
        #[arg(long, value_enum)]
        hash: Option<HashType>,

        /// Output file for the tree
        #[arg(long, default_value = "merkle_tree.json")]
        tree_out: PathBuf,

        /// Output file for the per-address proofs
        #[arg(long, default_value = "proofs.json")]
        proofs_out: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verify every generated proof before writing
        #[arg(long)]
        check: bool,
    },

    /// Print the inclusion proof for one leaf of a saved tree
    Prove {
        /// Path to the tree file
        #[arg(short, long)]
        tree: PathBuf,

        /// Leaf index
        #[arg(short, long)]
        index: usize,

        /// Output file for the proof (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a claim against a published root
    Verify {
        /// Published root (hex)
        #[arg(short, long)]
        root: String,

        /// Claimant address (hex)
        #[arg(short, long)]
        address: String,

        /// Claimed amount (decimal or 0x hex)
        #[arg(long)]
        amount: String,

        /// Auxiliary data (decimal or 0x hex)
        #[arg(short, long, default_value = "0")]
        data: String,

        /// Leaf index of the claim
        #[arg(short, long)]
        index: usize,

        /// Path to the proof file
        #[arg(short = 'f', long)]
        proof: PathBuf,

        /// Expected hash primitive (default: the proof's own)
        #[arg(long, value_enum)]
        hash: Option<HashType>,
    },

    /// Inspect a saved tree
    Inspect {
        /// Path to the tree file
        #[arg(short, long)]
        tree: PathBuf,

        /// Recompute every internal node
        #[arg(long)]
        full: bool,
    },

    /// Write the sample four-record airdrop list
    Sample {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            hash,
            tree_out,
            proofs_out,
            config,
            check,
        } => build(
            &input,
            hash,
            &tree_out,
            &proofs_out,
            config.as_deref(),
            check,
        ),

        Commands::Prove {
            tree,
            index,
            output,
        } => prove(&tree, index, output.as_deref()),

        Commands::Verify {
            root,
            address,
            amount,
            data,
            index,
            proof,
            hash,
        } => {
            let valid = verify_claim(&root, &address, &amount, &data, index, &proof, hash)?;
            if valid {
                println!("VALID");
                Ok(())
            } else {
                println!("INVALID");
                std::process::exit(1);
            }
        }

        Commands::Inspect { tree, full } => inspect(&tree, full),

        Commands::Sample { output } => sample(output.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(
    input_path: &Path,
    hash: Option<HashType>,
    tree_path: &Path,
    proofs_path: &Path,
    config_path: Option<&Path>,
    check: bool,
) -> Result<()> {
    let config = BuildConfig::load(config_path)?.with_hash_kind(hash.map(HashKind::from));

    let contents = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read airdrop list: {}", input_path.display()))?;
    let records = input::parse_records(&contents)
        .with_context(|| format!("Invalid airdrop list: {}", input_path.display()))?;

    eprintln!("Building tree...");
    eprintln!("  Records: {}", records.len());
    eprintln!("  Hash: {}", config.tree.hash_kind);

    let start = Instant::now();
    let tree = MerkleTree::from_records_with_options(&records, &config.tree)?;
    let bundles = proof_bundles(&tree)?;
    let elapsed = start.elapsed();

    info!(
        leaves = tree.leaf_count(),
        depth = tree.depth(),
        bundles = bundles.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "tree built"
    );
    eprintln!("Tree built in {:?}", elapsed);
    eprintln!("  Depth: {}", tree.depth());

    if check {
        let root = tree.root();
        for (address, bundle) in &bundles {
            let valid = bundle
                .verify(&root, *address, tree.hash_kind())
                .with_context(|| format!("Proof for {} is malformed", address))?;
            if !valid {
                anyhow::bail!("Proof for {} does not reproduce the root", address);
            }
        }
        eprintln!("  Checked {} proofs", bundles.len());
    }

    let mut writer = BufWriter::new(
        File::create(tree_path)
            .with_context(|| format!("Failed to create tree file: {}", tree_path.display()))?,
    );
    write_tree(&mut writer, &tree)?;
    writer.flush()?;
    eprintln!("Tree written to: {}", tree_path.display());

    let proofs_json = serde_json::to_string_pretty(&bundles)?;
    fs::write(proofs_path, proofs_json + "\n")
        .with_context(|| format!("Failed to write proofs file: {}", proofs_path.display()))?;
    eprintln!("Proofs written to: {}", proofs_path.display());

    println!("{}", tree.root());
    Ok(())
}

fn load_tree(path: &Path) -> Result<MerkleTree> {
    let file =
        File::open(path).with_context(|| format!("Failed to open tree file: {}", path.display()))?;
    let tree = read_tree(&mut BufReader::new(file))
        .with_context(|| format!("Invalid tree file: {}", path.display()))?;
    debug!(path = %path.display(), root = %tree.root(), "loaded tree");
    Ok(tree)
}

fn prove(tree_path: &Path, index: usize, output_path: Option<&Path>) -> Result<()> {
    let tree = load_tree(tree_path)?;
    let proof = tree.prove(index)?;

    if let Some(path) = output_path {
        let mut writer = BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create proof file: {}", path.display()))?,
        );
        write_proof(&mut writer, &proof)?;
        writer.flush()?;
        eprintln!("Proof written to: {}", path.display());
    } else {
        println!("{}", proof.to_json()?);
    }

    Ok(())
}

fn verify_claim(
    root: &str,
    address: &str,
    amount: &str,
    data: &str,
    index: usize,
    proof_path: &Path,
    hash: Option<HashType>,
) -> Result<bool> {
    let root = Hash256::from_hex(root).with_context(|| format!("Invalid root: {}", root))?;
    let record = Record {
        address: Address::parse(address)?,
        amount: Uint256::parse_field("amount", amount)?,
        data: Uint256::parse_field("data", data)?,
    };

    let file = File::open(proof_path)
        .with_context(|| format!("Failed to open proof file: {}", proof_path.display()))?;
    let proof = read_proof(&mut BufReader::new(file))
        .with_context(|| format!("Invalid proof file: {}", proof_path.display()))?;
    let hash_kind = hash.map(HashKind::from).unwrap_or(proof.hash_kind);

    eprintln!("Verifying claim...");
    eprintln!("  Address: {}", record.address);
    eprintln!("  Amount: {}", record.amount);
    eprintln!("  Index: {}", index);
    eprintln!("  Hash: {}", hash_kind);

    let valid = verify(&root, &record, index, &proof, hash_kind)?;
    Ok(valid)
}

fn inspect(tree_path: &Path, full: bool) -> Result<()> {
    let tree = if full {
        let file = File::open(tree_path)
            .with_context(|| format!("Failed to open tree file: {}", tree_path.display()))?;
        let dump = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid tree file: {}", tree_path.display()))?;
        MerkleTree::load_verified(dump)?
    } else {
        load_tree(tree_path)?
    };

    println!("Tree Inspection:");
    println!("  Root: {}", tree.root());
    println!("  Hash: {}", tree.hash_kind());
    println!("  Leaves: {}", tree.leaf_count());
    println!("  Depth: {}", tree.depth());
    println!(
        "  Records: {}",
        if tree.records().is_some() {
            "present"
        } else {
            "absent"
        }
    );
    if full {
        println!("  Internal nodes: verified");
    }

    Ok(())
}

fn sample(output_path: Option<&Path>) -> Result<()> {
    let json = input::sample_json()?;

    if let Some(path) = output_path {
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        eprintln!("Sample airdrop written to: {}", path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdrop_merkle_tree::ProofBundles;

    fn build_sample(dir: &Path, hash: HashType) -> (PathBuf, PathBuf) {
        let input = dir.join("airdrop.json");
        sample(Some(input.as_path())).unwrap();
        let tree = dir.join("merkle_tree.json");
        let proofs = dir.join("proofs.json");
        build(&input, Some(hash), &tree, &proofs, None, true).unwrap();
        (tree, proofs)
    }

    #[test]
    fn build_writes_tree_and_proofs() {
        let dir = tempfile::tempdir().unwrap();
        let (tree_path, proofs_path) = build_sample(dir.path(), HashType::Sha256);

        let tree = load_tree(&tree_path).unwrap();
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.hash_kind(), HashKind::Sha256);

        let bundles: ProofBundles =
            serde_json::from_str(&fs::read_to_string(proofs_path).unwrap()).unwrap();
        assert_eq!(bundles.len(), 4);
        for (address, bundle) in &bundles {
            assert!(bundle
                .verify(&tree.root(), *address, HashKind::Sha256)
                .unwrap());
        }
    }

    #[test]
    fn prove_then_verify_claim() {
        let dir = tempfile::tempdir().unwrap();
        let (tree_path, _) = build_sample(dir.path(), HashType::Rescue);
        let proof_path = dir.path().join("proof.json");
        prove(&tree_path, 2, Some(proof_path.as_path())).unwrap();

        let root = load_tree(&tree_path).unwrap().root().to_string();
        let [address, amount, data] = input::SAMPLE_AIRDROP[2];
        assert!(verify_claim(&root, address, amount, data, 2, &proof_path, None).unwrap());
        assert!(!verify_claim(&root, address, "1", data, 2, &proof_path, None).unwrap());
        assert!(verify_claim(
            &root,
            address,
            amount,
            data,
            2,
            &proof_path,
            Some(HashType::Sha256)
        )
        .is_err());
    }

    #[test]
    fn inspect_full_rejects_tampered_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let (tree_path, _) = build_sample(dir.path(), HashType::Keccak256);
        assert!(inspect(&tree_path, true).is_ok());

        let tree = load_tree(&tree_path).unwrap();
        let mut dump = tree.dump();
        dump.layers[1][0] = Hash256([5u8; 32]);
        fs::write(&tree_path, serde_json::to_string(&dump).unwrap()).unwrap();
        assert!(inspect(&tree_path, false).is_ok());
        assert!(inspect(&tree_path, true).is_err());
    }

    #[test]
    fn prove_out_of_range_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (tree_path, _) = build_sample(dir.path(), HashType::Sha256);
        assert!(prove(&tree_path, 4, None).is_err());
    }
}
