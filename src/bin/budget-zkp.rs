use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use budget_zkp::config::{GroupChoice, ScenarioConfig};
use budget_zkp::{
    Group, LinearProof, LinearProver, LinearSystem, LinearVerifier, OpeningMode, P256, Parameters,
    RangeProof, RangeProver, RangeVerifier, Ristretto255, SecureRng, Transcript, Witness,
};
use clap::Parser;
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use sha2::{Digest, Sha256};
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "budget-zkp")]
#[command(
    about = "Prove committed values are in range and satisfy a budget system",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Scenario file (TOML)
    #[arg(short, long, env = "BUDGET_ZKP_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Group to run over, overriding the scenario
    #[arg(short, long, value_enum)]
    group: Option<GroupChoice>,

    /// Send l(x), r(x) in full instead of the inner-product argument
    #[arg(long)]
    explicit_opening: bool,

    /// Session context bound into every transcript, overriding the scenario
    #[arg(long)]
    context: Option<String>,
}

fn print_colored(color: Color, text: &str) {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(color), Print(text), ResetColor).ok();
    stdout.flush().ok();
}

fn println_colored(color: Color, text: &str) {
    print_colored(color, text);
    println!();
}

fn display_banner() {
    println!();
    println_colored(
        Color::Cyan,
        "+---------------------------------------------------------+",
    );
    println_colored(
        Color::Cyan,
        "|        Range and Budget-Constraint Proofs (ZKP)         |",
    );
    println_colored(
        Color::Cyan,
        "+---------------------------------------------------------+",
    );
    println!();
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(&Sha256::digest(bytes)[..8])
}

fn report(name: &str, accepted: bool, bytes: &[u8], elapsed_ms: u128) {
    let (color, verdict) = if accepted {
        (Color::Green, "ACCEPT")
    } else {
        (Color::Red, "REJECT")
    };
    print_colored(Color::White, &format!("  {name:<16}"));
    print_colored(color, verdict);
    println!(
        "  ({} bytes, sha256 {}.., {elapsed_ms} ms)",
        bytes.len(),
        digest(bytes)
    );
}

fn transcript(domain: &'static [u8], context: &str) -> Transcript {
    let mut t = Transcript::new(domain);
    t.append_context(context.as_bytes());
    t
}

fn run<G: Group>(config: &ScenarioConfig) -> budget_zkp::Result<bool> {
    let mut rng = SecureRng::new();
    let params = Parameters::<G>::new(config.values.len(), config.bit_width)?;
    let witness = Witness::random(config.values.clone(), &mut rng);
    let system = LinearSystem::<G>::from_integers(&config.matrix, &config.rhs)?;

    println_colored(
        Color::Yellow,
        &format!(
            "{} | n = {} | N = {} | opening = {:?}",
            G::name(),
            params.secret_count(),
            params.bit_width(),
            config.opening
        ),
    );

    let started = Instant::now();
    let range_prover =
        RangeProver::new(params.clone(), witness.clone())?.with_opening(config.opening);
    let statement = range_prover.statement().clone();
    let proof = range_prover.prove_with_transcript(
        &mut rng,
        &mut transcript(budget_zkp::protocol::range::RANGE_DOMAIN, &config.context),
    )?;
    let bytes = proof.to_bytes();
    let received = RangeProof::<G>::from_bytes(&bytes)?;
    let range_ok = RangeVerifier::new(params.clone(), statement.clone())?.verify_with_transcript(
        &received,
        &mut transcript(budget_zkp::protocol::range::RANGE_DOMAIN, &config.context),
    )?;
    report("range proof", range_ok, &bytes, started.elapsed().as_millis());

    let started = Instant::now();
    let linear_prover = LinearProver::with_statement(
        params.clone(),
        witness,
        statement.clone(),
        system.clone(),
    )?;
    let proof = linear_prover.prove_with_transcript(
        &mut rng,
        &mut transcript(budget_zkp::protocol::linear::LINEAR_DOMAIN, &config.context),
    )?;
    let bytes = proof.to_bytes();
    let received = LinearProof::<G>::from_bytes(&bytes)?;
    let linear_ok = LinearVerifier::new(params, statement, system)?.verify_with_transcript(
        &received,
        &mut transcript(budget_zkp::protocol::linear::LINEAR_DOMAIN, &config.context),
    )?;
    report("linear relation", linear_ok, &bytes, started.elapsed().as_millis());

    Ok(range_ok && linear_ok)
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    display_banner();

    let loaded = match &args.config {
        Some(path) => ScenarioConfig::from_path(path),
        None => ScenarioConfig::from_env(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            println_colored(Color::Red, &format!("Configuration loading failed: {e}"));
            return ExitCode::FAILURE;
        }
    };

    if let Some(group) = args.group {
        config.group = group;
    }
    if args.explicit_opening {
        config.opening = OpeningMode::Explicit;
    }
    if let Some(context) = args.context {
        config.context = context;
    }

    if let Err(e) = config.validate() {
        println_colored(Color::Red, &format!("Configuration validation failed: {e}"));
        return ExitCode::FAILURE;
    }

    let outcome = match config.group {
        GroupChoice::Ristretto255 => run::<Ristretto255>(&config),
        GroupChoice::P256 => run::<P256>(&config),
    };

    println!();
    match outcome {
        Ok(true) => {
            println_colored(Color::Green, "All proofs verified.");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println_colored(Color::Red, "At least one proof was rejected.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Proving run failed: {e}");
            println_colored(Color::Red, &format!("Error: {e}"));
            ExitCode::FAILURE
        }
    }
}
