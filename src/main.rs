use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cryptoconf::{Cipher, KdfCost, SecurityParameters, registry};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, clap::Args)]
struct CostArgs {
    /// PBKDF2 iteration count (default: 600000)
    #[arg(long = "pbkdf2-iterations", env = "CRYPTOCONF_PBKDF2_ITERATIONS")]
    pbkdf2_iterations: Option<u32>,

    /// Argon2 time cost / iterations (default: 3)
    #[arg(long = "argon-time", env = "CRYPTOCONF_ARGON2_TIME")]
    time_cost: Option<u32>,

    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long = "argon-mem", env = "CRYPTOCONF_ARGON2_MEMORY_KIB")]
    mem_cost_kib: Option<u32>,

    /// Argon2 parallelism (default: 4)
    #[arg(long = "argon-parallelism", env = "CRYPTOCONF_ARGON2_PARALLELISM")]
    parallelism: Option<u32>,
}

impl CostArgs {
    fn to_kdf_cost(&self) -> KdfCost {
        let default = KdfCost::default();

        KdfCost {
            pbkdf2_iterations: self.pbkdf2_iterations.unwrap_or(default.pbkdf2_iterations),
            argon2_time_cost: self.time_cost.unwrap_or(default.argon2_time_cost),
            argon2_memory_cost_kib: self.mem_cost_kib.unwrap_or(default.argon2_memory_cost_kib),
            argon2_parallelism: self.parallelism.unwrap_or(default.argon2_parallelism),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cryptoconf")]
#[command(
    version,
    about = "Inspect and validate the cryptographic security parameters."
)]
struct Cli {
    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validates the parameters, optionally with stronger cost factors
    Check {
        #[command(flatten)]
        cost: CostArgs,
    },

    /// Prints the process-wide parameters
    Show {
        #[arg(long, default_value_t = false)]
        /// Print as JSON
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match args.command {
        Commands::Check { cost } => {
            let params = SecurityParameters::with_kdf_cost(cost.to_kdf_cost());
            params.validate().context("crypto configuration rejected")?;
            println!("crypto configuration validated");
            println!("  PBKDF2 iterations: {}", grouped(params.pbkdf2_iterations()));
            println!(
                "  Argon2 memory: {:.1} MiB",
                f64::from(params.argon2_memory_cost_kib()) / 1024.0
            );
        }
        Commands::Show { json } => {
            let params = registry::init().context("crypto configuration rejected")?;
            if json {
                println!("{}", serde_json::to_string_pretty(params)?);
            } else {
                print_table(params);
            }
        }
    }

    Ok(())
}

/// `600000` -> `600,000`
fn grouped(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn print_table(params: &SecurityParameters) {
    let rows: Vec<(&str, String)> = vec![
        ("crypto_version", params.crypto_version().to_string()),
        ("salt_size_bytes", params.salt_size_bytes().to_string()),
        ("aes_key_size_bytes", params.aes_key_size_bytes().to_string()),
        ("aes_nonce_size_bytes", params.aes_nonce_size_bytes().to_string()),
        ("chacha_key_size_bytes", params.chacha_key_size_bytes().to_string()),
        ("chacha_nonce_size_bytes", params.chacha_nonce_size_bytes().to_string()),
        ("pbkdf2_iterations", params.pbkdf2_iterations().to_string()),
        ("argon2_time_cost", params.argon2_time_cost().to_string()),
        ("argon2_memory_cost_kib", params.argon2_memory_cost_kib().to_string()),
        ("argon2_parallelism", params.argon2_parallelism().to_string()),
        ("min_password_length", params.min_password_length().to_string()),
    ];

    let name_width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in rows {
        println!("{name:<name_width$}  {value}");
    }

    for cipher in [Cipher::Aes256Gcm, Cipher::ChaCha20Poly1305] {
        println!(
            "{:<name_width$}  key {} B, nonce {} B",
            cipher.name(),
            cipher.key_len(params),
            cipher.nonce_len(params)
        );
    }
}
