use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod input;
use cryptstring::{
    Algorithm, Config, CredentialHasher, CredentialRecord, Digest, KdfParams, RecordFile, Salt,
    SaltGenerator,
};
use std::path::PathBuf;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long = "argon-mem", global = true, env = "CRYPTSTRING_ARGON_MEM")]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations (default: 3)
    #[arg(long = "argon-time", global = true, env = "CRYPTSTRING_ARGON_TIME")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (default: 1)
    #[arg(long = "argon-parallelism", global = true, env = "CRYPTSTRING_ARGON_PARALLELISM")]
    parallelism: Option<u32>,
}

impl Argon2Args {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        let default = KdfParams::default();

        KdfParams::new(
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.parallelism.unwrap_or(default.parallelism()),
        )
        .context("invalid Argon2 parameters")
    }
}

#[derive(Debug, Parser)]
#[command(name = "cryptstring")]
#[command(version, about = "Salted password hashing and verification.")]
struct Cli {
    /// Digest primitive: des (legacy crypt, default) or argon2. `verify`
    /// always uses the primitive the stored hash was made with
    #[arg(long, global = true, value_name = "ALGORITHM", env = "CRYPTSTRING_ALGORITHM")]
    algorithm: Option<Algorithm>,

    /// Salt length (default: the primitive's preferred size)
    #[arg(long, global = true, value_name = "N", env = "CRYPTSTRING_SALT_LEN")]
    salt_len: Option<usize>,

    #[command(flatten)]
    argon2: Argon2Args,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints a freshly generated salt
    Salt,

    /// Hashes a plaintext read from CRYPTSTRING_PLAINTEXT, stdin or the terminal
    Encrypt {
        /// Use this salt instead of generating one
        #[arg(long)]
        salt: Option<String>,

        /// Also write the credential record to this file
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Overwrite an existing record file
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Print the credential record as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Checks a plaintext against a stored hash and salt
    Verify {
        /// Stored hash
        #[arg(long, requires = "salt", required_unless_present = "record")]
        hash: Option<String>,

        /// Salt the hash was produced with
        #[arg(long, requires = "hash")]
        salt: Option<String>,

        /// Credential record file written by `encrypt --out`
        #[arg(long, value_name = "PATH", conflicts_with_all = ["hash", "salt"])]
        record: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn flag_plaintext(plaintext: &str, hasher: &CredentialHasher<Box<dyn Digest>>) {
    if plaintext.is_empty() {
        warn!("plaintext is empty");
    }
    if let Some(max) = hasher.digest().max_plaintext_len() {
        if plaintext.len() > max {
            warn!(
                algorithm = hasher.algorithm(),
                "only the first {max} bytes of the plaintext are used"
            );
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_tracing(args.verbose)?;

    let config = Config::new(
        args.algorithm.unwrap_or_default(),
        args.argon2.to_kdf_params()?,
    )
        .with_salt_len(args.salt_len);
    let generator = SaltGenerator::new();

    match args.command {
        Commands::Salt => {
            let salt = generator
                .generate_salt(config.salt_len())
                .context("salt generation failed")?;
            println!("{salt}");
        }
        Commands::Encrypt {
            salt,
            out,
            force,
            json,
        } => {
            let hasher = CredentialHasher::new(config.digest());
            info!(
                algorithm = hasher.algorithm(),
                salt_len = config.salt_len(),
                "encrypting"
            );

            let plaintext = input::read_plaintext("Enter the string to encrypt: ")?;
            flag_plaintext(&plaintext, &hasher);

            let record = match salt {
                Some(salt) => {
                    let hash = hasher.hash(&plaintext, &salt).context("Encryption failed.")?;
                    let salt = Salt::parse(&salt).context("Encryption failed.")?;
                    CredentialRecord::new(hasher.algorithm(), hash, salt)
                }
                None => hasher
                    .enroll(&generator, &plaintext, config.salt_len())
                    .context("Encryption failed.")?,
            };
            drop(plaintext);

            if let Some(path) = out {
                let file = RecordFile::new(path);
                if file.exists() && !force {
                    bail!("record file {} already exists", file.path().display());
                }
                file.save(&record)
                    .with_context(|| format!("failed to write {}", file.path().display()))?;
                info!(path = %file.path().display(), "record saved");
            }

            if json {
                println!("{}", record.to_json()?);
            } else {
                println!("Salt: {}", record.salt());
                println!("Hashed: {}", record.hash());
            }
        }
        Commands::Verify { hash, salt, record } => {
            let (record, expected, salt) = match (record, hash, salt) {
                (Some(path), _, _) => {
                    let file = RecordFile::new(path);
                    let record = file
                        .load()
                        .with_context(|| format!("failed to read {}", file.path().display()))?;
                    debug!(path = %file.path().display(), "record loaded");
                    let expected = record.hash().to_owned();
                    let salt = record.salt().to_string();
                    (Some(record), expected, salt)
                }
                (None, Some(hash), Some(salt)) => (None, hash, salt),
                _ => bail!("either --record or both --hash and --salt are required"),
            };

            let detected = config
                .for_hash(&expected)
                .context("Verification failed.")?;
            if let Some(requested) = args.algorithm {
                if requested != detected.algorithm() {
                    warn!(
                        %requested,
                        detected = %detected.algorithm(),
                        "ignoring --algorithm, the stored hash decides the primitive"
                    );
                }
            }

            let hasher = CredentialHasher::new(detected.digest());
            info!(algorithm = hasher.algorithm(), "verifying");

            let plaintext = input::read_plaintext("Enter the string to validate: ")?;
            let matches = match &record {
                Some(record) => hasher
                    .verify_record(&plaintext, record)
                    .context("Verification failed.")?,
                None => hasher
                    .try_verify(&plaintext, &expected, &salt)
                    .context("Verification failed.")?,
            };
            drop(plaintext);

            info!(matches, "verification finished");
            if matches {
                println!("Ciphertext matches the salt.");
            } else {
                println!("Ciphertext does not match the salt.");
            }
        }
    }

    Ok(())
}

