use anyhow::{bail, Context, Result};
use contact_api::config::AppConfig;
use contact_api::seed;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_COUNT: usize = 1000;

/// `seed-contacts [COUNT] [--seed N]`
struct Args {
    count: usize,
    seed: Option<u64>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        count: DEFAULT_COUNT,
        seed: None,
    };
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                parsed.seed = Some(value.parse().context("--seed must be an integer")?);
            }
            other if other.starts_with("--") => bail!("unknown option {}", other),
            other => {
                parsed.count = other.parse().context("COUNT must be a positive integer")?;
            }
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = AppConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url())
        .await
        .context("Unable to connect database")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Unable to ping database")?;
    log::info!("Database connected successfully");

    let mut rng = match args.seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    seed::seed_contacts(&pool, args.count, &mut rng).await?;
    seed::seed_groups(&pool).await?;
    seed::seed_contact_groups(&pool, &mut rng).await?;

    pool.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args> {
        parse_args(raw.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn test_defaults() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.count, DEFAULT_COUNT);
        assert_eq!(parsed.seed, None);
    }

    #[test]
    fn test_count_and_seed() {
        let parsed = args(&["25", "--seed", "9"]).unwrap();
        assert_eq!(parsed.count, 25);
        assert_eq!(parsed.seed, Some(9));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(args(&["--seed"]).is_err());
        assert!(args(&["many"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
