#![deny(warnings)]

//! Headless CLI for the FinQuest core: load the snapshot, roll the streak,
//! apply at most one command, and print the resulting display snapshot as
//! JSON.

use anyhow::{bail, Result};
use fin_core::AssetId;
use fin_runtime::{GameEngine, DEFAULT_MARKET_SEED};
use persistence::SaveFile;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    save_path: String,
    seed: u64,
    command: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut save_path = persistence::default_save_path().to_string();
    let mut seed = DEFAULT_MARKET_SEED;
    let mut command = Vec::new();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--save" => {
                save_path = it.next().unwrap_or(save_path);
            }
            "--seed" => {
                seed = match it.next().and_then(|s| s.parse().ok()) {
                    Some(s) => s,
                    None => bail!("--seed needs an integer"),
                };
            }
            _ => command.push(arg),
        }
    }
    Ok(Args {
        save_path,
        seed,
        command,
    })
}

fn parse_u64(s: Option<&String>, what: &str) -> Result<u64> {
    match s.and_then(|s| s.parse().ok()) {
        Some(v) => Ok(v),
        None => bail!("{what} must be a positive integer"),
    }
}

fn run_command(engine: &mut GameEngine, cmd: &[String]) -> Result<()> {
    match cmd.first().map(|s| s.as_str()) {
        None => {}
        Some("onboard") => {
            let name = cmd.get(1).map(|s| s.as_str()).unwrap_or("");
            let age = parse_u64(cmd.get(2), "age")? as u8;
            engine.onboard(name, age, chrono::Local::now().date_naive())?;
        }
        Some("deposit") => {
            engine.deposit(parse_u64(cmd.get(1), "amount")?)?;
        }
        Some("withdraw") => {
            engine.withdraw(parse_u64(cmd.get(1), "amount")?)?;
        }
        Some("upi") => {
            let to = cmd.get(1).map(|s| s.as_str()).unwrap_or("");
            let amount = parse_u64(cmd.get(2), "amount")?;
            let receipt = engine.simulate_upi(to, amount)?;
            println!(
                "Demo: UPI payment of {} to {} simulated. Never share PIN/OTP.",
                receipt.amount, receipt.to
            );
        }
        Some("answer") => {
            let index = parse_u64(cmd.get(1), "question index")? as usize;
            let choice = parse_u64(cmd.get(2), "choice")? as usize;
            if index >= engine.snapshot().quiz_total {
                bail!("question index {index} out of range");
            }
            for _ in 0..index {
                engine.quiz_next();
            }
            let outcome = engine.answer(choice)?;
            println!("{outcome:?}");
        }
        Some("buy") => {
            let asset = AssetId::new(cmd.get(1).map(|s| s.as_str()).unwrap_or(""));
            engine.buy(&asset, parse_u64(cmd.get(2), "quantity")?)?;
        }
        Some("sell") => {
            let asset = AssetId::new(cmd.get(1).map(|s| s.as_str()).unwrap_or(""));
            engine.sell(&asset, parse_u64(cmd.get(2), "quantity")?)?;
        }
        Some("market") => {
            for q in engine.refresh_market() {
                println!("{} {} {}", q.id, q.name, q.price);
            }
        }
        Some("mentor") => {
            let question = cmd[1..].join(" ");
            engine.ask_mentor(&question)?;
            if let Some(reply) = engine.poll_mentor() {
                println!("mentor: {}", reply.reply);
            }
        }
        Some("reset") => {
            engine.reset()?;
        }
        Some(other) => bail!("unknown command: {other}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args()?;
    info!(git_sha = env!("GIT_SHA"), save = %args.save_path, "starting finquest");

    let store = SaveFile::new(&args.save_path);
    let mut engine = GameEngine::with_store(store, args.seed);
    engine.roll_streak(chrono::Local::now().date_naive())?;

    run_command(&mut engine, &args.command)?;

    let snapshot = engine.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
