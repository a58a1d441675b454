use anyhow::{bail, Context, Result};
use serenity::config::ConfigManager;
use serenity::engines::execution::{Program, ReaderInput, VirtualMachine};
use serenity::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use std::path::{Path, PathBuf};
use std::process;

const USAGE: &str =
    "usage: serenity [CONFIG.toml] [--json]\n       serenity --exec PROGRAM_FILE [CONFIG.toml]";

#[derive(Debug, PartialEq)]
enum Command {
    Evolve { config: Option<PathBuf>, json: bool },
    Exec { program: PathBuf, config: Option<PathBuf> },
    Help,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut args = args.into_iter();
    let mut config = None;
    let mut program = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--exec" => {
                if program.is_some() {
                    bail!("--exec given twice\n{}", USAGE);
                }
                let path = args.next().context("--exec needs a program file")?;
                program = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(Command::Help),
            other if other.starts_with('-') => bail!("unknown flag '{}'\n{}", other, USAGE),
            other => {
                if config.is_some() {
                    bail!("unexpected argument '{}'\n{}", other, USAGE);
                }
                config = Some(PathBuf::from(other));
            }
        }
    }

    match program {
        Some(_) if json => bail!("--json cannot be combined with --exec\n{}", USAGE),
        Some(program) => Ok(Command::Exec { program, config }),
        None => Ok(Command::Evolve { config, json }),
    }
}

/// Runs a hand-written program, reading `,` input from stdin.
fn exec(path: &Path, config: Option<&Path>) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program '{}'", path.display()))?;
    let manager = ConfigManager::new();
    manager
        .load_layered(config)
        .context("Failed to load configuration")?;

    let mut vm = VirtualMachine::new(&manager.get().machine);
    let execution = vm.execute(&Program::from(text), usize::MAX, &mut ReaderInput::stdin())?;
    log::info!(
        "Program halted after {} cycles ({:?})",
        execution.cycles,
        execution.halt
    );
    print!("{}", execution.output);
    Ok(())
}

fn evolve(config: Option<PathBuf>, json: bool) -> Result<()> {
    let manager = ConfigManager::new();
    manager
        .load_layered(config.as_deref())
        .context("Failed to load configuration")?;
    log::info!("Configuration loaded and validated.");

    let mut engine = EvolutionEngine::new(manager.get())?;
    let report = engine.run(ConsoleProgressCallback)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let best = &report.best;
    if report.is_solved() {
        println!("Solved after {} generations", report.generations);
    } else {
        println!(
            "No exact match after {} generations, best fitness {}",
            report.generations,
            best.fitness()
        );
    }
    println!("id:      {}", best.id());
    println!("rank:    {}", best.rank());
    println!("output:  {}", best.output());
    println!("program: {}", best.program());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = parse_args(std::env::args().skip(1)).and_then(|command| match command {
        Command::Evolve { config, json } => evolve(config, json),
        Command::Exec { program, config } => exec(&program, config.as_deref()),
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    });

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_evolve_arguments() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Evolve {
                config: None,
                json: false
            }
        );
        assert_eq!(
            parse(&["run.toml", "--json"]).unwrap(),
            Command::Evolve {
                config: Some(PathBuf::from("run.toml")),
                json: true
            }
        );
        assert_eq!(parse(&["--help", "extra"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_exec_accepts_a_config_file() {
        assert_eq!(
            parse(&["--exec", "hello.bf"]).unwrap(),
            Command::Exec {
                program: PathBuf::from("hello.bf"),
                config: None
            }
        );
        let expected = Command::Exec {
            program: PathBuf::from("hello.bf"),
            config: Some(PathBuf::from("big.toml")),
        };
        assert_eq!(parse(&["--exec", "hello.bf", "big.toml"]).unwrap(), expected);
        assert_eq!(parse(&["big.toml", "--exec", "hello.bf"]).unwrap(), expected);
    }

    #[test]
    fn test_stray_arguments_are_rejected() {
        assert!(parse(&["--exec"]).is_err());
        assert!(parse(&["--exec", "hello.bf", "big.toml", "extra"]).is_err());
        assert!(parse(&["--exec", "a.bf", "--exec", "b.bf"]).is_err());
        assert!(parse(&["--exec", "hello.bf", "--json"]).is_err());
        assert!(parse(&["a.toml", "b.toml"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }
}
