use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gc::{evaluate, Garbler, Label};
use indicatif::{ProgressBar, ProgressStyle};
use rand::RngCore;

#[derive(Parser)]
#[command(name = "gc-cli", about = "Garble and evaluate boolean circuits using Yao's protocol")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Garble a logic circuit for a concrete input assignment
    Garbler {
        /// Path to the plaintext logic circuit (JSON)
        logic_circuit: PathBuf,
        /// Input bits as a string of 0s and 1s, e.g. "101"
        input_bits: String,
        /// Where to write the garbled circuit bundle
        #[arg(short, long, default_value = "gc_out.json")]
        output: PathBuf,
        /// Evaluate the plaintext circuit too and compare against the decrypted result
        #[arg(short, long, default_value_t = false)]
        verify: bool,
        /// Seed the CSPRNG for reproducible output instead of drawing from OS entropy
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate a garbled circuit bundle and print its output labels
    Evaluator {
        /// Path to the garbled circuit bundle (JSON)
        garbled_circuit: PathBuf,
    },
}

fn print_error(message: impl std::fmt::Display) {
    println!("\x1b[31m[!] Error:\x1b[0m {message}");
}

fn print_info(message: impl std::fmt::Display) {
    println!("\x1b[34m[.] Info:\x1b[0m {message}");
}

fn print_ok(message: impl std::fmt::Display) {
    println!("\x1b[32m[+] Ok:\x1b[0m {message}");
}

fn print_run(message: impl std::fmt::Display) {
    println!("\x1b[33m[%] Run:\x1b[0m {message}");
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Garbler { logic_circuit, input_bits, output, verify, seed } => {
            run_garbler(&logic_circuit, &input_bits, &output, verify, seed)
        }
        Command::Evaluator { garbled_circuit } => run_evaluator(&garbled_circuit),
    };

    if let Err(err) = result {
        print_error(format!("{err:#}"));
        std::process::exit(1);
    }
}

fn parse_input_bits(input_bits: &str) -> Result<Vec<u8>> {
    input_bits
        .chars()
        .map(|c| match c {
            '0' => Ok(0u8),
            '1' => Ok(1u8),
            other => bail!("input bits must be 0 or 1, found '{other}'"),
        })
        .collect()
}

fn run_garbler(logic_circuit: &PathBuf, input_bits: &str, output: &PathBuf, verify: bool, seed: Option<u64>) -> Result<()> {
    print_run("Garbler");

    let circuit = gc::persistence::load_circuit(logic_circuit)
        .with_context(|| format!("loading logic circuit from {}", logic_circuit.display()))?;

    let input_bits = parse_input_bits(input_bits)?;
    if input_bits.len() != circuit.num_inputs() {
        bail!(
            "length of input bits ({}) does not match circuit input count ({})",
            input_bits.len(),
            circuit.num_inputs()
        );
    }

    let mut garbler = match seed {
        Some(seed) => Garbler::from_seed_u64(seed),
        None => {
            let mut seed_data = [0u8; 32];
            rand::rng().fill_bytes(&mut seed_data);
            Garbler::new(seed_data)
        }
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("static template is valid"));
    spinner.set_message("garbling circuit...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let garbled_circuit = garbler.garble(&circuit, &input_bits)?;

    spinner.finish_and_clear();

    gc::persistence::store_garbled_circuit(&garbled_circuit, output)
        .with_context(|| format!("writing garbled circuit to {}", output.display()))?;
    print_info(format!("Garbled circuit stored under: {}", output.display()));

    println!("Input evaluated keys for ids: {:?} (in order)", circuit.outputs());
    let stdin = io::stdin();
    let mut output_label_bytes = Vec::with_capacity(circuit.outputs().len());
    for _ in circuit.outputs() {
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        output_label_bytes.push(Label::from_hex(line.trim())?);
    }

    let output_bits = garbler.decrypt(circuit.outputs(), &output_label_bytes)?;
    println!("Result: {}", bits_to_str(&output_bits));

    if verify {
        let expected = circuit.evaluate(&input_bits)?;
        if expected == output_bits {
            print_ok(format!("Verify => Output OK: {}", bits_to_str(&expected)));
        } else {
            print_error(format!("Verify => Output does not match: {}", bits_to_str(&expected)));
        }
    }

    Ok(())
}

fn run_evaluator(garbled_circuit: &PathBuf) -> Result<()> {
    print_run("Evaluator");

    let gc = gc::persistence::load_garbled_circuit(garbled_circuit)
        .with_context(|| format!("loading garbled circuit from {}", garbled_circuit.display()))?;

    let outputs = evaluate(&gc)?;

    println!("Outputs evaluated for ids: {:?} (in order)", gc.inner().outputs());
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    for label in &outputs {
        writeln!(lock, "{}", label.to_hex())?;
    }

    Ok(())
}

fn bits_to_str(bits: &[u8]) -> String {
    bits.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect()
}
