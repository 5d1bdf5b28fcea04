// lmzip: LLM-guided arithmetic coding for lossless text compression
// Copyright (C) 2025  Yair Ziv
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

mod model_choice;

use self::model_choice::{BuiltinModel, CLI_EOS_TOKEN, CLI_VOCAB_SIZE};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lmzip::model::{ByteTokenizer, UniformModel};
use lmzip::{CompressionDriver, LmzipError};
use log::info;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compresses a file/piped text, printing the hex-encoded payload
    Compress(CompressArgs),
    /// Decompresses a hex-encoded payload (file/piped), printing the text
    Decompress(DecompressArgs),
}

#[derive(Args)]
pub struct CompressArgs {
    /// Path to the file that will be read. If not specified, text must be
    /// piped directly into the command.
    file: Option<PathBuf>,

    /// Builtin probability model driving the coder
    #[arg(long, default_value_t = BuiltinModel::Uniform)]
    model: BuiltinModel,
}

#[derive(Args)]
pub struct DecompressArgs {
    /// Path to the file holding the hex-encoded payload. If not specified,
    /// it must be piped directly into the command.
    file: Option<PathBuf>,

    /// Builtin probability model driving the coder (must match the one
    /// used to compress)
    #[arg(long, default_value_t = BuiltinModel::Uniform)]
    model: BuiltinModel,

    /// Upper bound on decoded tokens before giving up and reporting a
    /// truncated payload
    #[arg(long, default_value_t = 10_000_000)]
    max_tokens: usize,
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let stdin = std::io::stdin();
            if stdin.is_terminal() {
                bail!("no input file given, and nothing is piped into the command");
            }
            let mut buf = String::new();
            stdin.lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn build_model() -> UniformModel {
    UniformModel::new(CLI_VOCAB_SIZE, CLI_EOS_TOKEN)
}

fn run_compress(args: CompressArgs) -> Result<()> {
    let BuiltinModel::Uniform = args.model;
    let text = read_input(args.file.as_ref())?;

    let mut driver = CompressionDriver::new(build_model(), ByteTokenizer);
    let compressed = driver
        .compress(&text)
        .context("failed to compress input")?;
    info!("Compressed {} input bytes into {} output bytes", text.len(), compressed.len());

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", hex::encode(compressed))?;
    Ok(())
}

fn run_decompress(args: DecompressArgs) -> Result<()> {
    let BuiltinModel::Uniform = args.model;
    let hex_text = read_input(args.file.as_ref())?;
    let compressed: Vec<u8> = hex::decode(hex_text.trim()).map_err(LmzipError::InvalidHex)?;

    let mut driver = CompressionDriver::new(build_model(), ByteTokenizer);
    let text = driver
        .decompress(&compressed, args.max_tokens)
        .context("failed to decompress payload")?;

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{text}")?;
    Ok(())
}

/// Runs the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.commands {
        Commands::Compress(args) => run_compress(args),
        Commands::Decompress(args) => run_decompress(args),
    }
}
