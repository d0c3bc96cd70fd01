use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use simple_fs::{
    shell::{
        command::{execute_command, Command},
        start_shell,
    },
    DEFAULT_DISK_PATH,
};

/// A simple filesystem on a 16KB disk: 16 blocks of 1024 bytes, files only.
#[derive(Debug, Parser)]
#[command(name = "simple-fs", version)]
struct Cli {
    /// Disk image to operate on
    #[arg(long, global = true, env = "SIMPLE_FS_DISK", default_value = DEFAULT_DISK_PATH)]
    disk: PathBuf,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Create and format a new virtual disk
    Mkfs,
    /// Erase the virtual disk and format it again
    Refmt {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a new empty file
    Touch { name: String },
    /// List files
    Ls,
    /// Show name, size, inode and data block of a file
    Stat { name: String },
    /// Print a file's content
    Read { name: String },
    /// Replace a file's content
    Write {
        name: String,
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// Delete a file
    Rm { name: String },
    /// Verify that superblock, bitmap and inode table agree
    Check,
    /// Start the interactive shell (default)
    Shell,
}

impl Cmd {
    /// `shell` 没有对应的单次命令
    fn into_command(self) -> Option<Command> {
        Some(match self {
            Cmd::Mkfs => Command::Format,
            Cmd::Refmt { yes } => Command::Reformat { confirmed: yes },
            Cmd::Touch { name } => Command::Create(name),
            Cmd::Ls => Command::Ls,
            Cmd::Stat { name } => Command::Stat(name),
            Cmd::Read { name } => Command::Read(name),
            Cmd::Write { name, content } => Command::Write(name, content.join(" ")),
            Cmd::Rm { name } => Command::Rm(name),
            Cmd::Check => Command::Check,
            Cmd::Shell => return None,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let command = cli.command.and_then(Cmd::into_command);
    let result = match command {
        Some(cmd) => execute_command(&cmd, &cli.disk),
        None => start_shell(&cli.disk).map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
