pub mod command;
pub mod parse;

use crate::{
    fs::FileSystem,
    shell::{
        command::{execute_command, Command},
        parse::parse_command,
    },
};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use log::warn;
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};
use std::{
    io::{self, stdout},
    path::{Path, PathBuf},
};

const COMMANDS: [&str; 11] = [
    "help", "ls", "touch", "rm", "read", "write", "stat", "mkfs", "refmt", "check", "exit",
];

pub fn start_shell(disk_path: &Path) -> io::Result<()> {
    banner(disk_path)?;

    let username = whoami::username();
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string());

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history.\n".bright_black()
    );

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".simple_fs_history");

    let mut line_editor = Reedline::create();
    match FileBackedHistory::with_file(100, history_path.clone()) {
        Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
        Err(e) => warn!("history disabled, cannot use {}: {}", history_path.display(), e),
    }

    let completer =
        DefaultCompleter::new_with_wordlen(COMMANDS.iter().map(|c| c.to_string()).collect(), 2);
    line_editor = line_editor.with_completer(Box::new(completer));

    loop {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(format!(
                "{}:{}",
                format!("{}@{}", username, hostname).green(),
                "simple-fs".blue()
            )),
            DefaultPromptSegment::Empty,
        );

        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(Command::Exit) => {
                        println!("{}", "👋 Bye!".bright_yellow());
                        break;
                    }
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, disk_path) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command. Type 'help' for command list.".yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting simple-fs...".yellow());
                break;
            }
            #[allow(unreachable_patterns)]
            Ok(_) => continue,
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
    Ok(())
}

/// 清屏并显示当前镜像的状态
fn banner(disk_path: &Path) -> io::Result<()> {
    let mut stdout = stdout();
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!("simple-fs v{}\n", env!("CARGO_PKG_VERSION"))),
        ResetColor
    )?;

    // 只是看一眼，马上释放句柄
    match FileSystem::open_unchecked(disk_path).and_then(|fs| fs.check()) {
        Ok(usage) => println!(
            "💾 {} mounted, {} files, {} inodes free",
            disk_path.display().to_string().cyan(),
            usage.used_slots,
            usage.super_block.free_inode_count
        ),
        Err(e) => println!("{} {}", "⚠️ ".yellow(), e),
    }
    Ok(())
}
