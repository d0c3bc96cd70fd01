use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::path::Path;

use crate::{
    disk::init::{format_image, reformat_image, Reformatted},
    fs::{FileStat, FileSystem},
    utils::render_bitmap,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls,
    Create(String),
    Rm(String),
    Read(String),
    Write(String, String),
    Stat(String),
    Format,
    Reformat { confirmed: bool },
    Check,
    Exit,
}

/// 执行一条命令。每条命令单独打开镜像，命令结束时句柄和锁一起释放。
pub fn execute_command(cmd: &Command, disk_path: &Path) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => print_help(),
        Command::Ls => {
            let files = FileSystem::open(disk_path)?.list()?;
            if files.is_empty() {
                println!("{}", "(no files)".bright_black());
            }
            for file in files {
                println!(
                    "📄  {:<55} {:>5} bytes  {}",
                    file.name,
                    file.size,
                    format!("inode {}", file.slot.index()).bright_black()
                );
            }
        }
        Command::Create(name) => {
            let slot = FileSystem::open(disk_path)?.create_file(name)?;
            println!(
                "📝 Created file: {} {}",
                name.green(),
                format!("(inode {}, data block {})", slot.index(), slot.data_block_ref())
                    .bright_black()
            );
        }
        Command::Rm(name) => {
            FileSystem::open(disk_path)?.delete_file(name)?;
            println!("❌ Deleted file: {}", name.red());
        }
        Command::Read(name) => {
            let content = FileSystem::open(disk_path)?.read_file(name)?;
            println!("{}", String::from_utf8_lossy(&content));
        }
        Command::Write(name, content) => {
            FileSystem::open(disk_path)?.write_file(name, content.as_bytes())?;
            println!(
                "✏️  Wrote {} bytes to {}",
                content.len(),
                name.cyan()
            );
        }
        Command::Stat(name) => {
            let stat = FileSystem::open(disk_path)?.stat(name)?;
            print_stat(&stat);
        }
        Command::Format => {
            println!("💾 Formatting virtual disk...");
            let pb = progress_bar()?;
            format_image(disk_path, |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })?;
            pb.finish_with_message("✅ Disk formatted successfully!");
            println!("Created a new virtual disk at {}", disk_path.display());
        }
        Command::Reformat { confirmed } => {
            let go = *confirmed
                || Confirm::new()
                    .with_prompt(format!(
                        "Erase {} and format a new disk?",
                        disk_path.display()
                    ))
                    .default(false)
                    .interact()?;
            if !go {
                println!("{}", "Reformat cancelled".yellow());
                return Ok(());
            }

            println!("💾 Reformatting virtual disk...");
            let pb = progress_bar()?;
            let (_, outcome) = reformat_image(disk_path, |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })?;
            pb.finish_with_message("✅ Disk formatted successfully!");
            if outcome == Reformatted::Created {
                println!(
                    "{}",
                    format!("⚠️  No disk existed at {}, created a new one", disk_path.display())
                        .yellow()
                );
            }
        }
        Command::Check => {
            let usage = FileSystem::open_unchecked(disk_path)?.check()?;
            let sb = usage.super_block;
            println!(
                "{}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n",
                "🩺 Disk is consistent".bright_green().bold(),
                "Files".blue(),
                usage.used_slots,
                "Free inodes".blue(),
                sb.free_inode_count,
                "Free blocks".blue(),
                sb.free_block_count,
                "Bitmap".blue(),
                render_bitmap(usage.bitmap.bits())
            );
        }
        Command::Exit => println!("{}", "👋 Exiting simple-fs shell...".yellow().bold()),
    }

    Ok(())
}

fn progress_bar() -> Result<ProgressBar, Box<dyn Error>> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.green/black}] {pos:>2}/{len} blocks {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn print_stat(stat: &FileStat) {
    println!(
        "{}\n{}: {}\n{}: {} bytes\n{}: {}\n{}: {} (block {})\n",
        "📊 File Info".bright_yellow().bold(),
        "Name".blue(),
        stat.name,
        "Size".blue(),
        stat.size,
        "Inode".blue(),
        stat.slot.index(),
        "Data block".blue(),
        stat.data_block,
        stat.block_id
    );
}

fn print_help() {
    println!("{}", "📘 simple-fs Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  ls                 List files
  touch <file>       Create an empty file
  rm <file>          Remove file
  read <file>        Print file content
  write <file> <str> Replace file content (max 1024 bytes)
  stat <file>        Show file info
  mkfs               Create and format the virtual disk
  refmt [-y]         Erase and reformat the virtual disk
  check              Verify superblock, bitmap and inode table agree
  help               Show this help message
  exit               Quit the shell
"
        .bright_black()
    );
}
