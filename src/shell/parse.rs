use crate::shell::command::Command;

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "ls" => Some(Command::Ls),
        "touch" | "create" => args.first().map(|&name| Command::Create(name.to_string())),
        "rm" => args.first().map(|&name| Command::Rm(name.to_string())),
        "read" => args.first().map(|&name| Command::Read(name.to_string())),
        "write" => {
            if args.len() >= 2 {
                Some(Command::Write(args[0].to_string(), args[1..].join(" ")))
            } else {
                None
            }
        }
        "stat" => args.first().map(|&name| Command::Stat(name.to_string())),
        "mkfs" | "format" => Some(Command::Format),
        "refmt" | "reformat" => Some(Command::Reformat {
            confirmed: args.iter().any(|&a| a == "-y" || a == "--yes"),
        }),
        "check" => Some(Command::Check),
        "exit" | "quit" => Some(Command::Exit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_commands() {
        assert_eq!(
            parse_command("touch a.txt"),
            Some(Command::Create("a.txt".to_string()))
        );
        assert_eq!(
            parse_command("  stat   a.txt "),
            Some(Command::Stat("a.txt".to_string()))
        );
        assert_eq!(
            parse_command("write a.txt hello  world"),
            Some(Command::Write("a.txt".to_string(), "hello world".to_string()))
        );
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert_eq!(parse_command("touch"), None);
        assert_eq!(parse_command("write a.txt"), None);
        assert_eq!(parse_command("rm"), None);
    }

    #[test]
    fn reformat_confirmation_flag() {
        assert_eq!(
            parse_command("refmt"),
            Some(Command::Reformat { confirmed: false })
        );
        assert_eq!(
            parse_command("refmt -y"),
            Some(Command::Reformat { confirmed: true })
        );
    }

    #[test]
    fn unknown_and_blank_input() {
        assert_eq!(parse_command("mkdir docs"), None);
        assert_eq!(parse_command("   "), None);
    }
}
