use std::str::FromStr;

use thiserror::Error;

pub const HELP: &str = "\
commands:
  list              show the todos
  title <text>      set the form title
  desc <text>       set the form description
  submit            add the todo, or save the one being edited
  edit <n>          edit todo number n
  cancel            leave edit mode and clear the form
  done <n>          mark todo n complete
  undo <n>          mark todo n pending
  delete <n>        delete todo n
  help              show this
  quit              exit";

/// One line of user input. Positions are 1-based, as the list is printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Title(String),
    Description(String),
    Submit,
    Edit(usize),
    Cancel,
    Complete(usize),
    Reopen(usize),
    Delete(usize),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{0}` needs a todo number")]
    MissingPosition(&'static str),

    #[error("`{0}` is not a todo number")]
    BadPosition(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" | "list" | "ls" => Command::List,
            "title" => Command::Title(rest.to_string()),
            "desc" | "description" => Command::Description(rest.to_string()),
            "submit" | "save" => Command::Submit,
            "edit" => Command::Edit(position("edit", rest)?),
            "cancel" => Command::Cancel,
            "done" => Command::Complete(position("done", rest)?),
            "undo" => Command::Reopen(position("undo", rest)?),
            "delete" | "rm" => Command::Delete(position("delete", rest)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn position(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingPosition(command));
    }

    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadPosition(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_arguments_keep_inner_spaces() {
        assert_eq!(
            "title  Buy oat milk ".parse::<Command>(),
            Ok(Command::Title(String::from("Buy oat milk")))
        );
        assert_eq!("desc".parse::<Command>(), Ok(Command::Description(String::new())));
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!("done 1".parse::<Command>(), Ok(Command::Complete(1)));
        assert_eq!("rm 12".parse::<Command>(), Ok(Command::Delete(12)));
        assert_eq!(
            "edit 0".parse::<Command>(),
            Err(CommandError::BadPosition(String::from("0")))
        );
        assert_eq!(
            "undo".parse::<Command>(),
            Err(CommandError::MissingPosition("undo"))
        );
    }

    #[test]
    fn blank_line_lists() {
        assert_eq!("   ".parse::<Command>(), Ok(Command::List));
    }

    #[test]
    fn unknown_words_are_rejected() {
        assert_eq!(
            "frobnicate 3".parse::<Command>(),
            Err(CommandError::Unknown(String::from("frobnicate")))
        );
    }
}
