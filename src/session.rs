// Interactive session input — one line from the prompt, parsed.
//
// Plain text is a title query. Lines starting with ':' adjust the session:
//   :weight 0.7   :top 10   :reload   :help   :quit

use anyhow::{Context, Result};

use crate::scoring::hybrid::GenreWeight;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    Query(String),
    SetWeight(GenreWeight),
    SetTopN(usize),
    Reload,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Type a movie title (or part of one) to get recommendations.
  :weight <0.0-1.0>  how much genre similarity counts (1.0 = genre only)
  :top <n>           how many recommendations to show
  :reload            rebuild the similarity spaces from the data files
  :quit              leave";

impl SessionInput {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(SessionInput::Empty);
        }
        let Some(command) = line.strip_prefix(':') else {
            return Ok(SessionInput::Query(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("weight" | "w", Some(raw)) => {
                let weight: f64 = raw
                    .parse()
                    .with_context(|| format!("'{raw}' is not a number"))?;
                Ok(SessionInput::SetWeight(GenreWeight::new(weight)?))
            }
            ("top" | "n", Some(raw)) => {
                let n: usize = raw
                    .parse()
                    .with_context(|| format!("'{raw}' is not a whole number"))?;
                Ok(SessionInput::SetTopN(n))
            }
            ("reload", None) => Ok(SessionInput::Reload),
            ("help" | "h" | "?", None) => Ok(SessionInput::Help),
            ("quit" | "q" | "exit", None) => Ok(SessionInput::Quit),
            _ => anyhow::bail!("Unknown command ':{command}'. Type :help for commands."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_query() {
        assert_eq!(
            SessionInput::parse("  Toy Story (1995) ").unwrap(),
            SessionInput::Query("Toy Story (1995)".to_string())
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(SessionInput::parse("   ").unwrap(), SessionInput::Empty);
    }

    #[test]
    fn test_weight_command() {
        assert_eq!(
            SessionInput::parse(":weight 0.7").unwrap(),
            SessionInput::SetWeight(GenreWeight::new(0.7).unwrap())
        );
        assert!(SessionInput::parse(":weight 1.7").is_err());
        assert!(SessionInput::parse(":weight lots").is_err());
    }

    #[test]
    fn test_top_command() {
        assert_eq!(SessionInput::parse(":top 10").unwrap(), SessionInput::SetTopN(10));
        assert!(SessionInput::parse(":top -1").is_err());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(SessionInput::parse(":reload").unwrap(), SessionInput::Reload);
        assert_eq!(SessionInput::parse(":q").unwrap(), SessionInput::Quit);
        assert_eq!(SessionInput::parse(":help").unwrap(), SessionInput::Help);
    }

    #[test]
    fn test_unknown_command() {
        let err = SessionInput::parse(":frobnicate").unwrap_err();
        assert!(err.to_string().contains("Unknown command"));
    }
}
