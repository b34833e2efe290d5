//! Line commands read from stdin.

use dashboard_core::{BatchMode, ConfigField, DirectoryField, Filter, Msg};

pub(crate) const HELP: &str = "\
commands:
  filter <all|file|error|system|redo>   refresh   clear   show   quit
  run | compare                         monitor <on|off>
  redo | redo close | redo run <id> | redo all | redo cancel
  dir add | dir rm <n> | dir set <n> <name|source|target> <value>
  set <tmdb_api_key|douban_cookies|max_retries|cache_expiry_days> <value>
  save | dismiss <id>";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

pub(crate) fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let command = match word {
        "quit" | "exit" => Command::Quit,
        "help" | "?" => Command::Help,
        "show" => Command::Show,
        "refresh" => Command::Dispatch(Msg::RefreshClicked),
        "clear" => Command::Dispatch(Msg::ClearMessagesClicked),
        "save" => Command::Dispatch(Msg::SaveConfigClicked),
        "run" => Command::Dispatch(Msg::BatchClicked(BatchMode::All)),
        "compare" => Command::Dispatch(Msg::BatchClicked(BatchMode::Compare)),
        "filter" => Command::Dispatch(Msg::FilterChanged(parse_filter(rest)?)),
        "monitor" => match rest {
            "on" => Command::Dispatch(Msg::MonitorToggled(true)),
            "off" => Command::Dispatch(Msg::MonitorToggled(false)),
            _ => return Err("usage: monitor <on|off>".to_string()),
        },
        "dismiss" => Command::Dispatch(Msg::NotificationDismissed(parse_number(rest, "id")?)),
        "redo" => Command::Dispatch(parse_redo(rest)?),
        "dir" => Command::Dispatch(parse_dir(rest)?),
        "set" => Command::Dispatch(Msg::ConfigFieldEdited(parse_field(rest)?)),
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("expected a number for {what}, got '{text}'"))
}

fn parse_filter(text: &str) -> Result<Filter, String> {
    match text {
        "all" => Ok(Filter::All),
        "file" | "file_process" => Ok(Filter::FileProcess),
        "error" => Ok(Filter::Error),
        "system" => Ok(Filter::System),
        "redo" => Ok(Filter::Redo),
        _ => Err("usage: filter <all|file|error|system|redo>".to_string()),
    }
}

fn parse_redo(text: &str) -> Result<Msg, String> {
    let (word, rest) = split_word(text);
    match word {
        "" => Ok(Msg::RedoViewOpened),
        "close" => Ok(Msg::RedoViewClosed),
        "all" => Ok(Msg::ProcessAllRedoClicked),
        "cancel" => Ok(Msg::CancelRedoClicked),
        "run" => Ok(Msg::ExecuteRedoClicked(parse_number(rest, "redo id")?)),
        _ => Err("usage: redo [close|all|cancel|run <id>]".to_string()),
    }
}

fn parse_dir(text: &str) -> Result<Msg, String> {
    let (word, rest) = split_word(text);
    match word {
        "add" => Ok(Msg::DirectoryAdded),
        "rm" => Ok(Msg::DirectoryRemoved(parse_number(rest, "row")?)),
        "set" => {
            let (index, rest) = split_word(rest);
            let (field, value) = split_word(rest);
            let field = match field {
                "name" => DirectoryField::Name,
                "source" => DirectoryField::Source,
                "target" => DirectoryField::Target,
                _ => return Err("usage: dir set <n> <name|source|target> <value>".to_string()),
            };
            Ok(Msg::DirectoryEdited {
                index: parse_number(index, "row")?,
                field,
                value: value.to_string(),
            })
        }
        _ => Err("usage: dir <add|rm <n>|set <n> <field> <value>>".to_string()),
    }
}

fn parse_field(text: &str) -> Result<ConfigField, String> {
    let (name, value) = split_word(text);
    match name {
        "tmdb_api_key" => Ok(ConfigField::TmdbApiKey(value.to_string())),
        "douban_cookies" => Ok(ConfigField::DoubanCookies(value.to_string())),
        "max_retries" => Ok(ConfigField::MaxRetries(parse_number(value, name)?)),
        "cache_expiry_days" => Ok(ConfigField::CacheExpiryDays(parse_number(value, name)?)),
        _ => Err(format!("unknown setting '{name}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(line: &str) -> Msg {
        match parse(line) {
            Ok(Some(Command::Dispatch(msg))) => msg,
            other => panic!("'{line}' parsed to {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn parses_filters_and_actions() {
        assert_eq!(msg("filter file"), Msg::FilterChanged(Filter::FileProcess));
        assert_eq!(msg("filter redo"), Msg::FilterChanged(Filter::Redo));
        assert_eq!(msg("compare"), Msg::BatchClicked(BatchMode::Compare));
        assert_eq!(msg("monitor off"), Msg::MonitorToggled(false));
        assert_eq!(parse("quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn parses_redo_subcommands() {
        assert_eq!(msg("redo"), Msg::RedoViewOpened);
        assert_eq!(msg("redo run 42"), Msg::ExecuteRedoClicked(42));
        assert_eq!(msg("redo all"), Msg::ProcessAllRedoClicked);
        assert_eq!(msg("redo cancel"), Msg::CancelRedoClicked);
        assert!(parse("redo run x").is_err());
    }

    #[test]
    fn directory_values_keep_inner_spaces() {
        assert_eq!(
            msg("dir set 0 source /mnt/My Movies"),
            Msg::DirectoryEdited {
                index: 0,
                field: DirectoryField::Source,
                value: "/mnt/My Movies".to_string(),
            }
        );
        assert_eq!(msg("dir rm 2"), Msg::DirectoryRemoved(2));
    }

    #[test]
    fn settings_fields_are_typed() {
        assert_eq!(
            msg("set max_retries 7"),
            Msg::ConfigFieldEdited(ConfigField::MaxRetries(7))
        );
        assert_eq!(
            msg("set douban_cookies bid=abc; ll=1"),
            Msg::ConfigFieldEdited(ConfigField::DoubanCookies("bid=abc; ll=1".to_string()))
        );
        assert!(parse("set cache_expiry_days soon").is_err());
        assert!(parse("set colour blue").is_err());
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert!(parse("launch").unwrap_err().contains("unknown command"));
    }
}
