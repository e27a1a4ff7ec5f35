//! Purpose: `rolodex` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits output.
//! Invariants: Commands emit stable stdout formats (human or JSON by command/flags).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.

use std::io::{self, IsTerminal};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};

mod contact_json;
mod render;

use contact_json::{check_json, contact_json};
use render::{detail_block, list_line};
use rolodex::api::{
    Contact, DEFAULT_MAX_DOCUMENT_BYTES, Error, ErrorKind, Source, decode_feed, to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `rolodex --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    dispatch(cli.command, cli.max_bytes, color_mode).map_err(|err| (err, color_mode))
}

#[derive(Debug, Parser)]
#[command(
    name = "rolodex",
    version,
    about = "Fetch and view JSON contact feeds",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"A feed is a JSON array of person objects. The `email` field may be a
single string or an array of strings; `phone` may be absent.

Mental model:
  - `list` prints one line per contact
  - `show` prints one contact in full
  - `check` decodes the feed and reports the result
"#,
    after_help = r#"EXAMPLES
  $ rolodex list contacts.json
  $ rolodex list https://example.com/contacts.json
  $ curl -s https://example.com/contacts.json | rolodex show - 2

LEARN MORE
  $ rolodex <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and human output: auto|always|never"
    )]
    color: ColorMode,
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DOCUMENT_BYTES,
        help = "Refuse feed documents larger than this many bytes"
    )]
    max_bytes: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Pretty,
    Jsonl,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "List every contact in a feed",
        after_help = r#"EXAMPLES
  $ rolodex list contacts.json
  $ rolodex list --format jsonl contacts.json | jq .first_name
  $ cat contacts.json | rolodex list -"#
    )]
    List {
        #[arg(help = "Feed source: a path, an http(s) url, or `-` for stdin")]
        source: String,
        #[arg(
            long,
            default_value = "pretty",
            value_enum,
            help = "Output format: pretty|jsonl"
        )]
        format: ListFormat,
    },
    #[command(
        about = "Show one contact in full",
        after_help = r#"EXAMPLES
  $ rolodex show contacts.json 1
  $ rolodex show --json contacts.json 2"#
    )]
    Show {
        #[arg(help = "Feed source: a path, an http(s) url, or `-` for stdin")]
        source: String,
        #[arg(help = "One-based position in the feed")]
        position: usize,
        #[arg(long, help = "Emit the contact as a JSON object")]
        json: bool,
    },
    #[command(
        about = "Decode a feed and report the result",
        after_help = r#"EXAMPLES
  $ rolodex check contacts.json
  {"ok":true,"source":"contacts.json","contacts":3}"#
    )]
    Check {
        #[arg(help = "Feed source: a path, an http(s) url, or `-` for stdin")]
        source: String,
    },
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(about = "Print version information")]
    Version,
}

fn dispatch(command: Command, max_bytes: usize, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::List { source, format } => {
            let contacts = load_feed(&source, max_bytes)?;
            match format {
                ListFormat::Pretty => {
                    let use_color = color_mode.use_color(io::stdout().is_terminal());
                    for (position, contact) in contacts.iter().enumerate() {
                        println!("{}", list_line(position + 1, contact, use_color));
                    }
                }
                ListFormat::Jsonl => {
                    for (position, contact) in contacts.iter().enumerate() {
                        let line = serde_json::to_string(&contact_json(position + 1, contact))
                            .map_err(json_encode_error)?;
                        println!("{line}");
                    }
                }
            }
            Ok(RunOutcome::ok())
        }
        Command::Show {
            source,
            position,
            json,
        } => {
            if position == 0 {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("positions are one-based")
                    .with_hint("Use `rolodex show <source> 1` for the first contact."));
            }
            let contacts = load_feed(&source, max_bytes)?;
            let contact = contacts.get(position - 1).ok_or_else(|| {
                Error::new(ErrorKind::NotFound)
                    .with_message(format!("no contact at position {position}"))
                    .with_hint(format!("The feed has {} contacts.", contacts.len()))
            })?;
            if json {
                let line = serde_json::to_string(&contact_json(position, contact))
                    .map_err(json_encode_error)?;
                println!("{line}");
            } else {
                let use_color = color_mode.use_color(io::stdout().is_terminal());
                println!("{}", detail_block(contact, use_color));
            }
            Ok(RunOutcome::ok())
        }
        Command::Check { source } => {
            let contacts = load_feed(&source, max_bytes)?;
            let line = serde_json::to_string(&check_json(&source, contacts.len()))
                .map_err(json_encode_error)?;
            println!("{line}");
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "rolodex", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
    }
}

fn load_feed(raw: &str, max_bytes: usize) -> Result<Vec<Contact>, Error> {
    let source = Source::parse(raw)?;
    let bytes = source.read(max_bytes)?;
    decode_feed(&bytes)
}

fn emit_version_output() {
    if io::stdout().is_terminal() {
        println!("rolodex {}", env!("CARGO_PKG_VERSION"));
    } else {
        let value = json!({
            "name": "rolodex",
            "version": env!("CARGO_PKG_VERSION"),
        });
        println!(
            "{}",
            serde_json::to_string(&value)
                .unwrap_or_else(|_| "{\"name\":\"rolodex\"}".to_string())
        );
    }
}

fn json_encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("failed to encode output json")
        .with_source(err)
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::MalformedDocument => "document is not valid json".to_string(),
        ErrorKind::UnexpectedShape => "unexpected document shape".to_string(),
        ErrorKind::MissingField => "required field is absent".to_string(),
        ErrorKind::TypeMismatch => "field has the wrong type".to_string(),
        ErrorKind::Http => "http request failed".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    use std::error::Error as StdError;
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(field) = err.field() {
        lines.push(format!(
            "{} {field}",
            colorize_label("field:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(index) = err.index() {
        lines.push(format!(
            "{} {index}",
            colorize_label("entry:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, clap_error_summary, error_json, error_text};
    use clap::Parser;
    use rolodex::api::{Error, ErrorKind};

    #[test]
    fn error_json_carries_field_and_index_context() {
        let err = Error::new(ErrorKind::TypeMismatch)
            .with_message("field `email` must be a string or an array of strings")
            .with_field("email")
            .with_index(4)
            .with_hint("Fix the feed entry and re-run.");
        let value = error_json(&err);
        let obj = value
            .get("error")
            .and_then(|v| v.as_object())
            .expect("error object");
        assert_eq!(
            obj.get("kind").and_then(|v| v.as_str()),
            Some("TypeMismatch")
        );
        assert_eq!(obj.get("field").and_then(|v| v.as_str()), Some("email"));
        assert_eq!(obj.get("index").and_then(|v| v.as_u64()), Some(4));
        assert!(obj.get("hint").is_some());
    }

    #[test]
    fn error_json_falls_back_to_kind_message() {
        let err = Error::new(ErrorKind::NotFound);
        let value = error_json(&err);
        assert_eq!(
            value["error"]["message"].as_str(),
            Some("not found")
        );
    }

    #[test]
    fn error_text_without_color_has_no_escapes() {
        let err = Error::new(ErrorKind::MissingField)
            .with_message("required field `lname` is absent")
            .with_field("lname")
            .with_index(0);
        let text = error_text(&err, false);
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("field: lname"));
        assert!(text.contains("entry: 0"));
    }

    #[test]
    fn clap_error_summary_strips_error_prefix() {
        let err = Cli::try_parse_from(["rolodex", "no-such-command"]).unwrap_err();
        let summary = clap_error_summary(&err);
        assert!(!summary.starts_with("error:"));
        assert!(!summary.is_empty());
    }
}
