use clap::{Parser, Subcommand};
use objpath::{Context, Engine, EnumType, Value, Zone};
use tracing::Level;

/// Resolve paths in JSON documents and coerce text into typed values.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a dot/bracket path such as `order.items[0].price`.
    Resolve {
        /// JSON document (string). You can also pipe a file using shell quoting.
        json: String,
        /// Path expression
        path: String,
    },
    /// Coerce text into a named type, e.g. `int`, `local_date`, `instant`.
    Coerce {
        /// Text to convert
        text: String,
        /// Target type name
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Zone for zone-less dates: utc, system, an IANA id or ±HH:MM
        #[arg(long, default_value = "utc")]
        zone: Zone,
        /// Enum to declare before coercing, as `Name=A,B,C`
        #[arg(long = "enum", value_name = "NAME=CONSTANTS", value_parser = parse_enum_decl)]
        enums: Vec<EnumType>,
    },
}

/// Parses `Name=A,B,C`; the name and every constant must be non-empty.
fn parse_enum_decl(decl: &str) -> Result<EnumType, String> {
    let (name, constants) = decl
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=A,B,C, found `{decl}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing enum name in `{decl}`"));
    }
    let constants: Vec<&str> = constants.split(',').map(str::trim).collect();
    if constants.iter().any(|c| c.is_empty()) {
        return Err(format!("empty constant in `{decl}`"));
    }
    Ok(EnumType::new(name, constants))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> objpath::Result<Value> {
    match command {
        Command::Resolve { json, path } => Engine::default().resolve_json(&json, &path),
        Command::Coerce {
            text,
            type_name,
            zone,
            enums,
        } => {
            let mut engine = Engine::new(Context::with_zone(zone));
            for enum_type in enums {
                engine.registry_mut().register_enum(enum_type);
            }
            engine.coerce_named(Some(&text), &type_name)
        }
    }
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args.command) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Cannot render result: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_declarations() {
        let color = parse_enum_decl("Color=RED, GREEN,BLUE").unwrap();
        assert_eq!(color, EnumType::new("Color", ["RED", "GREEN", "BLUE"]));

        assert!(parse_enum_decl("Color").is_err());
        assert!(parse_enum_decl("Color=").is_err());
        assert!(parse_enum_decl("=RED").is_err());
        assert!(parse_enum_decl("Color=RED,,BLUE").is_err());
    }

    #[test]
    fn bad_enum_flag_is_a_usage_error() {
        let out = Args::try_parse_from(["objpath", "coerce", "RED", "Color", "--enum", "Color"]);
        assert!(out.is_err());
        let ok = Args::try_parse_from(["objpath", "coerce", "RED", "Color", "--enum", "Color=RED"]);
        assert!(ok.is_ok());
    }
}
