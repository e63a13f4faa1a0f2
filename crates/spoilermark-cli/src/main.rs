use anyhow::{Context, Result, bail};
use log::{debug, info};
use spoilermark_config::Config;
use std::{
    env,
    io::{self, Read, Write},
    path::PathBuf,
    process,
};

const USAGE: &str = "Usage: spoilermark [--explain] [--config <path>] [FILE]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    explain: bool,
    config_path: Option<PathBuf>,
    /// `None` reads stdin.
    input: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--explain" => options.explain = true,
            "-h" | "--help" => options.help = true,
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "-" => options.input = None,
            flag if flag.starts_with('-') => bail!("Unknown option '{flag}'"),
            path => {
                if options.input.is_some() {
                    bail!("Only one input file may be given");
                }
                options.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

fn load_config(options: &Options) -> Result<Config> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(Config::config_path);

    let config = Config::load_from_path(&config_path)
        .with_context(|| format!("Failed to load config file '{}'", config_path.display()))?;

    match config {
        Some(config) => {
            info!("Using config file '{}'", config_path.display());
            Ok(config)
        }
        None if options.config_path.is_some() => {
            bail!("Config file '{}' does not exist", config_path.display())
        }
        None => Ok(Config::default()),
    }
}

fn read_message(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message from '{}'", path.display())),
        None => {
            let mut message = String::new();
            io::stdin()
                .read_to_string(&mut message)
                .context("Failed to read message from stdin")?;
            Ok(message)
        }
    }
}

fn render_output(config: &Config, message: &str, explain: bool) -> String {
    let masker = config.masker();
    if explain {
        let mut listing = masker.trace(message).to_string();
        listing.push('\n');
        listing
    } else {
        masker.mask(message)
    }
}

fn run(args: &[String]) -> Result<()> {
    let options = parse_args(args)?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = load_config(&options)?;
    let message = read_message(options.input.as_ref())?;
    debug!("Masking {} bytes with {:?}", message.len(), config.mask_char);

    let output = render_output(&config, &message, options.explain);
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        eprintln!("{USAGE}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_no_args_reads_stdin() {
        assert_eq!(parse_args(&[]).unwrap(), Options::default());
    }

    #[test]
    fn parse_all_options() {
        let options = parse_args(&args(&["--explain", "--config", "c.toml", "msg.txt"])).unwrap();
        assert_eq!(
            options,
            Options {
                explain: true,
                config_path: Some(PathBuf::from("c.toml")),
                input: Some(PathBuf::from("msg.txt")),
                help: false,
            }
        );
    }

    #[test]
    fn parse_dash_means_stdin() {
        assert_eq!(parse_args(&args(&["-"])).unwrap().input, None);
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        let err = parse_args(&args(&["--bogus"])).unwrap_err();
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn parse_rejects_missing_config_path() {
        assert!(parse_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn parse_rejects_two_inputs() {
        assert!(parse_args(&args(&["a.txt", "b.txt"])).is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let options = Options {
            config_path: Some(temp_dir.path().join("missing.toml")),
            ..Options::default()
        };
        assert!(load_config(&options).is_err());
    }

    #[test]
    fn config_mask_char_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "mask_char = \"#\"\n").unwrap();
        let options = Options {
            config_path: Some(config_file),
            ..Options::default()
        };

        let config = load_config(&options).unwrap();
        assert_eq!(render_output(&config, "!!abc!!\n", false), "###\n");
    }

    #[test]
    fn read_message_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("message.txt");
        std::fs::write(&path, "hi !!there!!").unwrap();

        assert_eq!(read_message(Some(&path)).unwrap(), "hi !!there!!");
    }

    #[test]
    fn output_is_verbatim_without_trailing_newline() {
        assert_eq!(
            render_output(&Config::default(), "!!a!! !!b!!", false),
            "* *"
        );
    }

    #[test]
    fn explain_lists_tokens_spans_and_output() {
        let listing = render_output(&Config::default(), "!!ab!!", true);
        assert_eq!(
            listing,
            "0: Marker@0..2 \"!!\"\n\
             1: Content@2..4 \"ab\"\n\
             2: Marker@4..6 \"!!\"\n\
             span 0..=2\n\
             output \"**\"\n"
        );
    }
}
