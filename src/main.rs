use clap::{Parser, Subcommand};
use exitto::core::config::{self, CliOverrides};
use exitto::core::countries::NodeCode;
use exitto::core::env_store::EnvStore;
use exitto::core::torrc::{self, CurrentCode, DIRECTIVE_MARKER, PatchOutcome};
use exitto::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "exitto", about = "Choose the Tor exit node country")]
struct Args {
    /// Torrc file to edit (overrides TORRC_FILE_PATH and the config file)
    #[arg(short, long, global = true)]
    torrc: Option<PathBuf>,

    /// Env file remembering the torrc path
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Set the first exit node (country name or code, e.g. 'France' or 'fr')
    Set { country: NodeCode },
    /// Print the current first exit node
    Show,
    /// List the known countries and their node codes
    List,
}

fn main() -> std::io::Result<ExitCode> {
    let args = Args::parse();
    let cli = CliOverrides {
        torrc_file: args.torrc,
        env_file: args.env_file,
    };

    // Logging is configured by the file, so the file is read before the logger exists
    let (file_config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (Default::default(), Some(e)),
    };
    let resolved = config::resolve(&file_config, &cli);

    // Initialize file logger - the TUI owns the terminal
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("exitto starting up");
    if let Some(e) = config_error {
        log::warn!("Using default config: {}", e);
        eprintln!("Warning: {}", e);
    }

    let Some(command) = args.command else {
        let env = EnvStore::bootstrap(&resolved.env_file)?;
        // Re-resolve now that the env file is loaded
        let resolved = config::resolve(&file_config, &cli);
        log::info!("Env file: {}, torrc file: {:?}", env.path().display(), resolved.torrc_file);
        tui::run(resolved, env)?;
        return Ok(ExitCode::SUCCESS);
    };

    if let Err(e) = dotenv::from_path(&resolved.env_file) {
        log::debug!("No env file loaded from {}: {}", resolved.env_file.display(), e);
    }
    let resolved = config::resolve(&file_config, &cli);

    let torrc = resolved.torrc_file.as_deref();
    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    match command {
        Command::Set { country } => set_exit_node(torrc, country, &mut out, &mut err),
        Command::Show => show_exit_node(torrc, &mut out, &mut err),
        Command::List => {
            for node in NodeCode::ALL {
                writeln!(out, "{}  {}", node.code(), node.country())?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn require_torrc<'a>(torrc: Option<&'a Path>, err: &mut impl Write) -> io::Result<Option<&'a Path>> {
    if torrc.is_none() {
        writeln!(err, "No torrc file configured: pass --torrc or set TORRC_FILE_PATH.")?;
    }
    Ok(torrc)
}

/// `exitto set`: patches the torrc and reports the new exit node.
fn set_exit_node(
    torrc: Option<&Path>,
    node: NodeCode,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<ExitCode> {
    let Some(path) = require_torrc(torrc, err)? else {
        return Ok(ExitCode::FAILURE);
    };

    let outcome = torrc::patch_node(path, node);
    if !outcome.is_success() {
        writeln!(err, "Could not change exit node: {}.", outcome)?;
        return Ok(ExitCode::FAILURE);
    }
    if outcome == PatchOutcome::NoDirective {
        writeln!(
            err,
            "Note: {} has no {} line, nothing was written.",
            path.display(),
            DIRECTIVE_MARKER
        )?;
    }
    writeln!(out, "New Tor exit node: '{}'.", node.country())?;
    Ok(ExitCode::SUCCESS)
}

/// `exitto show`: prints the current first exit node.
fn show_exit_node(
    torrc: Option<&Path>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<ExitCode> {
    let Some(path) = require_torrc(torrc, err)? else {
        return Ok(ExitCode::FAILURE);
    };

    match torrc::read_current_code(path) {
        CurrentCode::Configured(code) => {
            match NodeCode::parse(&code) {
                Some(node) => writeln!(out, "{} ({})", node.country(), node.code())?,
                None => writeln!(out, "{} (unknown country)", code)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        CurrentCode::NotConfigured => {
            writeln!(out, "No {} line in {}: not configured.", DIRECTIVE_MARKER, path.display())?;
            Ok(ExitCode::SUCCESS)
        }
        CurrentCode::Malformed => {
            writeln!(
                err,
                "The {} line in {} has no {{code}} token.",
                DIRECTIVE_MARKER,
                path.display()
            )?;
            Ok(ExitCode::FAILURE)
        }
        CurrentCode::FileMissing => {
            writeln!(err, "Please give a valid torrc file!")?;
            Ok(ExitCode::FAILURE)
        }
        CurrentCode::Unreadable(e) => {
            writeln!(err, "Could not read {}: {}", path.display(), e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Uniquely named directory under the system temp dir, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn with_torrc(content: &str) -> (Self, PathBuf) {
            let dir = std::env::temp_dir().join(format!("exitto-cli-{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            let torrc = dir.join("torrc");
            fs::write(&torrc, content).unwrap();
            (Scratch(dir), torrc)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn run_set(torrc: Option<&Path>, node: NodeCode) -> (ExitCode, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = set_exit_node(torrc, node, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn run_show(torrc: Option<&Path>) -> (ExitCode, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = show_exit_node(torrc, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_set_prints_new_exit_node() {
        let (_dir, torrc) = Scratch::with_torrc("ExitNodes {be}, {us}\n");

        let (code, out, err) = run_set(Some(&torrc), NodeCode::Fr);

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "New Tor exit node: 'France'.\n");
        assert!(err.is_empty());
        assert_eq!(fs::read_to_string(&torrc).unwrap(), "ExitNodes {fr}, {us}\n");
    }

    #[test]
    fn test_set_without_directive_notes_it_and_succeeds() {
        let (_dir, torrc) = Scratch::with_torrc("SocksPort 9050\n");

        let (code, out, err) = run_set(Some(&torrc), NodeCode::Jp);

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "New Tor exit node: 'Japan'.\n");
        assert!(err.contains("no ExitNodes line"));
        assert_eq!(fs::read_to_string(&torrc).unwrap(), "SocksPort 9050\n");
    }

    #[test]
    fn test_set_missing_file_fails() {
        let (dir, _) = Scratch::with_torrc("");
        let missing = dir.0.join("not_a_file");

        let (code, out, err) = run_set(Some(&missing), NodeCode::Be);

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("please give a valid torrc file"));
        assert!(!missing.exists());
    }

    #[test]
    fn test_set_malformed_directive_fails() {
        let (_dir, torrc) = Scratch::with_torrc("ExitNodes\n");

        let (code, out, err) = run_set(Some(&torrc), NodeCode::Be);

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert!(err.starts_with("Could not change exit node"));
    }

    #[test]
    fn test_set_without_torrc_fails() {
        let (code, out, err) = run_set(None, NodeCode::Us);

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("No torrc file configured"));
    }

    #[test]
    fn test_show_reports_country_and_code() {
        let (_dir, torrc) = Scratch::with_torrc("ExitNodes {ch}, {us}\n");

        let (code, out, _) = run_show(Some(&torrc));

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "Switzerland (ch)\n");
    }

    #[test]
    fn test_show_unknown_code_and_not_configured() {
        let (_dir, torrc) = Scratch::with_torrc("ExitNodes {de}\n");
        assert_eq!(run_show(Some(&torrc)).1, "de (unknown country)\n");

        let (_dir, torrc) = Scratch::with_torrc("SocksPort 9050\n");
        let (code, out, _) = run_show(Some(&torrc));
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(out.contains("not configured"));
    }

    #[test]
    fn test_show_missing_file_fails() {
        let (code, _, err) = run_show(Some(Path::new("not_a_file")));
        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(err, "Please give a valid torrc file!\n");
    }

    #[test]
    fn test_country_argument_accepts_code_or_name() {
        let args = Args::try_parse_from(["exitto", "set", "France"]).unwrap();
        assert!(matches!(args.command, Some(Command::Set { country: NodeCode::Fr })));

        let args = Args::try_parse_from(["exitto", "--torrc", "/etc/tor/torrc", "set", "us"]).unwrap();
        assert!(matches!(args.command, Some(Command::Set { country: NodeCode::Us })));
        assert_eq!(args.torrc, Some(PathBuf::from("/etc/tor/torrc")));

        assert!(Args::try_parse_from(["exitto", "set", "Germany"]).is_err());
    }
}
