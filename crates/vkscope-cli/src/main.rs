use clap::{Parser, Subcommand, ValueEnum};

mod catalog;
mod probe;
mod report;
mod verify;

#[derive(Parser)]
#[command(name = "vkscope")]
#[command(about = "vkscope - inspect Vulkan entry point resolution")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to /etc/vkscope/vkscope.toml, then ./vkscope.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless VKSCOPE_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every table against the Vulkan loader and report the result
    Probe {
        /// Skip logical device creation
        #[arg(long)]
        no_device: bool,

        /// List entry points that did not resolve
        #[arg(long)]
        show_unresolved: bool,
    },

    /// Check configuration, loader and instance creation
    Verify,

    /// Print the command catalogs
    Catalog {
        /// Only print one scope
        #[arg(short, long)]
        scope: Option<ScopeArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Global,
    Instance,
    Device,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        vkscope_common::logging::init_logging_with_default("debug");
    } else {
        vkscope_common::init_logging();
    }

    let config_path = cli
        .config
        .unwrap_or_else(vkscope_core::config::default_config_path);

    match cli.command {
        Commands::Probe {
            no_device,
            show_unresolved,
        } => {
            let mut config = vkscope_core::VkscopeConfig::load_or_default(&config_path);
            if no_device {
                config.probe.create_device = false;
            }
            if show_unresolved {
                config.probe.show_unresolved = true;
            }
            if cli.json {
                config.probe.output = vkscope_core::OutputFormat::Json;
            }
            probe::run_probe(&config)
        }
        Commands::Verify => verify::run_verify(&config_path, cli.json),
        Commands::Catalog { scope } => catalog::run_catalog(scope, cli.json),
    }
}
