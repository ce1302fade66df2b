use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sonar analysis build step for NetWeaver development components
#[derive(Parser, Debug)]
#[command(
    name = "nwdi-sonar",
    about = "Sonar analysis build step for NetWeaver development components",
    version,
    author,
    long_about = "nwdi-sonar generates a Maven POM for every affected NWDI development \
                  component that carries Java source and runs `mvn sonar:sonar` against it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "FILE",
        help = "Configuration file (YAML)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run Sonar for all affected Java components",
        long_about = "Writes sonar-pom.xml into each affected component's base location and \
                      runs Maven against it.\n\n\
                      Examples:\n  \
                      nwdi-sonar run --components components.yaml\n  \
                      nwdi-sonar run --components components.json --workspace /var/nwdi --format json"
    )]
    Run(RunArgs),

    #[command(
        about = "Render the Sonar POM of a single component",
        long_about = "Prints the POM that `run` would write for one component.\n\n\
                      Examples:\n  \
                      nwdi-sonar render --components components.yaml --component example.org:example/app\n  \
                      nwdi-sonar render --components components.yaml --component example.org:example/app -o pom.xml"
    )]
    Render(RenderArgs),

    #[command(
        about = "List discovered Maven installations",
        long_about = "Lists configured installations followed by MAVEN_HOME and M2_HOME. \
                      The first entry is used by `run`."
    )]
    Installations(InstallationsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_name = "FILE", help = "Component manifest (YAML or JSON)")]
    pub components: PathBuf,

    #[arg(
        short = 'w',
        long,
        value_name = "DIR",
        help = "NWDI workspace root (overrides configuration)"
    )]
    pub workspace: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[arg(long, value_name = "FILE", help = "Component manifest (YAML or JSON)")]
    pub components: PathBuf,

    #[arg(long, value_name = "VENDOR:NAME", help = "Component to render")]
    pub component: String,

    #[arg(
        short = 'w',
        long,
        value_name = "DIR",
        help = "NWDI workspace root (overrides configuration)"
    )]
    pub workspace: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the POM to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InstallationsArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
