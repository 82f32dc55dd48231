use clap::{Parser, Subcommand, ValueEnum};
use site_fx::demo::{self, DemoOptions};
use site_fx::footer::{self, FooterTemplate};
use site_fx::page::Capabilities;
use site_fx::{config, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "site-fx")]
#[command(about = "Page effects for a static institutional website")]
#[command(long_about = "\
Page effects for a static institutional website

Reveal-on-scroll, text splitting, scroll progress, parallax, page loader,
statistic counters, FAQ accordion, testimonial carousel, smooth anchor
scrolling, form validation and a generated footer, run against a headless
page model.

Markup contract:

  .reveal / .text-reveal / .char-reveal   revealed on scroll (class `revealed`)
  .parallax-layer[data-speed]             shifted against scroll
  #page-loader                            hidden after load, then removed
  .counter[data-target][data-suffix]      counts up when half visible
  .faq-item > .faq-question               one open at a time (class `open`)
  #testimonial-track > .testimonial-slide rotated every interval
  form[data-validate] [required]          blank fields get class `error`
  #footer-placeholder                     replaced by the footer

Run 'site-fx gen-config' to generate a documented site-fx.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing site-fx.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log behavior activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateArg {
    Full,
    Compact,
}

impl From<TemplateArg> for FooterTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Full => FooterTemplate::Full,
            TemplateArg::Compact => FooterTemplate::Compact,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the footer markup
    Footer {
        /// Copyright year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Override the configured footer layout
        #[arg(long, value_enum)]
        template: Option<TemplateArg>,
    },
    /// Print a stock site-fx.toml with all options documented
    GenConfig,
    /// Load and validate site-fx.toml
    Check,
    /// Run the scripted demo session and write an HTML snapshot
    Demo {
        /// Directory for index.html and report.json
        #[arg(long, default_value = "demo-out")]
        output: PathBuf,
        /// Simulate a visitor who prefers reduced motion
        #[arg(long)]
        reduced_motion: bool,
        /// Simulate a browser without IntersectionObserver
        #[arg(long)]
        no_observer: bool,
        /// Print the session report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Footer { year, template } => {
            let mut fx = config::load_config(&cli.config_dir)?;
            if let Some(template) = template {
                fx.footer.template = template.into();
            }
            let year = year.unwrap_or_else(footer::current_year);
            println!("{}", footer::render_footer(&fx.footer, year).into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Check => {
            let fx = config::load_config(&cli.config_dir)?;
            let path = cli.config_dir.join(config::CONFIG_FILE);
            let source = path.exists().then_some(path.as_path());
            output::print_check_output(&fx, source);
        }
        Command::Demo {
            output: out_dir,
            reduced_motion,
            no_observer,
            json,
        } => {
            let fx = config::load_config(&cli.config_dir)?;
            let options = DemoOptions {
                capabilities: Capabilities {
                    intersection_observer: !no_observer,
                    reduced_motion,
                },
                ..DemoOptions::default()
            };
            let run = demo::run(&fx, &options);
            let page = demo::write_output(&out_dir, &run)?;
            if json {
                println!("{}", demo::report_json(&run.report)?);
            } else {
                output::print_demo_report(&run.report, Some(&page));
            }
        }
    }

    Ok(())
}
