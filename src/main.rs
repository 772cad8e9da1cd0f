use argh::FromArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tree_census_stats::config::AnalysisParams;
use tree_census_stats::logging::init_logging;
use tree_census_stats::pipeline::{run, PipelineOptions};

/// Grouped statistics, charts and CSV summaries for a street tree census export
#[derive(FromArgs, Debug)]
pub struct Args {
    /// census CSV file (.csv or .csv.zst)
    #[argh(positional)]
    input: PathBuf,

    /// directory receiving the summary CSVs and charts (default: .)
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// TOML file with analysis parameters
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// smallest diameter kept by the filter, in inches
    #[argh(option)]
    min_dbh: Option<f64>,

    /// largest diameter kept by the filter, in inches
    #[argh(option)]
    max_dbh: Option<f64>,

    /// tree status kept by the filter
    #[argh(option)]
    status: Option<String>,

    /// city kept by the filter
    #[argh(option)]
    city: Option<String>,

    /// rows of each summary to print
    #[argh(option, short = 'n')]
    top_n: Option<usize>,

    /// histogram bins
    #[argh(option, short = 'b')]
    bins: Option<usize>,

    /// skip chart rendering
    #[argh(switch)]
    no_charts: bool,

    /// hide the progress bar
    #[argh(switch)]
    no_progress: bool,

    /// log filter, overridden by RUST_LOG (default: info)
    #[argh(option, default = "String::from(\"info\")")]
    log_level: String,

    /// show log targets and line numbers
    #[argh(switch, short = 'v')]
    verbose: bool,
}

impl Args {
    fn params(&self) -> Result<AnalysisParams, Box<dyn std::error::Error>> {
        let mut params = match &self.config {
            Some(path) => AnalysisParams::load(path)?,
            None => AnalysisParams::default(),
        };

        if let Some(min_dbh) = self.min_dbh {
            params.min_dbh = min_dbh;
        }
        if let Some(max_dbh) = self.max_dbh {
            params.max_dbh = max_dbh;
        }
        if let Some(status) = &self.status {
            params.status = status.clone();
        }
        if let Some(city) = &self.city {
            params.city = city.clone();
        }
        if let Some(top_n) = self.top_n {
            params.top_n = top_n;
        }
        if let Some(bins) = self.bins {
            params.bins = bins;
        }

        params.validate()?;
        Ok(params)
    }
}

fn run_cli(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.is_file() {
        return Err(format!("Input file '{}' does not exist", args.input.display()).into());
    }

    let options = PipelineOptions {
        params: args.params()?,
        render_charts: !args.no_charts,
        show_progress: !args.no_progress,
        ..PipelineOptions::new(&args.input, &args.output_dir)
    };

    println!("Loading data from '{}'...", args.input.display());
    let summary = run(&options, &mut std::io::stdout().lock())?;

    println!("Analysis complete!");
    println!("Summaries written: {}", summary.exported.len());
    println!("Charts written: {}", summary.charts.len());
    Ok(())
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    init_logging(&args.log_level, args.verbose);

    match run_cli(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
