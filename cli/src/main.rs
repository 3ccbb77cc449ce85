use bumpalo::Bump;
use clap::Parser;
use evalconst::fixtures::{self, Fixture};
use evalconst::{EvalOptions, Error, PREFIX_OPTION};
use miette::Result;
use tracing::debug;

/// evalconst - fold calls to marker functions into constants
#[derive(Parser, Debug)]
#[command(name = "evalconst")]
#[command(about = "Run the constant folding pass over a sample program", long_about = None)]
struct Args {
    /// Name prefix of functions whose calls may be folded
    #[arg(long)]
    prefix: Option<String>,

    /// Maximum number of loop iterations per folded call
    #[arg(long)]
    step_limit: Option<u64>,

    /// Maximum call depth per folded call
    #[arg(long)]
    stack_limit: Option<usize>,

    /// Pass option in KEY=VALUE form, as a compiler plugin would receive it
    #[arg(short = 'P', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Print every function of the program before folding
    #[arg(long)]
    show_ir: bool,

    /// List the available fixtures and exit
    #[arg(long)]
    list: bool,

    /// More logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Fixture to fold, or "all"
    #[arg(default_value = "all")]
    fixture: String,
}

impl Args {
    fn eval_options(&self) -> Result<EvalOptions, Error> {
        let mut options = EvalOptions::default();
        for option in &self.options {
            let (key, value) = option.split_once('=').unwrap_or((option.as_str(), ""));
            options.apply_option(key, value)?;
        }
        if let Some(prefix) = &self.prefix {
            options.apply_option(PREFIX_OPTION, prefix)?;
        }
        if let Some(limit) = self.step_limit {
            options.step_limit = limit;
        }
        if let Some(limit) = self.stack_limit {
            options.stack_limit = limit;
        }
        Ok(options)
    }

    fn fixtures(&self) -> Result<Vec<&'static Fixture>, Error> {
        if self.fixture == "all" {
            return Ok(fixtures::ALL.iter().collect());
        }
        fixtures::find(&self.fixture)
            .map(|f| vec![f])
            .ok_or_else(|| Error::UnknownFixture(self.fixture.clone()))
    }
}

fn run_fixture(fixture: &Fixture, options: &EvalOptions, show_ir: bool) -> Result<()> {
    let arena = Bump::new();
    let program = fixture.build(&arena);

    println!("=== {} ({}) ===", fixture.name, fixture.description);
    if show_ir {
        for function in program.functions().filter(|f| f.body.is_some()) {
            println!("{}", program.render_function(function.id));
        }
        println!();
    }

    let folded = evalconst::fold(&arena, &program, options)?;
    debug!(
        fixture = fixture.name,
        folded = folded.report.folded_count(),
        "fixture folded"
    );

    if let Some(main) = folded.program.find("main") {
        println!("{}", folded.program.render_function(main.id));
    }
    for record in &folded.report.records {
        println!(
            "  {} in {}: {}",
            record.call,
            folded.program.function_name(record.function),
            record.verdict
        );
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG wins over -v
    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if args.list {
        for fixture in fixtures::ALL {
            println!("{:<24} {}", fixture.name, fixture.description);
        }
        return Ok(());
    }

    let options = args.eval_options()?;
    debug!(?options, "pass options");
    for fixture in args.fixtures()? {
        run_fixture(fixture, &options, args.show_ir)?;
    }
    Ok(())
}
