use bprun::prelude::*;
use clap::{Args, Parser, Subcommand};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Executes node-editor blueprints from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log engine activity to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute the request's target node and print its outputs as JSON
    Run(RunArgs),
    /// Print the blueprint built from a request without executing it
    Echo(RequestArgs),
    /// List the registered node types
    Types(RegistryArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Path to the request JSON file ({nodes, edges, target})
    request_path: String,

    /// Fail when two nodes share an id instead of keeping the later one
    #[arg(long)]
    strict_ids: bool,
}

#[derive(Args, Debug)]
struct RegistryArgs {
    /// Render absent `concat` inputs as empty strings instead of `<nil>`
    #[arg(long)]
    nil_as_empty: bool,

    /// Run nodes of one type with a built-in executor, e.g. `join=concat`
    #[arg(long = "type-map", value_name = "USER=BUILTIN")]
    type_mappings: Vec<String>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    registry: RegistryArgs,

    /// Node to execute instead of the request's own target
    #[arg(short, long)]
    target: Option<String>,

    /// Maximum length of a dependency chain (unbounded if omitted)
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => run_request(args),
        Command::Echo(args) => echo_request(args),
        Command::Types(args) => list_types(args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry(args: &RegistryArgs) -> ExecutorRegistry {
    let mut builder = ExecutorRegistry::builder();
    if args.nil_as_empty {
        builder = builder.with_null_rendering(NullRendering::Empty);
    }
    for mapping in &args.type_mappings {
        let Some((user_type, builtin_type)) = mapping.split_once('=') else {
            exit_with_error(&format!(
                "Invalid type mapping '{}', expected USER=BUILTIN",
                mapping
            ));
        };
        builder = builder.with_type_mapping(user_type, builtin_type);
    }
    builder.build()
}

fn load_blueprint(args: &RequestArgs) -> (Blueprint, String) {
    let request = RunRequest::from_file(&args.request_path)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let policy = if args.strict_ids {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::LastWins
    };
    request
        .into_parts(policy)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build blueprint: {}", e)))
}

fn run_request(args: RunArgs) {
    let registry = build_registry(&args.registry);
    let (blueprint, request_target) = load_blueprint(&args.request);
    let target = args.target.unwrap_or(request_target);

    let start = Instant::now();
    let mut evaluator = Evaluator::new(&registry);
    if let Some(max_depth) = args.max_depth {
        evaluator = evaluator.with_max_depth(max_depth);
    }
    let outputs = evaluator
        .execute(&blueprint, &target)
        .unwrap_or_else(|e| exit_with_error(&format!("Execution failed: {}", e)));
    tracing::info!(elapsed = ?start.elapsed(), target_node = %target, "execution finished");

    print_json(&outputs);
}

fn echo_request(args: RequestArgs) {
    let (blueprint, _) = load_blueprint(&args);
    print_json(&blueprint);
}

fn list_types(args: RegistryArgs) {
    let registry = build_registry(&args);
    for node_type in registry.node_types() {
        println!("{}", node_type);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
