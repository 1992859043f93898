use clap::Parser;
use phylo_consensus::cli::{self, Commands};
use phylo_consensus::commands;
use phylo_consensus::config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let config = Config::load();

    let result = match args.command {
        Commands::WriteReport {
            tree_summary,
            mutation_list,
            mutation_assignments,
            output_dir,
            outputs,
            no_compress,
        } => commands::write_report::run(
            tree_summary,
            mutation_list,
            mutation_assignments,
            output_dir,
            outputs,
            no_compress,
            config,
        ),
        Commands::Summarize {
            tree_summary,
            mutation_list,
            mutation_assignments,
            output_file,
        } => commands::summarize::run(
            tree_summary,
            mutation_list,
            mutation_assignments,
            output_file,
            config,
        ),
        Commands::InitConfig => commands::init_config::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
