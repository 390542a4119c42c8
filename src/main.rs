use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use oxidized_agri::{
    agents::DEFAULT_GOAL,
    build_state,
    config::Config,
    models::ErrorResponse,
    routes::create_router,
    utils::init_logger,
};

#[derive(Parser)]
#[command(name = "oxidized-agri")]
#[command(about = "Find, summarize and store recent AI research papers on agriculture", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full workflow and print the structured JSON report
    Run {
        /// User identifier for stateful execution
        #[arg(long)]
        user_id: String,
        /// Goal to execute
        #[arg(long, default_value = DEFAULT_GOAL)]
        goal: String,
    },
    /// List a user's jobs, newest first
    Jobs {
        #[arg(long)]
        user_id: String,
    },
    /// Print the stored report of one job
    Show {
        #[arg(long)]
        job_id: String,
    },
    /// Start the web form
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let state = build_state(&config).await?;

    match cli.command {
        Commands::Run { user_id, goal } => match state.agent.run(&user_id, &goal).await {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Err(e) => {
                let body = ErrorResponse {
                    error: e.to_string(),
                    kind: e.source.kind().to_string(),
                    job_id: e.job_id.clone(),
                };
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Err(e.into());
            }
        },
        Commands::Jobs { user_id } => {
            let jobs = state.store.list_jobs(&user_id).await?;
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
        Commands::Show { job_id } => match state.store.get_job(&job_id).await? {
            Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            None => anyhow::bail!("Unknown job_id: {}", job_id),
        },
        Commands::Serve => {
            let app = create_router(state);

            let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
            info!("Server listening on {}", addr);

            let listener = TcpListener::bind(addr).await?;
            axum::serve(listener, app).await.map_err(|e| {
                error!(error = %e, "Server error");
                anyhow::anyhow!("Server error: {}", e)
            })?;
        }
    }

    Ok(())
}
