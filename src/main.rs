// Football analysis assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not the terminal used by the chat)
// 2. Load config
// 3. Build the tool dispatcher (mock or live provider per config)
// 4. Build the LLM client
// 5. Run the chat loop on stdin/stdout until EOF or "quit"

use touchline::app::Agent;
use touchline::config;
use touchline::llm::client::LlmClient;
use touchline::tools::dispatch::ToolDispatcher;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Touchline assistant starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: mocks={}, model={}, max_tool_rounds={}",
        config.provider.enable_mocks, config.llm.model, config.llm.max_tool_rounds
    );

    // 3. Build the tool dispatcher
    let dispatcher =
        ToolDispatcher::from_config(&config).context("failed to build tool dispatcher")?;

    // 4. Build the LLM client
    let llm_client = LlmClient::from_config(&config);
    match &llm_client {
        LlmClient::Active(_) => info!("LLM client initialized (API key configured)"),
        LlmClient::Disabled => info!("LLM client disabled (no API key)"),
    }

    let agent = Agent::new(llm_client, dispatcher, &config);

    // 5. Chat loop
    let mut history = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"Ask about a football player (\"quit\" to exit).\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        match agent.run_turn(&mut history, input).await {
            Ok(answer) => {
                stdout.write_all(answer.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Err(e) => {
                stdout
                    .write_all(format!("assistant error: {e:#}\n").as_bytes())
                    .await?;
            }
        }
    }

    info!("Touchline assistant shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file so stdout stays clean for the chat.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("touchline.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("touchline=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
