//! `sgr run` — run one task to completion, streaming progress to the
//! terminal and answering clarification requests from stdin.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use sgr_agent::{Agent, StrategyRegistry};
use sgr_core::context::AgentState;
use sgr_core::relay::{AgentStreamEvent, ChannelRelay};
use sgr_providers::OpenAiCompatBackend;
use sgr_tools::default_toolkit;

pub async fn run(
    task: &str,
    config_path: &Path,
    strategy_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = sgr_config::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for an API key early — give a clear error
    if config.llm.api_key.is_empty() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    SGR_API_KEY    = 'sk-...'");
        eprintln!("    OPENAI_API_KEY = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", config_path.display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let registry = StrategyRegistry::with_defaults();
    let strategy = registry.create(strategy_name).map_err(|_| {
        format!(
            "Unknown strategy '{strategy_name}'. Available: {}",
            registry.names().join(", ")
        )
    })?;

    let model = config.llm.model.clone();
    let backend = Arc::new(OpenAiCompatBackend::from_config(&config.llm));
    let (relay, mut events) = ChannelRelay::new();
    let agent = Agent::new(
        task,
        config,
        default_toolkit(),
        backend,
        Arc::new(relay),
        strategy,
    );
    let handle = agent.clarifications();

    println!();
    println!("  Agent:    {}", agent.id());
    println!("  Strategy: {strategy_name}");
    println!("  Model:    {model}");
    println!("  Task:     {task}");
    println!();

    let run = tokio::spawn(agent.execute());

    // Questions carried by the last clarification tool call, shown when the
    // run suspends.
    let mut pending_questions: Vec<String> = Vec::new();

    while let Some(event) = events.recv().await {
        match event {
            AgentStreamEvent::Chunk { content } => {
                print!("{content}");
                std::io::stdout().flush()?;
            }
            AgentStreamEvent::ToolCall { name, arguments, .. } => {
                if name == "clarification" {
                    pending_questions = arguments["questions"]
                        .as_array()
                        .map(|qs| {
                            qs.iter()
                                .filter_map(|q| q.as_str().map(str::to_string))
                                .collect()
                        })
                        .unwrap_or_default();
                }
                eprintln!("  [{name}]");
            }
            AgentStreamEvent::Done { result: Some(_) } => break,
            AgentStreamEvent::Done { result: None } => {
                // A closed segment without a result is either a suspension
                // or a failed run's teardown.
                if handle.state() != AgentState::WaitingForClarification {
                    break;
                }
                println!();
                println!("  The agent needs clarification:");
                for question in pending_questions.drain(..) {
                    println!("    ? {question}");
                }
                print!("  Answer > ");
                std::io::stdout().flush()?;

                let answer = tokio::task::spawn_blocking(|| {
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line).map(|_| line)
                })
                .await??;
                handle.provide(answer.trim())?;
                println!();
            }
        }
    }

    let report = run.await?;
    println!();
    println!(
        "  Finished: {} ({} iterations, {} searches, {} clarifications)",
        report.state, report.iterations, report.searches_used, report.clarifications_used
    );
    if report.state == AgentState::Failed {
        return Err("Agent run failed. Re-run with --verbose for details.".into());
    }
    Ok(())
}
