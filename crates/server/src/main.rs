mod api;
mod noop;
mod router;
mod state;

use std::sync::Arc;

use tracing::{info, warn};

use decoywatch_bus::EventBus;
use decoywatch_core::Config;
use decoywatch_enrich::{Classifier, Correlator, Orchestrator, TicketGenerator};
use decoywatch_llm::{AttackKnowledge, GeminiProvider, LlmEnrichment, LlmProvider};
use decoywatch_notify::GithubSubmitter;
use decoywatch_rules::Corpus;

use crate::noop::NoopEnrichment;
use crate::state::AppState;

/// Build the classify / correlate / generate capabilities from config.
///
/// Without an API key the pipeline degrades to raw broadcast plus rule
/// matching instead of refusing to start.
fn build_capabilities(
    config: &Config,
) -> (
    Arc<dyn Classifier>,
    Arc<dyn Correlator>,
    Arc<dyn TicketGenerator>,
) {
    let Some(api_key) = config.llm.api_key.clone() else {
        warn!("no LLM API key configured, enrichment runs will produce no results");
        let noop = Arc::new(NoopEnrichment);
        return (noop.clone(), noop.clone(), noop);
    };

    let provider: Arc<dyn LlmProvider> =
        Arc::new(GeminiProvider::new(api_key, config.llm.model.clone()));

    let knowledge = match AttackKnowledge::load(&config.llm.knowledge_path) {
        Ok(k) => k,
        Err(e) => {
            warn!(error = %e, "ATT&CK dataset unavailable, classifier runs without it");
            AttackKnowledge::from_value(serde_json::json!({ "techniques": [] }))
        }
    };

    let agent = Arc::new(LlmEnrichment::new(provider, knowledge));
    (agent.clone(), agent.clone(), agent)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let bus = EventBus::new();

    let (classifier, correlator, generator) = build_capabilities(&config);
    let mut orchestrator = Orchestrator::new(bus.clone(), classifier, correlator, generator);

    if let (Some(token), Some(owner), Some(repo)) = (
        config.github.token.clone(),
        config.github.owner.clone(),
        config.github.repo.clone(),
    ) {
        info!(%owner, %repo, "ticket submission to GitHub enabled");
        orchestrator =
            orchestrator.with_submitter(Arc::new(GithubSubmitter::new(token, owner, repo)));
    }

    let registry = orchestrator.registry();

    let corpus = match Corpus::load(&config.rules.rules_dir) {
        Ok(corpus) => {
            info!(count = corpus.len(), dir = %config.rules.rules_dir.display(), "rule corpus loaded");
            corpus
        }
        Err(e) => {
            warn!(error = %e, "cannot load rule corpus, starting empty");
            Corpus::default()
        }
    };

    let state = Arc::new(AppState {
        bus,
        orchestrator,
        rules_dir: config.rules.rules_dir.clone(),
        corpus: tokio::sync::RwLock::new(corpus),
    });

    let app = router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("decoywatch listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("draining in-flight enrichment runs");
    registry.drain().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    decoywatch_core::config::load_dotenv();
    let config = Config::from_env();
    config.validate();

    serve(config).await
}
