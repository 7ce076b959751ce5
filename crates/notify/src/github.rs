//! GitHub issue submitter.
//!
//! Files each remediation ticket as an issue so a repository agent can pick
//! it up. Delivery failures surface as capability errors; the orchestrator
//! falls back to bus emission, so a dead token never loses a ticket.

use async_trait::async_trait;
use tracing::{info, warn};

use decoywatch_enrich::{CapabilityError, Ticket, TicketSubmitter};

const GITHUB_API: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// Submits tickets as GitHub issues on a fixed repository.
pub struct GithubSubmitter {
    client: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GithubSubmitter {
    pub fn new(token: String, owner: String, repo: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            owner,
            repo,
        }
    }

    /// Render the issue body from the ticket's remediation content.
    fn issue_body(ticket: &Ticket) -> String {
        let mut body = String::new();
        body.push_str(&ticket.description);
        if !ticket.affected_files.is_empty() {
            body.push_str("\n\n**Affected files**\n");
            for file in &ticket.affected_files {
                body.push_str(&format!("- `{}`\n", file));
            }
        }
        if !ticket.suggested_patch.is_empty() {
            body.push_str(&format!(
                "\n**Suggested patch**\n```diff\n{}\n```\n",
                ticket.suggested_patch
            ));
        }
        if !ticket.patch_instructions.is_empty() {
            body.push_str(&format!(
                "\n**Patch instructions**\n{}\n",
                ticket.patch_instructions
            ));
        }
        if let Some(addr) = &ticket.source_address {
            body.push_str(&format!("\nObserved from `{}`.\n", addr));
        }
        body
    }

    fn payload(&self, ticket: &Ticket) -> serde_json::Value {
        let title = match &ticket.ticket_id {
            Some(id) => format!("[{}] {}", id, ticket.title),
            None => ticket.title.clone(),
        };
        serde_json::json!({
            "title": title,
            "body": Self::issue_body(ticket),
            "labels": ["security", "auto-remediation"],
        })
    }
}

#[async_trait]
impl TicketSubmitter for GithubSubmitter {
    async fn submit(&self, ticket: &Ticket) -> Result<bool, CapabilityError> {
        let url = format!("{}/repos/{}/{}/issues", GITHUB_API, self.owner, self.repo);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", "decoywatch")
            .json(&self.payload(ticket))
            .send()
            .await
            .map_err(|e| CapabilityError::Upstream(format!("GitHub request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "GitHub issue creation rejected");
            return Err(CapabilityError::Upstream(format!(
                "GitHub returned {}: {}",
                status, body
            )));
        }

        info!(owner = %self.owner, repo = %self.repo, ticket_id = ?ticket.ticket_id, "ticket filed as GitHub issue");
        Ok(true)
    }
}
