use serde::{Deserialize, Serialize};

use crate::{
	Error, Result, TactileService,
	contextualize::{self, ConversationTurn},
	package::{self, PackagedContext},
};
use tactile_domain::reorder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub standalone_query: String,
	pub rewritten: bool,
	pub context: PackagedContext,
	pub warnings: Vec<String>,
}

impl TactileService {
	/// Contextualize, retrieve on both channels, fuse, then order for the context window.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let contextualized = contextualize::contextualize_query(
			self.providers.generation.as_ref(),
			&self.cfg.providers.llm_rewriter,
			&self.cfg.contextualizer,
			query,
			&req.history,
		)
		.await;
		let retriever = self.retriever();
		let channels = retriever.retrieve(&contextualized.query).await;
		let fused = retriever.fuse(&channels);

		tracing::info!(
			query = %contextualized.query,
			semantic = channels.semantic.len(),
			lexical = channels.lexical.len(),
			fused = fused.len(),
			"Search completed."
		);

		let context = package::package_candidates(&reorder::reorder_for_context(fused));
		let mut warnings = Vec::new();

		warnings.extend(contextualized.fallback_reason);
		warnings.extend(channels.warnings);

		Ok(SearchResponse {
			standalone_query: contextualized.query,
			rewritten: contextualized.rewritten,
			context,
			warnings,
		})
	}
}
