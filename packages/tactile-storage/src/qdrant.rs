use std::collections::HashMap;

use qdrant_client::qdrant::{
	PointId, ScoredPoint, SearchPointsBuilder, Value, point_id::PointIdOptions, value::Kind,
};
use uuid::Uuid;

use crate::{Error, Result, models::VectorHit};

pub const SWITCH_ID_PAYLOAD_KEY: &str = "switch_id";

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &tactile_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Nearest neighbours by descending similarity.
	pub async fn search_similar(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<VectorHit>> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions; collection {} expects {}.",
				vector.len(),
				self.collection,
				self.vector_dim
			)));
		}

		let request =
			SearchPointsBuilder::new(self.collection.clone(), vector, limit).with_payload(true);
		let response = self.client.search_points(request).await?;

		Ok(collect_vector_hits(&response.result))
	}
}

pub fn collect_vector_hits(points: &[ScoredPoint]) -> Vec<VectorHit> {
	let mut out = Vec::with_capacity(points.len());

	for point in points {
		let switch_id = point
			.id
			.as_ref()
			.and_then(point_id_to_uuid)
			.or_else(|| payload_uuid(&point.payload, SWITCH_ID_PAYLOAD_KEY));
		let Some(switch_id) = switch_id else { continue };

		out.push(VectorHit { switch_id, score: point.score });
	}

	out
}

pub fn point_id_to_uuid(point_id: &PointId) -> Option<Uuid> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Uuid(id)) => Uuid::parse_str(id).ok(),
		_ => None,
	}
}

pub fn payload_uuid(payload: &HashMap<String, Value>, key: &str) -> Option<Uuid> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Uuid::parse_str(text).ok(),
		_ => None,
	}
}
