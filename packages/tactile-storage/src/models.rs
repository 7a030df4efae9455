use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One catalog row. Every attribute except the name may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SwitchRecord {
	pub switch_id: Uuid,
	pub name: String,
	pub manufacturer: Option<String>,
	pub switch_type: Option<String>,
	pub top_housing: Option<String>,
	pub bottom_housing: Option<String>,
	pub stem: Option<String>,
	pub mount: Option<String>,
	pub spring: Option<String>,
	pub actuation_force_g: Option<f32>,
	pub bottom_out_force_g: Option<f32>,
	pub pre_travel_mm: Option<f32>,
	pub total_travel_mm: Option<f32>,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl SwitchRecord {
	/// A record carrying only its identity, for callers that fill attributes afterwards.
	pub fn named(switch_id: Uuid, name: impl Into<String>) -> Self {
		Self {
			switch_id,
			name: name.into(),
			manufacturer: None,
			switch_type: None,
			top_housing: None,
			bottom_housing: None,
			stem: None,
			mount: None,
			spring: None,
			actuation_force_g: None,
			bottom_out_force_g: None,
			pre_travel_mm: None,
			total_travel_mm: None,
			updated_at: OffsetDateTime::UNIX_EPOCH,
		}
	}
}

/// Nearest-neighbour hit from the vector index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorHit {
	pub switch_id: Uuid,
	pub score: f32,
}
