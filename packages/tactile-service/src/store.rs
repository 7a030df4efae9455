//! Postgres and Qdrant behind the collaborator traits.

use uuid::Uuid;

use crate::{BoxFuture, EntityStore, Result, VectorIndex};
use tactile_storage::{
	db::Db,
	models::{SwitchRecord, VectorHit},
	qdrant::QdrantStore,
	queries,
};

impl EntityStore for Db {
	fn get_by_exact_name<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<SwitchRecord>>> {
		Box::pin(async move { Ok(queries::get_switch_by_exact_name(self, name).await?) })
	}

	fn get_by_case_insensitive_name<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<SwitchRecord>>> {
		Box::pin(
			async move { Ok(queries::get_switch_by_case_insensitive_name(self, name).await?) },
		)
	}

	fn get_by_substring<'a>(
		&'a self,
		fragment: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SwitchRecord>>> {
		Box::pin(async move { Ok(queries::find_switches_by_substring(self, fragment, limit).await?) })
	}

	fn keyword_search<'a>(
		&'a self,
		fragment: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SwitchRecord>>> {
		Box::pin(async move { Ok(queries::keyword_search_switches(self, fragment, limit).await?) })
	}

	fn get_by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<SwitchRecord>>> {
		Box::pin(async move { Ok(queries::get_switches_by_ids(self, ids).await?) })
	}
}

impl VectorIndex for QdrantStore {
	fn search<'a>(&'a self, vector: Vec<f32>, k: u32) -> BoxFuture<'a, Result<Vec<VectorHit>>> {
		Box::pin(async move { Ok(self.search_similar(vector, u64::from(k)).await?) })
	}
}
